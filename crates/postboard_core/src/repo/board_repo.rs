//! Board persistence gateway over the SQLite key-value store.
//!
//! # Responsibility
//! - Load and save the full canonical grouping set as one named record.
//! - Seed the default board on first start.
//!
//! # Invariants
//! - The board record is a JSON array of `{id, title, count, posts}`.
//! - `save` replaces the record inside one transaction; a reader never sees a
//!   partial write.
//! - `load` rejects records that violate grouping set invariants instead of
//!   masking them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::grouping::{GroupingSet, SetInvariantError};
use log::{error, info, warn};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Record key holding the canonical board.
pub const BOARD_RECORD_KEY: &str = "kanban-columns";

pub type BoardRepoResult<T> = Result<T, BoardRepoError>;

/// Persistence failures of the board store.
#[derive(Debug)]
pub enum BoardRepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Record could not be encoded or decoded as JSON.
    Serialization(serde_json::Error),
    /// Stored record decodes but breaks grouping set invariants.
    InvalidData(SetInvariantError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for BoardRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "board record encoding failed: {err}"),
            Self::InvalidData(err) => write!(f, "invalid stored board: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "board repository requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for BoardRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for BoardRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BoardRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for BoardRepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Repository interface for the canonical board.
pub trait BoardRepository {
    /// Loads the stored board, or `None` when nothing was saved yet.
    fn load(&self) -> BoardRepoResult<Option<GroupingSet>>;
    /// Replaces the stored board.
    fn save(&self, set: &GroupingSet) -> BoardRepoResult<()>;
    /// Returns the stored board, persisting `default_set` first when empty.
    fn seed_if_empty(&self, default_set: GroupingSet) -> BoardRepoResult<GroupingSet> {
        if let Some(stored) = self.load()? {
            return Ok(stored);
        }
        self.save(&default_set)?;
        info!(
            "event=board_seed module=repo status=ok groupings={} posts={}",
            default_set.len(),
            default_set.total_posts()
        );
        Ok(default_set)
    }
}

/// SQLite-backed board repository.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Creates a repository over a migrated connection, using the default
    /// board record key.
    pub fn try_new(conn: &'conn Connection) -> BoardRepoResult<Self> {
        Self::with_key(conn, BOARD_RECORD_KEY)
    }

    /// Creates a repository that stores the board under `key`.
    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> BoardRepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            conn,
            key: key.into(),
        })
    }
}

impl BoardRepository for SqliteBoardRepository<'_> {
    fn load(&self) -> BoardRepoResult<Option<GroupingSet>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_records WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let set: GroupingSet = serde_json::from_str(&raw).map_err(|err| {
            error!(
                "event=board_load module=repo status=error error_code=decode_failed key={} error={}",
                self.key, err
            );
            BoardRepoError::from(err)
        })?;
        if let Err(err) = set.validate() {
            warn!(
                "event=board_load module=repo status=error error_code=invariant_violation key={} error={}",
                self.key, err
            );
            return Err(BoardRepoError::InvalidData(err));
        }
        Ok(Some(set))
    }

    fn save(&self, set: &GroupingSet) -> BoardRepoResult<()> {
        let started_at = Instant::now();
        let encoded = serde_json::to_string(set)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO kv_records (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), encoded],
        )?;
        tx.commit()?;

        info!(
            "event=board_save module=repo status=ok key={} groupings={} posts={} bytes={} duration_ms={}",
            self.key,
            set.len(),
            set.total_posts(),
            encoded.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> BoardRepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(BoardRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
