//! Store location configuration.
//!
//! # Responsibility
//! - Resolve where the board database lives for FFI and CLI entry points.
//!
//! # Invariants
//! - An explicit, non-blank `POSTBOARD_DB_PATH` always wins.
//! - Resolution never fails; the fallback is a file in the temp directory.

use std::path::PathBuf;

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "POSTBOARD_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "postboard.sqlite3";

/// Resolved store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    /// Resolves settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_db_path_value(std::env::var(DB_PATH_ENV).ok().as_deref())
    }

    fn from_db_path_value(raw: Option<&str>) -> Self {
        let db_path = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        Self { db_path }
    }
}
