//! Ordered schema steps for the board store.
//!
//! Each step is one SQL script; the store records the last applied step in
//! `PRAGMA user_version`. New steps are appended with the next version number.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema step: the version it brings the store to, and its script.
#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    script: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    script: include_str!("0001_kv_records.sql"),
}];

/// Schema version a fully migrated board store has.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings the store up to [`latest_version`] inside one transaction.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the store is ahead of this binary.
/// - `Sqlite` when a script fails; nothing from the failed run is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let target = latest_version();
    if stored > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: target,
        });
    }

    let pending = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > stored)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.script)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        stored,
        target,
        pending.len()
    );
    Ok(())
}
