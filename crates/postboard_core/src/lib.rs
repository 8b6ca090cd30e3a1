//! Core domain logic for Postboard.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod defaults;
pub mod logging;
pub mod model;
pub mod ordering;
pub mod projection;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use defaults::{default_board, DEFAULT_GROUPING_ID};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::grouping::{Grouping, GroupingId, GroupingSet, SetInvariantError};
pub use model::post::{Platform, Post, PostId, PostPatch, PostValidationError};
pub use ordering::drag::{DragEvent, DragSession, DragState, DragSurface, DropCommand, DropTarget};
pub use ordering::reorder::DatePolicy;
pub use ordering::{MoveOutcome, ReorderError, ReorderResult};
pub use projection::table::{SortDirection, SortField, TableQuery, TableRow, TableSort};
pub use projection::FeedItem;
pub use repo::board_repo::{BoardRepoError, BoardRepository, SqliteBoardRepository};
pub use service::board_service::{BoardService, BoardServiceError, BoardServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
