//! Persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the board load/save/seed contract used by the controller.
//! - Keep SQL and record encoding out of the engine and service layers.

pub mod board_repo;
