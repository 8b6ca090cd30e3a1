//! Use-case services.
//!
//! # Responsibility
//! - Own the canonical board for the process lifetime.
//! - Commit engine results to storage after every mutation.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod board_service;
