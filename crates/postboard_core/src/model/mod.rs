//! Board domain model shared by every projection.
//!
//! # Responsibility
//! - Define the post record and the ordered grouping buckets that hold it.
//! - Own the calendar date/time display formats used across the crate.
//!
//! # Invariants
//! - Every post is identified by a stable `PostId` assigned at creation.
//! - A grouping's count is derived from its posts, never stored separately.

pub mod date;
pub mod grouping;
pub mod post;
