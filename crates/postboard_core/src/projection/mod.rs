//! Read-only projections of the canonical grouping set.
//!
//! # Responsibility
//! - Shape the canonical set for the board, calendar, table and feed views.
//!
//! # Invariants
//! - Builders are pure and total over any valid set.
//! - Projections never feed back into canonical state.

use crate::model::grouping::{Grouping, GroupingSet};

pub mod calendar;
pub mod table;

pub use crate::ordering::feed::{feed_items, FeedItem};

/// Kanban projection: the canonical groupings are already board columns.
pub fn kanban_projection(set: &GroupingSet) -> Vec<Grouping> {
    set.groupings().to_vec()
}
