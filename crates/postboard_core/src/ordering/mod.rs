//! Ordered-collection engine for board groupings.
//!
//! # Responsibility
//! - Compute the result of moving posts within and across groupings.
//! - Track in-flight drags and the optimistic insertion marker.
//! - Reorder the flattened image feed.
//!
//! # Invariants
//! - Every operation takes the current set by reference and returns a new
//!   set; a failed operation leaves no partial mutation behind.
//! - Results keep each post id in exactly one grouping.

use crate::model::grouping::GroupingId;
use crate::model::post::PostId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod drag;
pub mod feed;
pub mod reorder;

pub type ReorderResult<T> = Result<T, ReorderError>;

/// Failures of reorder operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// Index is outside the valid range of the addressed sequence.
    InvalidIndex {
        grouping_id: GroupingId,
        index: usize,
        len: usize,
    },
    /// Grouping id does not resolve in the current set.
    GroupingNotFound(GroupingId),
    /// Post id does not resolve in the current set.
    PostNotFound(PostId),
    /// A date string cannot be parsed in the expected format.
    DateParse { value: String, expected: &'static str },
}

impl Display for ReorderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIndex {
                grouping_id,
                index,
                len,
            } => write!(
                f,
                "index {index} out of bounds for grouping `{grouping_id}` of length {len}"
            ),
            Self::GroupingNotFound(id) => write!(f, "grouping not found: {id}"),
            Self::PostNotFound(id) => write!(f, "post not found: {id}"),
            Self::DateParse { value, expected } => {
                write!(f, "cannot parse date `{value}`; expected format {expected}")
            }
        }
    }
}

impl Error for ReorderError {}

/// Result of a move request that may be a benign no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome<T> {
    /// The move was applied.
    Moved(T),
    /// Source and destination are identical; nothing changed.
    Skipped,
}

impl<T> MoveOutcome<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}
