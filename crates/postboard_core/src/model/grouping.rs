//! Grouping buckets and the canonical grouping set.
//!
//! # Responsibility
//! - Hold posts in named, ordered buckets (kanban columns, calendar days).
//! - Expose lookup helpers used by the reorder engine and projections.
//!
//! # Invariants
//! - `count` is always `posts.len()`; a stored count is ignored on load.
//! - Within one set, grouping ids are unique and every post id occurs once.

use crate::model::post::{Post, PostId, PostValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Grouping identifier: a column id, an ISO date, or `unscheduled`.
pub type GroupingId = String;

/// Named ordered bucket of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GroupingRecord", into = "GroupingRecord")]
pub struct Grouping {
    pub id: GroupingId,
    pub title: String,
    posts: Vec<Post>,
}

/// Stored shape of a grouping: `{id, title, count, posts}`.
#[derive(Serialize, Deserialize)]
struct GroupingRecord {
    id: GroupingId,
    title: String,
    #[serde(default)]
    count: usize,
    #[serde(default)]
    posts: Vec<Post>,
}

impl From<GroupingRecord> for Grouping {
    fn from(record: GroupingRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            posts: record.posts,
        }
    }
}

impl From<Grouping> for GroupingRecord {
    fn from(grouping: Grouping) -> Self {
        Self {
            count: grouping.posts.len(),
            id: grouping.id,
            title: grouping.title,
            posts: grouping.posts,
        }
    }
}

impl Grouping {
    /// Creates an empty grouping.
    pub fn new(id: impl Into<GroupingId>, title: impl Into<String>) -> Self {
        Self::with_posts(id, title, Vec::new())
    }

    /// Creates a grouping holding `posts` in the given order.
    pub fn with_posts(id: impl Into<GroupingId>, title: impl Into<String>, posts: Vec<Post>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            posts,
        }
    }

    /// Posts in persisted sort order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Number of posts; derived, never stored.
    pub fn count(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Index of a post inside this grouping.
    pub fn index_of(&self, post_id: &str) -> Option<usize> {
        self.posts.iter().position(|post| post.id == post_id)
    }

    pub(crate) fn posts_mut(&mut self) -> &mut Vec<Post> {
        &mut self.posts
    }
}

/// Invariant violations detected in a grouping set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetInvariantError {
    /// Two groupings share one id.
    DuplicateGrouping(GroupingId),
    /// One post id appears more than once across the set.
    DuplicatePost(PostId),
    /// A post record fails validation.
    InvalidPost(PostValidationError),
}

impl Display for SetInvariantError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateGrouping(id) => write!(f, "duplicate grouping id: {id}"),
            Self::DuplicatePost(id) => write!(f, "post appears in more than one slot: {id}"),
            Self::InvalidPost(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SetInvariantError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPost(err) => Some(err),
            _ => None,
        }
    }
}

/// Canonical ordered collection of groupings; the single source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupingSet {
    groupings: Vec<Grouping>,
}

impl GroupingSet {
    pub fn new(groupings: Vec<Grouping>) -> Self {
        Self { groupings }
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    pub fn into_groupings(self) -> Vec<Grouping> {
        self.groupings
    }

    pub fn len(&self) -> usize {
        self.groupings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groupings.is_empty()
    }

    /// Looks up a grouping by id.
    pub fn get(&self, grouping_id: &str) -> Option<&Grouping> {
        self.groupings.iter().find(|grouping| grouping.id == grouping_id)
    }

    /// Position of a grouping inside the set.
    pub fn position(&self, grouping_id: &str) -> Option<usize> {
        self.groupings
            .iter()
            .position(|grouping| grouping.id == grouping_id)
    }

    /// Locates a post as `(grouping position, post index)`.
    pub fn locate_post(&self, post_id: &str) -> Option<(usize, usize)> {
        self.groupings
            .iter()
            .enumerate()
            .find_map(|(slot, grouping)| grouping.index_of(post_id).map(|index| (slot, index)))
    }

    /// Looks up a post anywhere in the set.
    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.locate_post(post_id)
            .map(|(slot, index)| &self.groupings[slot].posts[index])
    }

    /// All posts in grouping order, then in-grouping order.
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.groupings.iter().flat_map(|grouping| grouping.posts.iter())
    }

    /// All posts paired with the id of the grouping holding them.
    pub fn posts_with_grouping(&self) -> impl Iterator<Item = (&GroupingId, &Post)> {
        self.groupings
            .iter()
            .flat_map(|grouping| grouping.posts.iter().map(move |post| (&grouping.id, post)))
    }

    pub fn total_posts(&self) -> usize {
        self.groupings.iter().map(Grouping::count).sum()
    }

    /// Checks set-wide invariants: unique grouping ids, each post exactly
    /// once, and valid post records.
    pub fn validate(&self) -> Result<(), SetInvariantError> {
        let mut grouping_ids = HashSet::new();
        let mut post_ids = HashSet::new();
        for grouping in &self.groupings {
            if !grouping_ids.insert(grouping.id.as_str()) {
                return Err(SetInvariantError::DuplicateGrouping(grouping.id.clone()));
            }
            for post in &grouping.posts {
                post.validate().map_err(SetInvariantError::InvalidPost)?;
                if !post_ids.insert(post.id.as_str()) {
                    return Err(SetInvariantError::DuplicatePost(post.id.clone()));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn grouping_mut(&mut self, slot: usize) -> &mut Grouping {
        &mut self.groupings[slot]
    }

    pub(crate) fn groupings_mut(&mut self) -> &mut [Grouping] {
        &mut self.groupings
    }
}
