//! Reorder engine: same-group reindex, cross-group transfer, and date
//! reclassification.
//!
//! # Invariants
//! - Index arithmetic follows splice semantics: the post is removed first, so
//!   a destination index is read against the sequence after removal.
//! - Cross-group destination indices are clamped to `[0, dest_len]`.
//! - Reclassification rewrites `Post::date` only; kanban membership and order
//!   are untouched.

use crate::model::date::{
    bucket_title, format_display_date, grouping_id_for, parse_display_date, parse_grouping_date,
};
use crate::model::grouping::{Grouping, GroupingSet};
use crate::model::post::Post;
use crate::ordering::{MoveOutcome, ReorderError, ReorderResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Id of the calendar bucket holding posts whose date cannot be parsed.
pub const UNSCHEDULED_GROUPING_ID: &str = "unscheduled";
const UNSCHEDULED_TITLE: &str = "Unscheduled";

const DISPLAY_DATE_LABEL: &str = "MMMM d, yyyy";
const GROUPING_DATE_LABEL: &str = "yyyy-MM-dd";

/// What date regrouping does with a post whose date does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePolicy {
    /// Abort the whole regroup with [`ReorderError::DateParse`].
    FailClosed,
    /// Collect such posts in a trailing `unscheduled` bucket.
    Unscheduled,
}

/// Moves the post at `from_index` to `to_index` inside one grouping.
///
/// Returns an unchanged copy when `from_index == to_index`.
///
/// # Errors
/// - `GroupingNotFound` when `grouping_id` does not resolve.
/// - `InvalidIndex` when either index is outside `[0, len)`.
pub fn move_within_group(
    set: &GroupingSet,
    grouping_id: &str,
    from_index: usize,
    to_index: usize,
) -> ReorderResult<GroupingSet> {
    let slot = resolve_grouping(set, grouping_id)?;
    let len = set.groupings()[slot].count();
    ensure_index(grouping_id, from_index, len)?;
    ensure_index(grouping_id, to_index, len)?;

    let mut next = set.clone();
    if from_index == to_index {
        return Ok(next);
    }

    let posts = next.grouping_mut(slot).posts_mut();
    let moved = posts.remove(from_index);
    posts.insert(to_index, moved);
    Ok(next)
}

/// Moves one post from a source grouping into a destination grouping.
///
/// The destination index is clamped to the destination length measured
/// before insertion. Identical source and destination (id and index) is a
/// benign skip. Same grouping with a different index reindexes in place.
///
/// # Errors
/// - `GroupingNotFound` when either id does not resolve.
/// - `InvalidIndex` when `source_index` is out of bounds, or when a
///   same-grouping destination index is out of bounds.
pub fn move_across_groups(
    set: &GroupingSet,
    source_grouping_id: &str,
    source_index: usize,
    dest_grouping_id: &str,
    dest_index: usize,
) -> ReorderResult<MoveOutcome<GroupingSet>> {
    let source_slot = resolve_grouping(set, source_grouping_id)?;
    let dest_slot = resolve_grouping(set, dest_grouping_id)?;

    if source_slot == dest_slot {
        if source_index == dest_index {
            return Ok(MoveOutcome::Skipped);
        }
        return move_within_group(set, source_grouping_id, source_index, dest_index)
            .map(MoveOutcome::Moved);
    }

    let source_len = set.groupings()[source_slot].count();
    ensure_index(source_grouping_id, source_index, source_len)?;
    let dest_len = set.groupings()[dest_slot].count();
    let insert_at = dest_index.min(dest_len);

    let mut next = set.clone();
    let moved = next.grouping_mut(source_slot).posts_mut().remove(source_index);
    next.grouping_mut(dest_slot)
        .posts_mut()
        .insert(insert_at, moved);
    Ok(MoveOutcome::Moved(next))
}

/// Rewrites a post's date to the day represented by a calendar bucket id.
///
/// The post stays in its kanban grouping at the same index; the calendar
/// projection picks up the new day when it is re-derived.
///
/// # Errors
/// - `DateParse` when `dest_grouping_id` is not an ISO `yyyy-MM-dd` date.
/// - `PostNotFound` when `post_id` does not resolve.
pub fn reclassify_by_target(
    set: &GroupingSet,
    post_id: &str,
    dest_grouping_id: &str,
) -> ReorderResult<GroupingSet> {
    let date = parse_grouping_date(dest_grouping_id).ok_or_else(|| ReorderError::DateParse {
        value: dest_grouping_id.to_string(),
        expected: GROUPING_DATE_LABEL,
    })?;
    let (slot, index) = set
        .locate_post(post_id)
        .ok_or_else(|| ReorderError::PostNotFound(post_id.to_string()))?;

    let mut next = set.clone();
    next.grouping_mut(slot).posts_mut()[index].date = format_display_date(date);
    Ok(next)
}

/// Partitions posts into one grouping per distinct parsed date, ascending.
///
/// Posts keep their relative input order inside a bucket. Bucket ids are
/// ISO dates and titles are short labels such as `Jun 15`.
///
/// # Errors
/// - `DateParse` for the first unparseable date under
///   [`DatePolicy::FailClosed`].
pub fn regroup_all_by_date<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    policy: DatePolicy,
) -> ReorderResult<GroupingSet> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Post>> = BTreeMap::new();
    let mut unscheduled = Vec::new();

    for post in posts {
        match parse_display_date(&post.date) {
            Some(date) => buckets.entry(date).or_default().push(post.clone()),
            None => match policy {
                DatePolicy::FailClosed => {
                    return Err(ReorderError::DateParse {
                        value: post.date.clone(),
                        expected: DISPLAY_DATE_LABEL,
                    });
                }
                DatePolicy::Unscheduled => unscheduled.push(post.clone()),
            },
        }
    }

    let mut groupings = buckets
        .into_iter()
        .map(|(date, posts)| Grouping::with_posts(grouping_id_for(date), bucket_title(date), posts))
        .collect::<Vec<_>>();
    if !unscheduled.is_empty() {
        groupings.push(Grouping::with_posts(
            UNSCHEDULED_GROUPING_ID,
            UNSCHEDULED_TITLE,
            unscheduled,
        ));
    }
    Ok(GroupingSet::new(groupings))
}

fn resolve_grouping(set: &GroupingSet, grouping_id: &str) -> ReorderResult<usize> {
    set.position(grouping_id)
        .ok_or_else(|| ReorderError::GroupingNotFound(grouping_id.to_string()))
}

fn ensure_index(grouping_id: &str, index: usize, len: usize) -> ReorderResult<()> {
    if index >= len {
        return Err(ReorderError::InvalidIndex {
            grouping_id: grouping_id.to_string(),
            index,
            len,
        });
    }
    Ok(())
}
