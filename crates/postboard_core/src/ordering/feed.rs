//! Freeform image feed ordering.
//!
//! The feed is the flattened post order across all groupings. Reordering it
//! changes relative order only; grouping membership is preserved.

use crate::model::grouping::{GroupingId, GroupingSet};
use crate::model::post::PostId;
use crate::ordering::{ReorderError, ReorderResult};
use serde::Serialize;

/// Pseudo grouping id used in index errors raised against the feed.
pub const FEED_ID: &str = "feed";

/// One tile of the image feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: PostId,
    pub image: String,
    pub title: String,
    pub grouping_id: GroupingId,
}

/// Builds the feed in canonical order.
pub fn feed_items(set: &GroupingSet) -> Vec<FeedItem> {
    set.posts_with_grouping()
        .map(|(grouping_id, post)| FeedItem {
            id: post.id.clone(),
            image: post.image.clone(),
            title: post.title.clone(),
            grouping_id: grouping_id.clone(),
        })
        .collect()
}

/// Moves one post to `new_index` in the feed and rebuilds every grouping from
/// the new feed order.
///
/// # Errors
/// - `PostNotFound` when `post_id` does not resolve.
/// - `InvalidIndex` when `new_index` is not a valid feed position.
pub fn reorder_feed(
    set: &GroupingSet,
    post_id: &str,
    new_index: usize,
) -> ReorderResult<GroupingSet> {
    let mut feed = feed_items(set);
    let old_index = feed
        .iter()
        .position(|item| item.id == post_id)
        .ok_or_else(|| ReorderError::PostNotFound(post_id.to_string()))?;
    if new_index >= feed.len() {
        return Err(ReorderError::InvalidIndex {
            grouping_id: FEED_ID.to_string(),
            index: new_index,
            len: feed.len(),
        });
    }

    let mut next = set.clone();
    if old_index == new_index {
        return Ok(next);
    }

    let moved = feed.remove(old_index);
    feed.insert(new_index, moved);

    for grouping in next.groupings_mut() {
        let mut current = std::mem::take(grouping.posts_mut());
        let mut rebuilt = Vec::with_capacity(current.len());
        for item in feed.iter().filter(|item| item.grouping_id == grouping.id) {
            if let Some(position) = current.iter().position(|post| post.id == item.id) {
                rebuilt.push(current.swap_remove(position));
            }
        }
        *grouping.posts_mut() = rebuilt;
    }
    Ok(next)
}
