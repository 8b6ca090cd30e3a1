//! Board controller.
//!
//! # Responsibility
//! - Hold the canonical grouping set and the drag tracker state.
//! - Route inbound UI operations through the reorder engine.
//! - Persist after every committed mutation.
//!
//! # Invariants
//! - Every mutation either replaces the in-memory set with a valid engine
//!   result or leaves it untouched.
//! - A failed save keeps the new in-memory set authoritative; `persist`
//!   retries the write.
//! - Drag hover never touches the canonical set.

use crate::defaults::DEFAULT_GROUPING_ID;
use crate::model::grouping::{Grouping, GroupingSet};
use crate::model::post::{Post, PostId, PostPatch, PostValidationError};
use crate::ordering::drag::{DragEvent, DragState, DragSurface, DropCommand, DropTarget};
use crate::ordering::feed::{self, FeedItem};
use crate::ordering::reorder;
use crate::ordering::{MoveOutcome, ReorderError};
use crate::projection::calendar::calendar_projection;
use crate::projection::kanban_projection;
use crate::projection::table::{table_projection, TableQuery, TableRow};
use crate::repo::board_repo::{BoardRepoError, BoardRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Service error for board use-cases.
#[derive(Debug)]
pub enum BoardServiceError {
    /// The reorder engine rejected the operation.
    Reorder(ReorderError),
    /// A create or edit produced an invalid post.
    Validation(PostValidationError),
    /// The store could not be read or written.
    PersistenceFailure(BoardRepoError),
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reorder(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::PersistenceFailure(err) => write!(f, "persistence failure: {err}"),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reorder(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::PersistenceFailure(err) => Some(err),
        }
    }
}

impl From<ReorderError> for BoardServiceError {
    fn from(value: ReorderError) -> Self {
        Self::Reorder(value)
    }
}

impl From<PostValidationError> for BoardServiceError {
    fn from(value: PostValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<BoardRepoError> for BoardServiceError {
    fn from(value: BoardRepoError) -> Self {
        Self::PersistenceFailure(value)
    }
}

/// Board service facade over a repository implementation.
pub struct BoardService<R: BoardRepository> {
    repo: R,
    set: GroupingSet,
    drag: DragState,
}

impl<R: BoardRepository> BoardService<R> {
    /// Loads the stored board, seeding `default_set` when storage is empty.
    pub fn open(repo: R, default_set: GroupingSet) -> BoardServiceResult<Self> {
        let set = repo.seed_if_empty(default_set)?;
        info!(
            "event=board_open module=service status=ok groupings={} posts={}",
            set.len(),
            set.total_posts()
        );
        Ok(Self {
            repo,
            set,
            drag: DragState::Idle,
        })
    }

    /// Current canonical set.
    pub fn groupings(&self) -> &GroupingSet {
        &self.set
    }

    /// Creates a post, or edits the post named by `patch.id`.
    ///
    /// New posts are appended to `patch.grouping_id` (default `idea`).
    /// Returns the id of the created or edited post.
    pub fn create_or_update_post(&mut self, patch: &PostPatch) -> BoardServiceResult<PostId> {
        let mut next = self.set.clone();
        let (post_id, action) = if patch.is_edit() {
            let post_id = patch.id.clone().unwrap_or_default();
            let (slot, index) = next
                .locate_post(&post_id)
                .ok_or_else(|| ReorderError::PostNotFound(post_id.clone()))?;
            next.grouping_mut(slot).posts_mut()[index].apply_patch(patch)?;
            (post_id, "update")
        } else {
            let grouping_id = patch
                .grouping_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .unwrap_or(DEFAULT_GROUPING_ID);
            let slot = next
                .position(grouping_id)
                .ok_or_else(|| ReorderError::GroupingNotFound(grouping_id.to_string()))?;
            let post = Post::from_draft(patch)?;
            let post_id = post.id.clone();
            next.grouping_mut(slot).posts_mut().push(post);
            (post_id, "create")
        };

        self.commit(next, "post_upsert")?;
        info!(
            "event=post_upsert module=service status=ok action={} post_id={}",
            action, post_id
        );
        Ok(post_id)
    }

    pub fn move_within_group(
        &mut self,
        grouping_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> BoardServiceResult<()> {
        let next = reorder::move_within_group(&self.set, grouping_id, from_index, to_index)?;
        if from_index == to_index {
            return Ok(());
        }
        self.commit(next, "move_within_group")
    }

    /// Transfers a post between groupings. Returns `Skipped` when source and
    /// destination name the same slot.
    pub fn move_across_groups(
        &mut self,
        source_grouping_id: &str,
        source_index: usize,
        dest_grouping_id: &str,
        dest_index: usize,
    ) -> BoardServiceResult<MoveOutcome<()>> {
        match reorder::move_across_groups(
            &self.set,
            source_grouping_id,
            source_index,
            dest_grouping_id,
            dest_index,
        )? {
            MoveOutcome::Skipped => {
                info!(
                    "event=move_across_groups module=service status=skip grouping_id={} index={}",
                    source_grouping_id, source_index
                );
                Ok(MoveOutcome::Skipped)
            }
            MoveOutcome::Moved(next) => {
                self.commit(next, "move_across_groups")?;
                Ok(MoveOutcome::Moved(()))
            }
        }
    }

    /// Rewrites a post's date to the calendar day `dest_grouping_id`.
    pub fn reclassify_by_target(
        &mut self,
        post_id: &str,
        dest_grouping_id: &str,
    ) -> BoardServiceResult<()> {
        let next = reorder::reclassify_by_target(&self.set, post_id, dest_grouping_id)?;
        self.commit(next, "reclassify_by_target")
    }

    pub fn toggle_auto_post(&mut self, post_id: &str, value: bool) -> BoardServiceResult<()> {
        let (slot, index) = self
            .set
            .locate_post(post_id)
            .ok_or_else(|| ReorderError::PostNotFound(post_id.to_string()))?;
        let mut next = self.set.clone();
        next.grouping_mut(slot).posts_mut()[index].auto_post = value;
        self.commit(next, "toggle_auto_post")
    }

    pub fn reorder_feed(&mut self, post_id: &str, new_index: usize) -> BoardServiceResult<()> {
        let next = feed::reorder_feed(&self.set, post_id, new_index)?;
        self.commit(next, "reorder_feed")
    }

    /// Starts dragging the post at `index` of `grouping_id` on `surface`.
    ///
    /// Calendar drags address calendar buckets, board drags address kanban
    /// columns.
    pub fn drag_start(
        &mut self,
        surface: DragSurface,
        grouping_id: &str,
        index: usize,
    ) -> BoardServiceResult<()> {
        let post = match surface {
            DragSurface::Board => post_at(self.set.groupings(), grouping_id, index)?,
            DragSurface::Calendar => {
                post_at(calendar_projection(&self.set).groupings(), grouping_id, index)?
            }
        };
        self.apply_drag(DragEvent::Start {
            surface,
            post,
            source: DropTarget::new(grouping_id, index),
        });
        Ok(())
    }

    /// Updates the hover target; `None` when the pointer left every grouping.
    pub fn drag_hover(&mut self, target: Option<DropTarget>) {
        self.apply_drag(DragEvent::Hover(target));
    }

    /// Ends the drag and commits the drop, if any.
    ///
    /// The tracker is idle afterwards whatever the outcome. See
    /// [`Self::commit_drop`] for the return value.
    pub fn drag_end(&mut self) -> BoardServiceResult<Option<DropCommand>> {
        match self.apply_drag(DragEvent::End) {
            Some(command) => self.commit_drop(command),
            None => Ok(None),
        }
    }

    /// Applies a drop produced by an ended drag session.
    ///
    /// Returns the committed command, or `None` when the drop was discarded.
    /// Engine rejections are logged and discarded; only storage failures are
    /// returned as errors.
    pub fn commit_drop(
        &mut self,
        command: DropCommand,
    ) -> BoardServiceResult<Option<DropCommand>> {
        let next = match self.resolve_drop(&command) {
            Ok(Some(next)) => next,
            Ok(None) => return Ok(None),
            Err(err) => {
                warn!(
                    "event=drag_drop module=service status=skip post_id={} source={} destination={} error={}",
                    command.post_id,
                    command.source.grouping_id,
                    command.destination.grouping_id,
                    err
                );
                return Ok(None);
            }
        };
        self.commit(next, "drag_drop")?;
        Ok(Some(command))
    }

    pub fn drag_cancel(&mut self) {
        self.apply_drag(DragEvent::Cancel);
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Restores a drag tracker carried over from an earlier service instance.
    pub fn resume_drag(&mut self, drag: DragState) {
        self.drag = drag;
    }

    /// Hands the drag tracker out, leaving this service idle.
    pub fn take_drag_state(&mut self) -> DragState {
        std::mem::take(&mut self.drag)
    }

    pub fn kanban(&self) -> Vec<Grouping> {
        kanban_projection(&self.set)
    }

    pub fn calendar(&self) -> GroupingSet {
        calendar_projection(&self.set)
    }

    pub fn table(&self, query: &TableQuery) -> Vec<TableRow> {
        table_projection(&self.set, query)
    }

    pub fn feed(&self) -> Vec<FeedItem> {
        feed::feed_items(&self.set)
    }

    /// Writes the current in-memory set, e.g. to retry a failed save.
    pub fn persist(&self) -> BoardServiceResult<()> {
        self.repo.save(&self.set)?;
        Ok(())
    }

    fn apply_drag(&mut self, event: DragEvent) -> Option<DropCommand> {
        let transition = std::mem::take(&mut self.drag).apply(event);
        self.drag = transition.state;
        transition.command
    }

    fn resolve_drop(&self, command: &DropCommand) -> Result<Option<GroupingSet>, ReorderError> {
        match command.surface {
            DragSurface::Calendar if command.is_same_grouping() => Ok(None),
            DragSurface::Calendar => reorder::reclassify_by_target(
                &self.set,
                &command.post_id,
                &command.destination.grouping_id,
            )
            .map(Some),
            DragSurface::Board if command.is_same_grouping() => {
                // Past-the-end hover means "drop last".
                let len = self
                    .set
                    .get(&command.source.grouping_id)
                    .map(Grouping::count)
                    .unwrap_or(0);
                let to_index = command.destination.index.min(len.saturating_sub(1));
                if to_index == command.source.index {
                    return Ok(None);
                }
                reorder::move_within_group(
                    &self.set,
                    &command.source.grouping_id,
                    command.source.index,
                    to_index,
                )
                .map(Some)
            }
            DragSurface::Board => match reorder::move_across_groups(
                &self.set,
                &command.source.grouping_id,
                command.source.index,
                &command.destination.grouping_id,
                command.destination.index,
            )? {
                MoveOutcome::Moved(next) => Ok(Some(next)),
                MoveOutcome::Skipped => Ok(None),
            },
        }
    }

    fn commit(&mut self, next: GroupingSet, operation: &str) -> BoardServiceResult<()> {
        self.set = next;
        if let Err(err) = self.repo.save(&self.set) {
            warn!(
                "event={} module=service status=error error_code=persist_failed error={}",
                operation, err
            );
            return Err(BoardServiceError::PersistenceFailure(err));
        }
        info!(
            "event={} module=service status=ok posts={}",
            operation,
            self.set.total_posts()
        );
        Ok(())
    }
}

fn post_at(groupings: &[Grouping], grouping_id: &str, index: usize) -> Result<Post, ReorderError> {
    let grouping = groupings
        .iter()
        .find(|grouping| grouping.id == grouping_id)
        .ok_or_else(|| ReorderError::GroupingNotFound(grouping_id.to_string()))?;
    grouping
        .posts()
        .get(index)
        .cloned()
        .ok_or_else(|| ReorderError::InvalidIndex {
            grouping_id: grouping_id.to_string(),
            index,
            len: grouping.count(),
        })
}
