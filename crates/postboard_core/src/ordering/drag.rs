//! Drag preview tracker.
//!
//! An explicit finite-state machine over pointer drag events. Transitions are
//! pure: `(state, event) -> (state, optional drop command)`. Hover updates
//! only move the insertion marker; canonical state changes happen when the
//! owner executes the emitted [`DropCommand`].
//!
//! # Invariants
//! - Leaving `Dragging` always clears the whole session.
//! - A drop command is emitted only for a hover target that differs from the
//!   origin slot.

use crate::model::grouping::GroupingId;
use crate::model::post::{Post, PostId};
use serde::Serialize;

/// Surface the drag happens on; decides how a drop is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragSurface {
    /// Kanban board: drops reorder or transfer between columns.
    #[default]
    Board,
    /// Month calendar: drops rewrite the post date to the target day.
    Calendar,
}

/// Address of one slot: grouping id plus index inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTarget {
    pub grouping_id: GroupingId,
    pub index: usize,
}

impl DropTarget {
    pub fn new(grouping_id: impl Into<GroupingId>, index: usize) -> Self {
        Self {
            grouping_id: grouping_id.into(),
            index,
        }
    }
}

/// Ephemeral state of an in-progress drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragSession {
    pub surface: DragSurface,
    pub dragged_post: Post,
    pub source: DropTarget,
    /// Current hover target; `None` while outside any grouping.
    pub hover: Option<DropTarget>,
}

impl DragSession {
    /// Index where the insertion marker is drawn inside the hovered grouping.
    ///
    /// Inside the origin grouping the dragged card still occupies its slot,
    /// so a raw hover index at or past the origin is drawn one slot earlier.
    pub fn preview_index(&self) -> Option<usize> {
        let hover = self.hover.as_ref()?;
        if hover.grouping_id == self.source.grouping_id && hover.index >= self.source.index {
            return Some(hover.index.saturating_sub(1));
        }
        Some(hover.index)
    }

    /// Marker index for one grouping, or `None` when it is not hovered.
    pub fn preview_in(&self, grouping_id: &str) -> Option<usize> {
        match &self.hover {
            Some(hover) if hover.grouping_id == grouping_id => self.preview_index(),
            _ => None,
        }
    }
}

/// Drag tracker state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Pointer events delivered by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    /// Pointer picked up `post` from `source`.
    Start {
        surface: DragSurface,
        post: Post,
        source: DropTarget,
    },
    /// Hover target changed; `None` when outside every grouping.
    Hover(Option<DropTarget>),
    /// Pointer released.
    End,
    /// Drag aborted (escape key, lost pointer capture).
    Cancel,
}

/// Move the owner must commit after a successful drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropCommand {
    pub surface: DragSurface,
    pub post_id: PostId,
    pub source: DropTarget,
    pub destination: DropTarget,
}

impl DropCommand {
    /// Whether source and destination name the same grouping.
    pub fn is_same_grouping(&self) -> bool {
        self.source.grouping_id == self.destination.grouping_id
    }
}

/// Output of one state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: DragState,
    pub command: Option<DropCommand>,
}

impl Transition {
    fn to(state: DragState) -> Self {
        Self {
            state,
            command: None,
        }
    }
}

impl DragState {
    /// Applies one event and returns the next state.
    ///
    /// - `Start` always opens a fresh session, replacing any active one.
    /// - `Hover`, `End` and `Cancel` are ignored while idle.
    pub fn apply(self, event: DragEvent) -> Transition {
        match (self, event) {
            (
                _,
                DragEvent::Start {
                    surface,
                    post,
                    source,
                },
            ) => Transition::to(DragState::Dragging(DragSession {
                surface,
                dragged_post: post,
                source,
                hover: None,
            })),
            (DragState::Dragging(mut session), DragEvent::Hover(target)) => {
                session.hover = target;
                Transition::to(DragState::Dragging(session))
            }
            (DragState::Dragging(session), DragEvent::End) => Transition {
                state: DragState::Idle,
                command: drop_command(session),
            },
            (DragState::Dragging(_), DragEvent::Cancel) => Transition::to(DragState::Idle),
            (DragState::Idle, _) => Transition::to(DragState::Idle),
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) => Some(session),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}

fn drop_command(session: DragSession) -> Option<DropCommand> {
    let destination = session.hover?;
    if destination == session.source {
        return None;
    }
    Some(DropCommand {
        surface: session.surface,
        post_id: session.dragged_post.id,
        source: session.source,
        destination,
    })
}
