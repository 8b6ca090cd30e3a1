//! Post domain model.
//!
//! # Responsibility
//! - Define the content item organized by every board projection.
//! - Define the field-level patch used by create/edit flows.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `platforms` is a non-empty ordered set (no duplicates).
//! - `date` is advisory calendar metadata; it does not decide kanban membership.

use crate::model::date::{format_display_date, format_display_time, now_time, today};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a post.
pub type PostId = String;

const DEFAULT_TITLE: &str = "Untitled Post";
const DEFAULT_IMAGE: &str = "/default-image.png";
const DEFAULT_AUTHOR: &str = "John Doe";
const DEFAULT_PLATFORM: Platform = Platform::Instagram;

/// Social platform a post is published to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    Tiktok,
    Twitter,
    Linkedin,
}

impl Platform {
    /// Stable lowercase tag used in storage and across FFI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::Tiktok => "tiktok",
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
        }
    }

    /// Parses a platform tag case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "instagram" => Some(Self::Instagram),
            "facebook" => Some(Self::Facebook),
            "tiktok" => Some(Self::Tiktok),
            "twitter" => Some(Self::Twitter),
            "linkedin" => Some(Self::Linkedin),
            _ => None,
        }
    }
}

/// Validation failures for post records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Post id is empty after trim.
    BlankId,
    /// A post must target at least one platform.
    EmptyPlatforms(PostId),
}

impl Display for PostValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "post id must not be blank"),
            Self::EmptyPlatforms(id) => write!(f, "post {id} must target at least one platform"),
        }
    }
}

impl Error for PostValidationError {}

/// Content item placed on the board.
///
/// Serialized with camelCase keys to keep the stored record layout stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Display date, canonical format `June 15, 2025`.
    pub date: String,
    /// Display time, e.g. `7:00 AM`.
    pub time: String,
    pub platforms: Vec<Platform>,
    pub image: String,
    pub author: String,
    pub likes: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub auto_post: bool,
}

impl Post {
    /// Builds a new post from a draft patch, filling defaults for absent or
    /// blank fields and assigning a fresh id.
    ///
    /// Any `id` carried by the patch is ignored: ids are only minted here.
    pub fn from_draft(draft: &PostPatch) -> Result<Self, PostValidationError> {
        let post = Self {
            id: new_post_id(),
            title: non_blank(&draft.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: non_blank(&draft.description).unwrap_or_default(),
            date: non_blank(&draft.date).unwrap_or_else(|| format_display_date(today())),
            time: non_blank(&draft.time).unwrap_or_else(|| format_display_time(now_time())),
            platforms: match &draft.platforms {
                Some(platforms) if !platforms.is_empty() => dedupe_platforms(platforms),
                _ => vec![DEFAULT_PLATFORM],
            },
            image: non_blank(&draft.image).unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            author: non_blank(&draft.author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            likes: draft.likes.unwrap_or(0),
            notes: non_blank(&draft.notes).unwrap_or_default(),
            auto_post: draft.auto_post.unwrap_or(false),
        };
        post.validate()?;
        Ok(post)
    }

    /// Merges a patch into this post: present fields overwrite, absent fields
    /// are preserved. The id never changes.
    ///
    /// The post is left untouched when the merged result would be invalid.
    pub fn apply_patch(&mut self, patch: &PostPatch) -> Result<(), PostValidationError> {
        let mut merged = self.clone();
        if let Some(title) = &patch.title {
            merged.title = title.clone();
        }
        if let Some(description) = &patch.description {
            merged.description = description.clone();
        }
        if let Some(date) = &patch.date {
            merged.date = date.clone();
        }
        if let Some(time) = &patch.time {
            merged.time = time.clone();
        }
        if let Some(platforms) = &patch.platforms {
            merged.platforms = dedupe_platforms(platforms);
        }
        if let Some(image) = &patch.image {
            merged.image = image.clone();
        }
        if let Some(author) = &patch.author {
            merged.author = author.clone();
        }
        if let Some(likes) = patch.likes {
            merged.likes = likes;
        }
        if let Some(notes) = &patch.notes {
            merged.notes = notes.clone();
        }
        if let Some(auto_post) = patch.auto_post {
            merged.auto_post = auto_post;
        }
        merged.validate()?;
        *self = merged;
        Ok(())
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), PostValidationError> {
        if self.id.trim().is_empty() {
            return Err(PostValidationError::BlankId);
        }
        if self.platforms.is_empty() {
            return Err(PostValidationError::EmptyPlatforms(self.id.clone()));
        }
        Ok(())
    }
}

/// Field-level optional patch submitted by the edit form.
///
/// `id` selects the post to edit; without it the patch creates a new post in
/// `grouping_id` (or the default column).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostPatch {
    pub id: Option<PostId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub platforms: Option<Vec<Platform>>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub likes: Option<u32>,
    pub notes: Option<String>,
    pub auto_post: Option<bool>,
    /// Target grouping for new posts. Ignored when editing.
    pub grouping_id: Option<String>,
}

impl PostPatch {
    /// Returns whether this patch edits an existing post.
    pub fn is_edit(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

/// Mints a new globally unique post id.
pub fn new_post_id() -> PostId {
    format!("post-{}", Uuid::new_v4())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

fn dedupe_platforms(platforms: &[Platform]) -> Vec<Platform> {
    let mut unique = Vec::with_capacity(platforms.len());
    for platform in platforms {
        if !unique.contains(platform) {
            unique.push(*platform);
        }
    }
    unique
}
