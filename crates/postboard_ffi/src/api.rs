//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose board use-cases to Dart via FRB as plain DTO envelopes.
//! - Keep the drag session alive between calls.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Calls are serialized; each one opens the store, loads, mutates and saves
//!   before returning.
//! - Failures are reported in the envelope, never by unwinding.

use log::warn;
use postboard_core::db::open_db;
use postboard_core::projection::table::TableRow;
use postboard_core::{
    core_version as core_version_inner, default_board, init_logging as init_logging_inner,
    ping as ping_inner, BoardService, BoardServiceError, DragEvent, DragState, DragSurface,
    DropTarget, FeedItem, Grouping, MoveOutcome, Platform, Post, PostPatch, SortDirection,
    SortField, SqliteBoardRepository, StoreConfig, TableQuery, TableSort,
};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static DRAG_STATE: Mutex<DragState> = Mutex::new(DragState::Idle);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling log files.
/// - Idempotent for identical arguments; reconfiguration returns an error.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Post fields as shown to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    /// Lowercase platform tags (`instagram|facebook|tiktok|twitter|linkedin`).
    pub platforms: Vec<String>,
    pub image: String,
    pub author: String,
    pub likes: u32,
    pub notes: String,
    pub auto_post: bool,
}

/// One kanban column or calendar day bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingDto {
    pub id: String,
    pub title: String,
    pub count: u32,
    pub posts: Vec<PostDto>,
}

/// Board or calendar snapshot envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshotResponse {
    pub ok: bool,
    pub groupings: Vec<GroupingDto>,
    pub message: String,
}

/// Table row: post plus the id of the column holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowDto {
    pub post: PostDto,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableResponse {
    pub ok: bool,
    pub rows: Vec<TableRowDto>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItemDto {
    pub id: String,
    pub image: String,
    pub title: String,
    pub grouping_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResponse {
    pub ok: bool,
    pub items: Vec<FeedItemDto>,
    pub message: String,
}

/// Live drag session as seen by the UI.
///
/// `ok = false` means the requested drag call failed; the remaining fields
/// still describe the session that is in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPreviewResponse {
    pub ok: bool,
    /// Whether a drag is in progress.
    pub active: bool,
    pub post_id: Option<String>,
    pub source_grouping_id: Option<String>,
    pub hover_grouping_id: Option<String>,
    /// Index where the insertion marker is drawn in the hovered grouping.
    pub preview_index: Option<u32>,
    /// Empty on success, failure reason otherwise.
    pub message: String,
}

impl DragPreviewResponse {
    fn failed(mut self, message: String) -> Self {
        self.ok = false;
        self.message = message;
        self
    }
}

/// Create/edit form submission. `id = None` creates a post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostUpsertRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub likes: Option<u32>,
    pub notes: Option<String>,
    pub auto_post: Option<bool>,
    /// Target column for new posts; defaults to `idea`.
    pub grouping_id: Option<String>,
}

/// Generic action response envelope for board commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected post ID, when the action addresses one.
    pub post_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn success(message: impl Into<String>, post_id: Option<String>) -> Self {
        Self {
            ok: true,
            post_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            post_id: None,
            message: message.into(),
        }
    }
}

/// Returns the kanban columns in canonical order.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot() -> BoardSnapshotResponse {
    snapshot("board_snapshot", |service| service.kanban())
}

/// Returns posts bucketed by calendar day, ascending.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_snapshot() -> BoardSnapshotResponse {
    snapshot("calendar_snapshot", |service| {
        service.calendar().into_groupings()
    })
}

/// Returns filtered and sorted table rows.
///
/// # FFI contract
/// - `sort_field`: post field name (`id`, `title`, `date`, `platforms`, `autoPost`, ...).
///   `None` keeps canonical order.
/// - `sort_direction`: `asc|desc`, default `asc`.
/// - Unknown field or direction names fail the call.
#[flutter_rust_bridge::frb(sync)]
pub fn table_rows(
    filter: String,
    sort_field: Option<String>,
    sort_direction: Option<String>,
) -> TableResponse {
    let query = match parse_table_query(filter, sort_field, sort_direction) {
        Ok(query) => query,
        Err(message) => {
            return TableResponse {
                ok: false,
                rows: Vec::new(),
                message: format!("table_rows failed: {message}"),
            }
        }
    };
    match with_board_service("table_rows", |service| Ok(service.table(&query))) {
        Ok(rows) => TableResponse {
            ok: true,
            message: format!("{} row(s).", rows.len()),
            rows: rows.into_iter().map(to_table_row_dto).collect(),
        },
        Err(err) => TableResponse {
            ok: false,
            rows: Vec::new(),
            message: format!("table_rows failed: {err}"),
        },
    }
}

/// Returns the flattened image feed.
#[flutter_rust_bridge::frb(sync)]
pub fn feed_items() -> FeedResponse {
    match with_board_service("feed_items", |service| Ok(service.feed())) {
        Ok(items) => FeedResponse {
            ok: true,
            message: format!("{} item(s).", items.len()),
            items: items.into_iter().map(to_feed_item_dto).collect(),
        },
        Err(err) => FeedResponse {
            ok: false,
            items: Vec::new(),
            message: format!("feed_items failed: {err}"),
        },
    }
}

/// Creates a post or edits the post named by `request.id`.
#[flutter_rust_bridge::frb(sync)]
pub fn upsert_post(request: PostUpsertRequest) -> BoardActionResponse {
    let patch = match to_post_patch(request) {
        Ok(patch) => patch,
        Err(message) => {
            return BoardActionResponse::failure(format!("upsert_post failed: {message}"))
        }
    };
    let message = if patch.is_edit() {
        "Post updated."
    } else {
        "Post created."
    };
    match with_board_service("upsert_post", |service| service.create_or_update_post(&patch)) {
        Ok(post_id) => BoardActionResponse::success(message, Some(post_id)),
        Err(err) => BoardActionResponse::failure(format!("upsert_post failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn move_within_group(
    grouping_id: String,
    from_index: u32,
    to_index: u32,
) -> BoardActionResponse {
    action("move_within_group", "Post moved.", |service| {
        service.move_within_group(&grouping_id, to_usize(from_index), to_usize(to_index))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn move_across_groups(
    source_grouping_id: String,
    source_index: u32,
    dest_grouping_id: String,
    dest_index: u32,
) -> BoardActionResponse {
    match with_board_service("move_across_groups", |service| {
        service.move_across_groups(
            &source_grouping_id,
            to_usize(source_index),
            &dest_grouping_id,
            to_usize(dest_index),
        )
    }) {
        Ok(MoveOutcome::Moved(())) => BoardActionResponse::success("Post moved.", None),
        Ok(MoveOutcome::Skipped) => BoardActionResponse::success("Nothing to move.", None),
        Err(err) => BoardActionResponse::failure(format!("move_across_groups failed: {err}")),
    }
}

/// Moves a post to another calendar day (`yyyy-MM-dd`).
#[flutter_rust_bridge::frb(sync)]
pub fn reclassify_by_target(post_id: String, dest_grouping_id: String) -> BoardActionResponse {
    let result = action("reclassify_by_target", "Post rescheduled.", |service| {
        service.reclassify_by_target(&post_id, &dest_grouping_id)
    });
    with_post_id(result, post_id)
}

#[flutter_rust_bridge::frb(sync)]
pub fn toggle_auto_post(post_id: String, value: bool) -> BoardActionResponse {
    let result = action("toggle_auto_post", "Auto post updated.", |service| {
        service.toggle_auto_post(&post_id, value)
    });
    with_post_id(result, post_id)
}

#[flutter_rust_bridge::frb(sync)]
pub fn reorder_feed(post_id: String, new_index: u32) -> BoardActionResponse {
    let result = action("reorder_feed", "Feed reordered.", |service| {
        service.reorder_feed(&post_id, to_usize(new_index))
    });
    with_post_id(result, post_id)
}

/// Starts a drag on `surface` (`board|calendar`) from one slot.
#[flutter_rust_bridge::frb(sync)]
pub fn drag_start(surface: String, grouping_id: String, index: u32) -> DragPreviewResponse {
    let Some(surface) = parse_surface(&surface) else {
        warn!("event=drag_start module=ffi status=error error_code=unknown_surface");
        return current_drag_preview()
            .failed(format!("drag_start failed: unknown surface `{}`", surface.trim()));
    };
    drag_call("drag_start", |service| {
        service.drag_start(surface, &grouping_id, to_usize(index))
    })
}

/// Updates the hover target; pass `None` when outside every grouping.
#[flutter_rust_bridge::frb(sync)]
pub fn drag_hover(grouping_id: Option<String>, index: Option<u32>) -> DragPreviewResponse {
    let target = grouping_id.map(|id| DropTarget::new(id, to_usize(index.unwrap_or(0))));
    let mut drag = lock_drag_state();
    let transition = std::mem::take(&mut *drag).apply(DragEvent::Hover(target));
    *drag = transition.state;
    to_drag_preview(&drag)
}

/// Ends the drag and commits the drop.
///
/// The session is over once this returns, even when the store cannot be
/// opened or the save fails.
#[flutter_rust_bridge::frb(sync)]
pub fn drag_end() -> BoardActionResponse {
    drag_end_at(&resolve_board_db_path())
}

#[flutter_rust_bridge::frb(sync)]
pub fn drag_cancel() -> DragPreviewResponse {
    let mut drag = lock_drag_state();
    *drag = DragState::Idle;
    to_drag_preview(&drag)
}

#[flutter_rust_bridge::frb(sync)]
pub fn drag_preview() -> DragPreviewResponse {
    current_drag_preview()
}

fn snapshot(
    op: &'static str,
    project: impl FnOnce(&BoardService<SqliteBoardRepository<'_>>) -> Vec<Grouping>,
) -> BoardSnapshotResponse {
    match with_board_service(op, |service| Ok(project(service))) {
        Ok(groupings) => BoardSnapshotResponse {
            ok: true,
            message: format!("{} grouping(s).", groupings.len()),
            groupings: groupings.iter().map(to_grouping_dto).collect(),
        },
        Err(err) => BoardSnapshotResponse {
            ok: false,
            groupings: Vec::new(),
            message: format!("{op} failed: {err}"),
        },
    }
}

fn action(
    op: &'static str,
    message: &'static str,
    f: impl FnOnce(&mut BoardService<SqliteBoardRepository<'_>>) -> Result<(), BoardServiceError>,
) -> BoardActionResponse {
    match with_board_service(op, f) {
        Ok(()) => BoardActionResponse::success(message, None),
        Err(err) => BoardActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn with_post_id(mut response: BoardActionResponse, post_id: String) -> BoardActionResponse {
    if response.ok {
        response.post_id = Some(post_id);
    }
    response
}

fn drag_end_at(db_path: &Path) -> BoardActionResponse {
    let mut drag = lock_drag_state();
    let transition = std::mem::take(&mut *drag).apply(DragEvent::End);
    *drag = transition.state;
    let Some(command) = transition.command else {
        return BoardActionResponse::success("Drop discarded.", None);
    };

    match with_board_service_at(db_path, &mut drag, "drag_end", |service| {
        service.commit_drop(command)
    }) {
        Ok(Some(command)) => BoardActionResponse::success("Drop committed.", Some(command.post_id)),
        Ok(None) => BoardActionResponse::success("Drop discarded.", None),
        Err(err) => BoardActionResponse::failure(format!("drag_end failed: {err}")),
    }
}

fn drag_call(
    op: &'static str,
    f: impl FnOnce(&mut BoardService<SqliteBoardRepository<'_>>) -> Result<(), BoardServiceError>,
) -> DragPreviewResponse {
    // Failure leaves the tracker as it was; the preview reports that state.
    let result = with_board_service(op, f);
    let preview = current_drag_preview();
    match result {
        Ok(()) => preview,
        Err(err) => preview.failed(format!("{op} failed: {err}")),
    }
}

fn current_drag_preview() -> DragPreviewResponse {
    to_drag_preview(&lock_drag_state())
}

fn lock_drag_state() -> std::sync::MutexGuard<'static, DragState> {
    DRAG_STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| StoreConfig::from_env().db_path)
        .clone()
}

fn with_board_service<T>(
    op: &'static str,
    f: impl FnOnce(&mut BoardService<SqliteBoardRepository<'_>>) -> Result<T, BoardServiceError>,
) -> Result<T, String> {
    let mut drag = lock_drag_state();
    with_board_service_at(&resolve_board_db_path(), &mut drag, op, f)
}

/// Runs `f` on a service over the store at `db_path`, carrying `drag` in
/// and back out. The caller holds the drag lock for the whole call.
fn with_board_service_at<T>(
    db_path: &Path,
    drag: &mut DragState,
    op: &'static str,
    f: impl FnOnce(&mut BoardService<SqliteBoardRepository<'_>>) -> Result<T, BoardServiceError>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| {
        warn!("event={op} module=ffi status=error error_code=db_open_failed");
        format!("board DB open failed: {err}")
    })?;
    let repo = SqliteBoardRepository::try_new(&conn)
        .map_err(|err| format!("board repo init failed: {err}"))?;
    let mut service = BoardService::open(repo, default_board())
        .map_err(|err| format!("board load failed: {err}"))?;

    service.resume_drag(std::mem::take(drag));
    let result = f(&mut service);
    *drag = service.take_drag_state();

    result.map_err(|err| {
        warn!("event={op} module=ffi status=error error={err}");
        err.to_string()
    })
}

fn parse_surface(value: &str) -> Option<DragSurface> {
    match value.trim().to_ascii_lowercase().as_str() {
        "board" | "kanban" => Some(DragSurface::Board),
        "calendar" => Some(DragSurface::Calendar),
        _ => None,
    }
}

fn parse_table_query(
    filter: String,
    sort_field: Option<String>,
    sort_direction: Option<String>,
) -> Result<TableQuery, String> {
    let sort = match sort_field {
        None => None,
        Some(field) => {
            let field = SortField::parse(&field)
                .ok_or_else(|| format!("unknown sort field `{}`", field.trim()))?;
            let direction = match sort_direction {
                None => SortDirection::Asc,
                Some(direction) => SortDirection::parse(&direction)
                    .ok_or_else(|| format!("unknown sort direction `{}`", direction.trim()))?,
            };
            Some(TableSort { field, direction })
        }
    };
    Ok(TableQuery { filter, sort })
}

fn to_post_patch(request: PostUpsertRequest) -> Result<PostPatch, String> {
    let platforms = request
        .platforms
        .map(|values| {
            values
                .iter()
                .map(|value| {
                    Platform::parse(value)
                        .ok_or_else(|| format!("unknown platform `{}`", value.trim()))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;
    Ok(PostPatch {
        id: request.id,
        title: request.title,
        description: request.description,
        date: request.date,
        time: request.time,
        platforms,
        image: request.image,
        author: request.author,
        likes: request.likes,
        notes: request.notes,
        auto_post: request.auto_post,
        grouping_id: request.grouping_id,
    })
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn to_post_dto(post: &Post) -> PostDto {
    PostDto {
        id: post.id.clone(),
        title: post.title.clone(),
        description: post.description.clone(),
        date: post.date.clone(),
        time: post.time.clone(),
        platforms: post
            .platforms
            .iter()
            .map(|platform| platform.as_str().to_string())
            .collect(),
        image: post.image.clone(),
        author: post.author.clone(),
        likes: post.likes,
        notes: post.notes.clone(),
        auto_post: post.auto_post,
    }
}

fn to_grouping_dto(grouping: &Grouping) -> GroupingDto {
    GroupingDto {
        id: grouping.id.clone(),
        title: grouping.title.clone(),
        count: to_u32(grouping.count()),
        posts: grouping.posts().iter().map(to_post_dto).collect(),
    }
}

fn to_table_row_dto(row: TableRow) -> TableRowDto {
    TableRowDto {
        post: to_post_dto(&row.post),
        status: row.status,
    }
}

fn to_feed_item_dto(item: FeedItem) -> FeedItemDto {
    FeedItemDto {
        id: item.id,
        image: item.image,
        title: item.title,
        grouping_id: item.grouping_id,
    }
}

fn to_drag_preview(state: &DragState) -> DragPreviewResponse {
    let Some(session) = state.session() else {
        return DragPreviewResponse {
            ok: true,
            active: false,
            post_id: None,
            source_grouping_id: None,
            hover_grouping_id: None,
            preview_index: None,
            message: String::new(),
        };
    };
    DragPreviewResponse {
        ok: true,
        active: true,
        post_id: Some(session.dragged_post.id.clone()),
        source_grouping_id: Some(session.source.grouping_id.clone()),
        hover_grouping_id: session.hover.as_ref().map(|hover| hover.grouping_id.clone()),
        preview_index: session.preview_index().map(to_u32),
        message: String::new(),
    }
}
