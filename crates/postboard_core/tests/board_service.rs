use postboard_core::db::open_db_in_memory;
use postboard_core::repo::board_repo::BoardRepoResult;
use postboard_core::{
    default_board, BoardRepoError, BoardRepository, BoardService, BoardServiceError, DbError,
    DragEvent, DragState, DragSurface, DropTarget, Grouping, GroupingSet, MoveOutcome, Platform, Post, PostPatch,
    ReorderError, SqliteBoardRepository,
};
use std::cell::{Cell, RefCell};

fn post(id: &str, date: &str) -> Post {
    Post {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        date: date.to_string(),
        time: "7:00 AM".to_string(),
        platforms: vec![Platform::Instagram],
        image: "/default-image.png".to_string(),
        author: "John Doe".to_string(),
        likes: 0,
        notes: String::new(),
        auto_post: false,
    }
}

fn small_board() -> GroupingSet {
    GroupingSet::new(vec![
        Grouping::with_posts(
            "idea",
            "Idea",
            vec![
                post("A", "June 1, 2025"),
                post("B", "June 1, 2025"),
                post("C", "June 3, 2025"),
            ],
        ),
        Grouping::with_posts("progress", "In Progress", vec![post("D", "June 3, 2025")]),
        Grouping::new("closed", "Closed"),
    ])
}

fn ids(set: &GroupingSet, grouping_id: &str) -> Vec<String> {
    set.get(grouping_id)
        .unwrap()
        .posts()
        .iter()
        .map(|post| post.id.clone())
        .collect()
}

/// In-memory repository whose saves can be switched to fail.
#[derive(Default)]
struct FlakyRepo {
    stored: RefCell<Option<GroupingSet>>,
    fail_saves: Cell<bool>,
    saves: Cell<usize>,
}

impl BoardRepository for &FlakyRepo {
    fn load(&self) -> BoardRepoResult<Option<GroupingSet>> {
        Ok(self.stored.borrow().clone())
    }

    fn save(&self, set: &GroupingSet) -> BoardRepoResult<()> {
        if self.fail_saves.get() {
            return Err(BoardRepoError::Db(DbError::Sqlite(
                rusqlite::Error::InvalidQuery,
            )));
        }
        self.saves.set(self.saves.get() + 1);
        *self.stored.borrow_mut() = Some(set.clone());
        Ok(())
    }
}

#[test]
fn open_seeds_default_board_and_reuses_stored_state() {
    let conn = open_db_in_memory().unwrap();
    let mut service =
        BoardService::open(SqliteBoardRepository::try_new(&conn).unwrap(), default_board())
            .unwrap();
    assert_eq!(service.groupings().total_posts(), 12);

    service.move_within_group("idea", 0, 1).unwrap();
    drop(service);

    let reopened =
        BoardService::open(SqliteBoardRepository::try_new(&conn).unwrap(), default_board())
            .unwrap();
    assert_eq!(ids(reopened.groupings(), "idea")[..2].to_vec(), vec!["post-2", "post-1"]);
}

#[test]
fn every_committed_mutation_is_saved() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();
    assert_eq!(repo.saves.get(), 1);

    service.move_within_group("idea", 0, 2).unwrap();
    service.move_across_groups("idea", 0, "closed", 0).unwrap();
    service.toggle_auto_post("D", true).unwrap();
    service.reclassify_by_target("D", "2025-06-15").unwrap();
    service.reorder_feed("D", 0).unwrap();
    assert_eq!(repo.saves.get(), 6);
    assert_eq!(repo.stored.borrow().as_ref(), Some(service.groupings()));

    let stored = repo.stored.borrow().clone().unwrap();
    assert_eq!(ids(&stored, "idea"), vec!["C", "A"]);
    assert_eq!(ids(&stored, "closed"), vec!["B"]);
    let d = stored.post("D").unwrap();
    assert!(d.auto_post);
    assert_eq!(d.date, "June 15, 2025");
}

#[test]
fn noop_moves_do_not_write() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    service.move_within_group("idea", 1, 1).unwrap();
    assert_eq!(
        service.move_across_groups("idea", 1, "idea", 1).unwrap(),
        MoveOutcome::Skipped
    );
    assert_eq!(repo.saves.get(), 1);
}

#[test]
fn rejected_operations_leave_state_untouched() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    assert!(matches!(
        service.move_within_group("idea", 0, 9),
        Err(BoardServiceError::Reorder(ReorderError::InvalidIndex { .. }))
    ));
    assert!(matches!(
        service.move_across_groups("idea", 0, "stale", 0),
        Err(BoardServiceError::Reorder(ReorderError::GroupingNotFound(_)))
    ));
    assert!(matches!(
        service.toggle_auto_post("nope", true),
        Err(BoardServiceError::Reorder(ReorderError::PostNotFound(_)))
    ));
    assert_eq!(service.groupings(), &small_board());
    assert_eq!(repo.saves.get(), 1);
}

#[test]
fn create_appends_with_defaults_to_target_grouping() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    let default_id = service.create_or_update_post(&PostPatch::default()).unwrap();
    let created = service.groupings().post(&default_id).unwrap();
    assert!(default_id.starts_with("post-"));
    assert_eq!(created.title, "Untitled Post");
    assert_eq!(created.author, "John Doe");
    assert_eq!(created.image, "/default-image.png");
    assert_eq!(created.platforms, vec![Platform::Instagram]);
    assert_eq!(ids(service.groupings(), "idea").last(), Some(&default_id));

    let closed_id = service
        .create_or_update_post(&PostPatch {
            title: Some("Wrap-up".to_string()),
            grouping_id: Some("closed".to_string()),
            ..PostPatch::default()
        })
        .unwrap();
    assert_eq!(ids(service.groupings(), "closed"), vec![closed_id]);

    assert!(matches!(
        service.create_or_update_post(&PostPatch {
            grouping_id: Some("archive".to_string()),
            ..PostPatch::default()
        }),
        Err(BoardServiceError::Reorder(ReorderError::GroupingNotFound(_)))
    ));
}

#[test]
fn update_merges_fields_in_place() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    let id = service
        .create_or_update_post(&PostPatch {
            id: Some("B".to_string()),
            title: Some("Renamed".to_string()),
            likes: Some(42),
            ..PostPatch::default()
        })
        .unwrap();
    assert_eq!(id, "B");
    let b = service.groupings().post("B").unwrap();
    assert_eq!(b.title, "Renamed");
    assert_eq!(b.likes, 42);
    assert_eq!(b.date, "June 1, 2025");
    assert_eq!(ids(service.groupings(), "idea"), vec!["A", "B", "C"]);

    assert!(matches!(
        service.create_or_update_post(&PostPatch {
            id: Some("B".to_string()),
            platforms: Some(Vec::new()),
            ..PostPatch::default()
        }),
        Err(BoardServiceError::Validation(_))
    ));
    assert!(matches!(
        service.create_or_update_post(&PostPatch {
            id: Some("ghost".to_string()),
            ..PostPatch::default()
        }),
        Err(BoardServiceError::Reorder(ReorderError::PostNotFound(_)))
    ));
}

#[test]
fn board_drag_across_columns_commits_move() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    service.drag_start(DragSurface::Board, "idea", 0).unwrap();
    service.drag_hover(Some(DropTarget::new("progress", 1)));
    assert_eq!(
        service.drag_state().session().unwrap().preview_in("progress"),
        Some(1)
    );
    assert_eq!(service.groupings(), &small_board());

    let command = service.drag_end().unwrap().unwrap();
    assert_eq!(command.post_id, "A");
    assert!(!service.drag_state().is_dragging());
    assert_eq!(ids(service.groupings(), "progress"), vec!["D", "A"]);
    assert_eq!(ids(service.groupings(), "idea"), vec!["B", "C"]);
}

#[test]
fn board_drag_within_column_reorders_and_clamps_past_end() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    service.drag_start(DragSurface::Board, "idea", 0).unwrap();
    service.drag_hover(Some(DropTarget::new("idea", 3)));
    assert!(service.drag_end().unwrap().is_some());
    assert_eq!(ids(service.groupings(), "idea"), vec!["B", "C", "A"]);
}

#[test]
fn drag_cancel_and_empty_drop_change_nothing() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    service.drag_start(DragSurface::Board, "idea", 1).unwrap();
    service.drag_hover(Some(DropTarget::new("closed", 0)));
    service.drag_cancel();
    assert!(service.drag_end().unwrap().is_none());

    service.drag_start(DragSurface::Board, "idea", 1).unwrap();
    service.drag_hover(None);
    assert!(service.drag_end().unwrap().is_none());

    assert_eq!(service.groupings(), &small_board());
    assert_eq!(repo.saves.get(), 1);
}

#[test]
fn drag_start_rejects_unknown_slot() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    assert!(matches!(
        service.drag_start(DragSurface::Board, "idea", 7),
        Err(BoardServiceError::Reorder(ReorderError::InvalidIndex { .. }))
    ));
    assert!(!service.drag_state().is_dragging());
}

#[test]
fn calendar_drag_rewrites_date_only() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    service
        .drag_start(DragSurface::Calendar, "2025-06-01", 1)
        .unwrap();
    assert_eq!(
        service.drag_state().session().unwrap().dragged_post.id,
        "B"
    );
    service.drag_hover(Some(DropTarget::new("2025-06-03", 0)));
    service.drag_end().unwrap().unwrap();

    assert_eq!(service.groupings().post("B").unwrap().date, "June 3, 2025");
    assert_eq!(ids(service.groupings(), "idea"), vec!["A", "B", "C"]);
    let calendar = service.calendar();
    assert_eq!(ids(&calendar, "2025-06-03"), vec!["B", "C", "D"]);
}

#[test]
fn calendar_drop_on_non_date_bucket_is_discarded() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    service
        .drag_start(DragSurface::Calendar, "2025-06-01", 0)
        .unwrap();
    service.drag_hover(Some(DropTarget::new("unscheduled", 0)));
    assert!(service.drag_end().unwrap().is_none());
    assert_eq!(service.groupings(), &small_board());
}

#[test]
fn drop_ended_outside_the_service_commits_on_a_fresh_service() {
    let repo = FlakyRepo::default();
    let mut first = BoardService::open(&repo, small_board()).unwrap();
    first.drag_start(DragSurface::Board, "idea", 2).unwrap();
    first.drag_hover(Some(DropTarget::new("closed", 0)));
    let tracker = first.take_drag_state();
    drop(first);

    let transition = tracker.apply(DragEvent::End);
    assert_eq!(transition.state, DragState::Idle);
    let command = transition.command.unwrap();

    let mut second = BoardService::open(&repo, small_board()).unwrap();
    assert_eq!(second.commit_drop(command).unwrap().unwrap().post_id, "C");
    assert_eq!(ids(repo.stored.borrow().as_ref().unwrap(), "closed"), vec!["C"]);
}

#[test]
fn drag_end_with_failing_save_still_ends_the_session() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();
    service.drag_start(DragSurface::Board, "idea", 0).unwrap();
    service.drag_hover(Some(DropTarget::new("closed", 0)));

    repo.fail_saves.set(true);
    assert!(matches!(
        service.drag_end(),
        Err(BoardServiceError::PersistenceFailure(_))
    ));
    assert!(!service.drag_state().is_dragging());
    assert_eq!(ids(service.groupings(), "closed"), vec!["A"]);
}

#[test]
fn failed_save_keeps_memory_state_and_persist_retries() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();

    repo.fail_saves.set(true);
    assert!(matches!(
        service.move_within_group("idea", 0, 2),
        Err(BoardServiceError::PersistenceFailure(_))
    ));
    assert_eq!(ids(service.groupings(), "idea"), vec!["B", "C", "A"]);
    assert_eq!(ids(repo.stored.borrow().as_ref().unwrap(), "idea"), vec!["A", "B", "C"]);

    repo.fail_saves.set(false);
    service.persist().unwrap();
    assert_eq!(repo.stored.borrow().as_ref(), Some(service.groupings()));
}

#[test]
fn projections_follow_canonical_state() {
    let repo = FlakyRepo::default();
    let mut service = BoardService::open(&repo, small_board()).unwrap();
    service.reorder_feed("D", 0).unwrap();

    assert_eq!(service.kanban().len(), 3);
    assert_eq!(service.feed()[0].id, "A");
    assert_eq!(service.feed().len(), 4);
    assert_eq!(service.table(&Default::default()).len(), 4);
}
