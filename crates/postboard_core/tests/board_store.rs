use postboard_core::db::{open_db, open_db_in_memory};
use postboard_core::repo::board_repo::BOARD_RECORD_KEY;
use postboard_core::{
    default_board, BoardRepoError, BoardRepository, Grouping, GroupingSet, Platform, Post,
    SetInvariantError, SqliteBoardRepository,
};
use rusqlite::Connection;
use serde_json::Value;

fn post(id: &str) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Title {id}"),
        description: String::new(),
        date: "June 1, 2025".to_string(),
        time: "7:00 AM".to_string(),
        platforms: vec![Platform::Instagram, Platform::Tiktok],
        image: "/default-image.png".to_string(),
        author: "John Doe".to_string(),
        likes: 3,
        notes: "note".to_string(),
        auto_post: true,
    }
}

fn stored_json(conn: &Connection) -> Value {
    let raw: String = conn
        .query_row(
            "SELECT value FROM kv_records WHERE key = ?1;",
            [BOARD_RECORD_KEY],
            |row| row.get(0),
        )
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn write_raw(conn: &Connection, raw: &str) {
    conn.execute(
        "INSERT INTO kv_records (key, value) VALUES (?1, ?2);",
        [BOARD_RECORD_KEY, raw],
    )
    .unwrap();
}

#[test]
fn load_returns_none_before_first_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    assert_eq!(repo.load().unwrap(), None);
}

#[test]
fn save_then_load_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    let set = GroupingSet::new(vec![
        Grouping::with_posts("idea", "Idea", vec![post("a"), post("b")]),
        Grouping::new("closed", "Closed"),
    ]);

    repo.save(&set).unwrap();
    assert_eq!(repo.load().unwrap(), Some(set.clone()));

    let moved = GroupingSet::new(vec![
        Grouping::with_posts("idea", "Idea", vec![post("b")]),
        Grouping::with_posts("closed", "Closed", vec![post("a")]),
    ]);
    repo.save(&moved).unwrap();
    assert_eq!(repo.load().unwrap(), Some(moved));
}

#[test]
fn stored_record_uses_camel_case_and_derived_counts() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    repo.save(&GroupingSet::new(vec![Grouping::with_posts(
        "idea",
        "Idea",
        vec![post("a"), post("b")],
    )]))
    .unwrap();

    let json = stored_json(&conn);
    let column = &json[0];
    assert_eq!(column["id"], "idea");
    assert_eq!(column["count"], 2);
    assert_eq!(column["posts"][0]["autoPost"], true);
    assert_eq!(column["posts"][0]["date"], "June 1, 2025");
    assert_eq!(column["posts"][0]["platforms"][1], "tiktok");
}

#[test]
fn stale_stored_count_is_recomputed_and_missing_auto_post_defaults_false() {
    let conn = open_db_in_memory().unwrap();
    write_raw(
        &conn,
        r#"[{"id":"idea","title":"Idea","count":7,"posts":[
            {"id":"post-1","title":"Post a Banner","description":"","date":"July 25, 2025",
             "time":"7:00 AM","platforms":["tiktok"],"image":"/x.png","author":"John Doe",
             "likes":0,"notes":""}]}]"#,
    );
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();

    let set = repo.load().unwrap().unwrap();
    let idea = set.get("idea").unwrap();
    assert_eq!(idea.count(), 1);
    assert!(!idea.posts()[0].auto_post);
}

#[test]
fn load_rejects_duplicate_post_ids() {
    let conn = open_db_in_memory().unwrap();
    let set = GroupingSet::new(vec![
        Grouping::with_posts("idea", "Idea", vec![post("a")]),
        Grouping::with_posts("closed", "Closed", vec![post("a")]),
    ]);
    write_raw(&conn, &serde_json::to_string(&set).unwrap());
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();

    match repo.load().unwrap_err() {
        BoardRepoError::InvalidData(SetInvariantError::DuplicatePost(id)) => assert_eq!(id, "a"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn load_rejects_malformed_json() {
    let conn = open_db_in_memory().unwrap();
    write_raw(&conn, "{not json");
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    assert!(matches!(
        repo.load().unwrap_err(),
        BoardRepoError::Serialization(_)
    ));
}

#[test]
fn seed_if_empty_persists_default_once() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();

    let seeded = repo.seed_if_empty(default_board()).unwrap();
    assert_eq!(seeded.total_posts(), 12);

    let custom = GroupingSet::new(vec![Grouping::new("idea", "Idea")]);
    repo.save(&custom).unwrap();
    assert_eq!(repo.seed_if_empty(default_board()).unwrap(), custom);
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteBoardRepository::try_new(&conn) {
        Err(BoardRepoError::UninitializedConnection {
            actual_version, ..
        }) => assert_eq!(actual_version, 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection must be rejected"),
    }
}

#[test]
fn board_survives_reopening_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");
    let set = GroupingSet::new(vec![Grouping::with_posts("idea", "Idea", vec![post("a")])]);

    {
        let conn = open_db(&path).unwrap();
        SqliteBoardRepository::try_new(&conn).unwrap().save(&set).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteBoardRepository::try_new(&conn).unwrap();
    assert_eq!(repo.load().unwrap(), Some(set));
}

#[test]
fn custom_key_isolates_records() {
    let conn = open_db_in_memory().unwrap();
    let main = SqliteBoardRepository::try_new(&conn).unwrap();
    let scratch = SqliteBoardRepository::with_key(&conn, "scratch-board").unwrap();

    scratch
        .save(&GroupingSet::new(vec![Grouping::new("idea", "Idea")]))
        .unwrap();
    assert_eq!(main.load().unwrap(), None);
    assert!(scratch.load().unwrap().is_some());
}
