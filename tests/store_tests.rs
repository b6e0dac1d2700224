use cruxlog::db::repo::{get_setting, load_state, set_draft, set_grade_prefix, set_xp};
use cruxlog::db::store::{Collection, MemoryStore, Store};
use cruxlog::db::{DbPool, SqliteStore};
use cruxlog::errors::AppError;
use cruxlog::models::{DraftSession, GradePrefix};
use serde_json::json;

mod common;
use common::day;

fn exercise_store(store: &mut dyn Store) {
    assert!(store.get_all(Collection::Problems).expect("get").is_empty());

    store
        .save(Collection::Problems, json!({ "id": "a", "name": "first" }))
        .expect("save a");
    store
        .save(Collection::Problems, json!({ "id": "b", "name": "second" }))
        .expect("save b");

    let dup = store.save(Collection::Problems, json!({ "id": "a" }));
    assert!(matches!(dup, Err(AppError::DuplicateId { .. })));

    // same id in another collection is fine
    store
        .save(Collection::Sessions, json!({ "id": "a", "attempts": [] }))
        .expect("save session");

    let all = store.get_all(Collection::Problems).expect("get");
    let ids: Vec<&str> = all.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    let patched = store
        .put(Collection::Problems, "a", json!({ "grade": "C4" }))
        .expect("put")
        .expect("record present");
    assert_eq!(patched["name"], "first");
    assert_eq!(patched["grade"], "C4");
    assert!(store.put(Collection::Problems, "zzz", json!({})).expect("put").is_none());

    store.remove(Collection::Problems, "a").expect("remove");
    assert_eq!(store.get_all(Collection::Problems).expect("get").len(), 1);

    store.set_setting("theme", json!("dark")).expect("set");
    store.set_setting("theme", json!("light")).expect("overwrite");
    assert_eq!(store.setting("theme").expect("get"), Some(json!("light")));
    assert_eq!(store.get_all_settings().expect("all").len(), 1);

    store
        .set_settings(&[("xp", json!(120)), ("theme", json!("dark"))])
        .expect("batch");
    assert_eq!(store.setting("xp").expect("get"), Some(json!(120)));
    assert_eq!(store.setting("theme").expect("get"), Some(json!("dark")));
    assert_eq!(store.get_all_settings().expect("all").len(), 2);

    store.clear_collection(Collection::Sessions).expect("clear");
    assert!(store.get_all(Collection::Sessions).expect("get").is_empty());
    assert_eq!(store.get_all(Collection::Problems).expect("get").len(), 1);

    store.clear_all().expect("clear all");
    assert!(store.get_all(Collection::Problems).expect("get").is_empty());
    assert!(store.get_all_settings().expect("all").is_empty());
}

#[test]
fn memory_store_semantics() {
    let mut store = MemoryStore::new();
    exercise_store(&mut store);
}

#[test]
fn sqlite_store_semantics() {
    let mut store: SqliteStore = DbPool::in_memory().expect("open");
    exercise_store(&mut store);
}

#[test]
fn sqlite_store_persists_across_connections() {
    let path = common::setup_test_db("store_persist");
    {
        let mut pool = DbPool::new(&path).expect("open");
        set_xp(&mut pool, 420).expect("xp");
        pool.save(Collection::Problems, json!({ "id": "p1", "name": "x" }))
            .expect("save");
    }
    let pool = DbPool::new(&path).expect("reopen");
    assert_eq!(load_state(&pool).expect("state").xp, 420);
    assert_eq!(pool.get_all(Collection::Problems).expect("get").len(), 1);
}

#[test]
fn settings_fall_back_to_defaults() {
    let mut store = MemoryStore::new();
    let state = load_state(&store).expect("state");
    assert_eq!(state.xp, 0);
    assert_eq!(state.grade_prefix, GradePrefix::C);
    assert!(state.draft_session.is_none());

    // wrong shape is ignored
    store.set_setting("xp", json!("lots")).expect("set");
    assert_eq!(get_setting(&store, "xp", 7u64).expect("get"), 7);

    set_grade_prefix(&mut store, GradePrefix::V).expect("prefix");
    assert_eq!(store.setting("gradePrefix").expect("get"), Some(json!("V")));
    assert_eq!(load_state(&store).expect("state").grade_prefix, GradePrefix::V);

    let draft = DraftSession::new(day(2025, 6, 2));
    set_draft(&mut store, Some(&draft)).expect("draft");
    assert_eq!(load_state(&store).expect("state").draft_session, Some(draft));
    set_draft(&mut store, None).expect("clear");
    assert!(load_state(&store).expect("state").draft_session.is_none());
}

#[test]
fn legacy_fail_result_reads_as_attempt() {
    let mut store = MemoryStore::new();
    store
        .save(
            Collection::Sessions,
            json!({
                "id": "s1",
                "date": "2025-06-02T12:00:00Z",
                "attempts": [
                    { "id": "x", "problemId": "p", "result": "fail", "timestamp": "2025-06-02T12:00:00Z" }
                ],
                "createdAt": "2025-06-02T12:00:00Z",
                "updatedAt": "2025-06-02T12:00:00Z"
            }),
        )
        .expect("save");

    let sessions = cruxlog::db::repo::load_sessions(&store).expect("load");
    assert_eq!(sessions[0].send_count(), 0);
    assert_eq!(sessions[0].attempts[0].result.as_str(), "attempt");
}
