use cruxlog::core::backup::{BackupLogic, ImportMode};
use cruxlog::core::notify::Notifier;
use cruxlog::db::repo::{load_problems, load_sessions, load_state, save_problem, save_session, set_xp};
use cruxlog::db::store::{MemoryStore, Store};
use cruxlog::errors::AppError;
use serde_json::json;
use std::fs;

mod common;
use common::{day, problem, send, session_on, temp_out};

fn populated() -> MemoryStore {
    let mut store = MemoryStore::new();
    let p = problem("pinch", "C4", day(2025, 6, 1));
    save_problem(&mut store, &p).expect("problem");
    save_session(&mut store, &session_on(day(2025, 6, 2), vec![send(&p)])).expect("session");
    set_xp(&mut store, 310).expect("xp");
    store
}

#[test]
fn empty_object_is_rejected() {
    let res = BackupLogic::parse("{}");
    assert!(matches!(res, Err(AppError::InvalidBackup(_))));
}

#[test]
fn malformed_documents_are_rejected() {
    for text in [
        "not json",
        "[]",
        r#"{ "problems": {} }"#,
        r#"{ "settings": [] }"#,
        r#"{ "problems": [ { "name": "no id" } ] }"#,
    ] {
        assert!(
            matches!(BackupLogic::parse(text), Err(AppError::InvalidBackup(_))),
            "accepted: {text}"
        );
    }
}

#[test]
fn duplicate_ids_are_rejected() {
    let p = problem("a", "C1", day(2025, 6, 1));
    let doc = json!({ "problems": [p, p] }).to_string();
    assert!(matches!(BackupLogic::parse(&doc), Err(AppError::InvalidBackup(_))));
}

#[test]
fn replace_with_problems_only_clears_the_rest() {
    let mut store = populated();
    let incoming = problem("new", "C6", day(2025, 6, 3));
    let doc = json!({ "problems": [incoming] }).to_string();

    let parsed = BackupLogic::parse(&doc).expect("parse");
    let report = BackupLogic::import(&mut store, &Notifier::new(), parsed, ImportMode::Replace)
        .expect("import");

    assert_eq!(report.problems_added, 1);
    let problems = load_problems(&store).expect("problems");
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].name, "new");
    assert!(load_sessions(&store).expect("sessions").is_empty());
    assert_eq!(load_state(&store).expect("state").xp, 0);
}

#[test]
fn merge_keeps_existing_data_and_skips_known_ids() {
    let mut store = populated();
    let existing = load_problems(&store).expect("problems").remove(0);
    let incoming = problem("new", "C6", day(2025, 6, 3));
    let doc = json!({ "problems": [existing, incoming], "settings": { "theme": "dark" } }).to_string();

    let parsed = BackupLogic::parse(&doc).expect("parse");
    let report = BackupLogic::import(&mut store, &Notifier::new(), parsed, ImportMode::Merge)
        .expect("import");

    assert_eq!(report.problems_added, 1);
    assert_eq!(report.problems_skipped, 1);
    assert_eq!(report.settings_applied, 1);
    assert_eq!(load_problems(&store).expect("problems").len(), 2);
    assert_eq!(load_sessions(&store).expect("sessions").len(), 1);

    let state = load_state(&store).expect("state");
    assert_eq!(state.xp, 310);
    assert_eq!(state.theme.as_str(), "dark");
}

#[test]
fn export_then_import_restores_everything() {
    let source = populated();
    let out = temp_out("backup_roundtrip", "json");

    let written = BackupLogic::export(&source, std::path::Path::new(&out), false).expect("export");
    let text = fs::read_to_string(&written).expect("read");
    assert!(text.contains("\"exportedAt\""));
    assert!(text.contains("\"problemId\""));

    let mut target = MemoryStore::new();
    let parsed = BackupLogic::parse(&text).expect("parse");
    BackupLogic::import(&mut target, &Notifier::new(), parsed, ImportMode::Replace).expect("import");

    assert_eq!(
        load_problems(&target).expect("problems"),
        load_problems(&source).expect("problems")
    );
    assert_eq!(
        load_sessions(&target).expect("sessions"),
        load_sessions(&source).expect("sessions")
    );
    assert_eq!(target.setting("xp").expect("xp"), Some(json!(310)));
}

#[test]
fn compressed_export_writes_zip() {
    let source = populated();
    let out = temp_out("backup_zip", "json");
    let zip_path = std::path::Path::new(&out).with_extension("zip");
    fs::remove_file(&zip_path).ok();

    let written = BackupLogic::export(&source, std::path::Path::new(&out), true).expect("export");
    assert_eq!(written, zip_path);
    assert!(zip_path.exists());
    assert!(!std::path::Path::new(&out).exists());
}
