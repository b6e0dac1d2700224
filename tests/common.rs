#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDate, Utc};
use cruxlog::models::{Attempt, AttemptResult, Problem, ProblemFields, Session, SessionFields};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn crux() -> Command {
    cargo_bin_cmd!("cruxlog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_cruxlog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a test DB and add two problems
pub fn init_db_with_problems(db_path: &str) {
    crux()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    crux()
        .args(["--db", db_path, "add", "Pinch Roof", "--grade", "C4", "--area", "North Wall"])
        .assert()
        .success();

    crux()
        .args(["--db", db_path, "add", "Slab Dance", "--grade", "C2"])
        .assert()
        .success();
}

/// Noon UTC on the given day.
pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
        .and_utc()
}

pub fn problem(name: &str, grade: &str, created: DateTime<Utc>) -> Problem {
    Problem::new_at(
        ProblemFields {
            name: name.to_string(),
            grade: Some(grade.to_string()),
            ..ProblemFields::default()
        },
        created,
    )
}

pub fn send(p: &Problem) -> Attempt {
    Attempt::new(p.id.clone(), AttemptResult::Send, None)
}

pub fn miss(p: &Problem) -> Attempt {
    Attempt::new(p.id.clone(), AttemptResult::Attempt, None)
}

pub fn session_on(date: DateTime<Utc>, attempts: Vec<Attempt>) -> Session {
    Session::new_at(
        SessionFields {
            date: Some(date),
            attempts,
            ..SessionFields::default()
        },
        date,
    )
}
