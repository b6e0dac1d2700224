//! Keeps `completedDate` on problems in step with the sends recorded in sessions.

use crate::db::repo::{load_problems, load_sessions, patch_problem};
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::models::Session;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::collections::BTreeSet;

/// Stamp `completed` on each listed problem that has no completion date yet.
/// Returns the ids actually stamped; unknown ids are skipped.
pub fn mark_completed(
    store: &mut dyn Store,
    problem_ids: &BTreeSet<String>,
    completed: DateTime<Utc>,
) -> AppResult<Vec<String>> {
    let problems = load_problems(store)?;
    let mut stamped = Vec::new();

    for p in problems
        .iter()
        .filter(|p| problem_ids.contains(&p.id) && !p.is_completed())
    {
        patch_problem(store, &p.id, json!({ "completedDate": completed }))?;
        stamped.push(p.id.clone());
    }
    Ok(stamped)
}

/// Stamp the sent problems of a session with the session date.
pub fn mark_session_sends(store: &mut dyn Store, session: &Session) -> AppResult<Vec<String>> {
    let sent: BTreeSet<String> = session.sends().map(|a| a.problem_id.clone()).collect();
    mark_completed(store, &sent, session.date)
}

/// Clear `completedDate` on problems that no longer have any send in any
/// stored session. Returns the ids cleared.
pub fn clear_if_unsent(store: &mut dyn Store, problem_ids: &BTreeSet<String>) -> AppResult<Vec<String>> {
    if problem_ids.is_empty() {
        return Ok(Vec::new());
    }

    let sessions = load_sessions(store)?;
    let problems = load_problems(store)?;
    let mut cleared = Vec::new();

    for p in problems
        .iter()
        .filter(|p| problem_ids.contains(&p.id) && p.is_completed())
    {
        if sessions.iter().any(|s| s.has_send_on(&p.id)) {
            continue;
        }
        patch_problem(store, &p.id, json!({ "completedDate": Value::Null }))?;
        cleared.push(p.id.clone());
    }
    Ok(cleared)
}
