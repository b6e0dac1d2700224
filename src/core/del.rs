use crate::core::completion::clear_if_unsent;
use crate::core::notify::{ChangeEvent, Notifier};
use crate::db::repo::{load_problems, load_sessions, patch_session};
use crate::db::store::{Collection, Store};
use crate::errors::{AppError, AppResult};
use crate::models::{Problem, Session};
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeSet;

/// What removing an attempt did to its session.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptRemoval {
    /// The session still has attempts.
    Kept(Session),
    /// The attempt was the last one; the session is gone too.
    SessionDeleted(String),
}

pub struct DeleteLogic;

impl DeleteLogic {
    /// Attempts in sessions that point at the problem are left as they are.
    pub fn problem(store: &mut dyn Store, notifier: &Notifier, id: &str) -> AppResult<Problem> {
        let problem = load_problems(store)?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::ProblemNotFound(id.to_string()))?;

        store.remove(Collection::Problems, id)?;
        notifier.emit(ChangeEvent::ProblemsUpdated);
        Ok(problem)
    }

    pub fn session(store: &mut dyn Store, notifier: &Notifier, id: &str) -> AppResult<Session> {
        let session = find_session(store, id)?;

        store.remove(Collection::Sessions, id)?;
        notifier.emit(ChangeEvent::SessionsUpdated);

        let sent: BTreeSet<String> = session.sends().map(|a| a.problem_id.clone()).collect();
        if !clear_if_unsent(store, &sent)?.is_empty() {
            notifier.emit(ChangeEvent::ProblemsUpdated);
        }
        Ok(session)
    }

    pub fn attempt(
        store: &mut dyn Store,
        notifier: &Notifier,
        session_id: &str,
        attempt_id: &str,
    ) -> AppResult<AttemptRemoval> {
        let mut session = find_session(store, session_id)?;

        let idx = session
            .attempts
            .iter()
            .position(|a| a.id == attempt_id)
            .ok_or_else(|| AppError::AttemptNotFound {
                session: session_id.to_string(),
                attempt: attempt_id.to_string(),
            })?;
        let removed = session.attempts.remove(idx);

        let outcome = if session.attempts.is_empty() {
            store.remove(Collection::Sessions, session_id)?;
            AttemptRemoval::SessionDeleted(session_id.to_string())
        } else {
            let updated = patch_session(
                store,
                session_id,
                json!({ "attempts": session.attempts, "updatedAt": Utc::now() }),
            )?;
            AttemptRemoval::Kept(updated)
        };
        notifier.emit(ChangeEvent::SessionsUpdated);

        if removed.is_send() {
            let ids = BTreeSet::from([removed.problem_id]);
            if !clear_if_unsent(store, &ids)?.is_empty() {
                notifier.emit(ChangeEvent::ProblemsUpdated);
            }
        }
        Ok(outcome)
    }

    /// Clear every collection and setting, XP included.
    pub fn reset_all(store: &mut dyn Store, notifier: &Notifier) -> AppResult<()> {
        store.clear_all()?;
        notifier.emit_all(&[
            ChangeEvent::ProblemsUpdated,
            ChangeEvent::SessionsUpdated,
            ChangeEvent::AchievementsUpdated,
            ChangeEvent::SettingsUpdated,
        ]);
        tracing::info!("all data cleared");
        Ok(())
    }
}

fn find_session(store: &dyn Store, id: &str) -> AppResult<Session> {
    load_sessions(store)?
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
}
