use crate::core::completion::{clear_if_unsent, mark_completed};
use crate::core::notify::{ChangeEvent, Notifier};
use crate::db::repo::{load_sessions, patch_problem, patch_session};
use crate::db::store::Store;
use crate::errors::{AppError, AppResult};
use crate::models::problem::DEFAULT_GRADE;
use crate::models::{Attempt, Problem, Session};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use std::collections::BTreeSet;

/// Fields to change on a problem; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProblemPatch {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub area: Option<String>,
    pub notes: Option<String>,
    /// An empty string removes the photo.
    pub photo_url: Option<String>,
}

impl ProblemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.grade.is_none()
            && self.area.is_none()
            && self.notes.is_none()
            && self.photo_url.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

impl SessionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.location.is_none() && self.notes.is_none()
    }
}

pub struct EditLogic;

impl EditLogic {
    pub fn problem(
        store: &mut dyn Store,
        notifier: &Notifier,
        id: &str,
        patch: ProblemPatch,
    ) -> AppResult<Problem> {
        if patch.is_empty() {
            return Err(AppError::Other("Nothing to update.".into()));
        }

        let mut fields = Map::new();
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Other("Problem name cannot be empty.".into()));
            }
            fields.insert("name".into(), json!(name));
        }
        if let Some(grade) = patch.grade {
            let grade = grade.trim();
            let grade = if grade.is_empty() { DEFAULT_GRADE } else { grade };
            fields.insert("grade".into(), json!(grade));
        }
        if let Some(area) = patch.area {
            fields.insert("area".into(), json!(area));
        }
        if let Some(notes) = patch.notes {
            fields.insert("notes".into(), json!(notes));
        }
        if let Some(url) = patch.photo_url {
            let url = url.trim();
            let value = if url.is_empty() { Value::Null } else { json!(url) };
            fields.insert("photoUrl".into(), value);
        }
        fields.insert("updatedAt".into(), json!(Utc::now()));

        let updated = patch_problem(store, id, Value::Object(fields))?;
        notifier.emit(ChangeEvent::ProblemsUpdated);
        Ok(updated)
    }

    pub fn session(
        store: &mut dyn Store,
        notifier: &Notifier,
        id: &str,
        patch: SessionPatch,
    ) -> AppResult<Session> {
        if patch.is_empty() {
            return Err(AppError::Other("Nothing to update.".into()));
        }

        let mut fields = Map::new();
        if let Some(date) = patch.date {
            fields.insert("date".into(), json!(date));
        }
        if let Some(location) = patch.location {
            fields.insert("location".into(), json!(location));
        }
        if let Some(notes) = patch.notes {
            fields.insert("notes".into(), json!(notes));
        }
        fields.insert("updatedAt".into(), json!(Utc::now()));

        let updated = patch_session(store, id, Value::Object(fields))?;
        notifier.emit(ChangeEvent::SessionsUpdated);
        Ok(updated)
    }

    /// Flip an attempt between send and attempt and keep the problem's
    /// completion date consistent. XP and achievements are left alone.
    pub fn toggle_attempt(
        store: &mut dyn Store,
        notifier: &Notifier,
        session_id: &str,
        attempt_id: &str,
    ) -> AppResult<Attempt> {
        let sessions = load_sessions(store)?;
        let mut session = sessions
            .into_iter()
            .find(|s| s.id == session_id)
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        let attempt = session
            .attempts
            .iter_mut()
            .find(|a| a.id == attempt_id)
            .ok_or_else(|| AppError::AttemptNotFound {
                session: session_id.to_string(),
                attempt: attempt_id.to_string(),
            })?;
        attempt.result = attempt.result.toggled();
        let toggled = attempt.clone();

        patch_session(
            store,
            session_id,
            json!({ "attempts": session.attempts, "updatedAt": Utc::now() }),
        )?;
        notifier.emit(ChangeEvent::SessionsUpdated);

        let ids = BTreeSet::from([toggled.problem_id.clone()]);
        let changed = if toggled.is_send() {
            mark_completed(store, &ids, session.date)?
        } else {
            clear_if_unsent(store, &ids)?
        };
        if !changed.is_empty() {
            notifier.emit(ChangeEvent::ProblemsUpdated);
        }

        Ok(toggled)
    }
}

