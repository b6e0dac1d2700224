//! In-progress session kept in the `draftSession` setting between commands.

use crate::core::notify::{ChangeEvent, Notifier};
use crate::db::repo::{get_setting, set_draft};
use crate::db::store::Store;
use crate::errors::AppResult;
use crate::models::settings::SETTING_DRAFT;
use crate::models::{Attempt, AttemptResult, DraftSession, SessionFields};
use chrono::Utc;

pub struct DraftLogic;

impl DraftLogic {
    pub fn current(store: &dyn Store) -> AppResult<Option<DraftSession>> {
        get_setting(store, SETTING_DRAFT, None)
    }

    /// Append an attempt, starting a draft when none exists.
    pub fn add_attempt(
        store: &mut dyn Store,
        notifier: &Notifier,
        problem_id: &str,
        result: AttemptResult,
        notes: Option<String>,
    ) -> AppResult<DraftSession> {
        let mut draft = Self::current(store)?.unwrap_or_else(|| DraftSession::new(Utc::now()));
        draft.attempts.push(Attempt::new(problem_id, result, notes));

        set_draft(store, Some(&draft))?;
        notifier.emit(ChangeEvent::SettingsUpdated);
        Ok(draft)
    }

    pub fn set_details(
        store: &mut dyn Store,
        notifier: &Notifier,
        location: Option<String>,
        notes: Option<String>,
    ) -> AppResult<DraftSession> {
        let mut draft = Self::current(store)?.unwrap_or_else(|| DraftSession::new(Utc::now()));
        if let Some(l) = location {
            draft.location = l;
        }
        if let Some(n) = notes {
            draft.notes = n;
        }

        set_draft(store, Some(&draft))?;
        notifier.emit(ChangeEvent::SettingsUpdated);
        Ok(draft)
    }

    /// Drop the draft. Returns whether there was one.
    pub fn discard(store: &mut dyn Store, notifier: &Notifier) -> AppResult<bool> {
        let existed = Self::current(store)?.is_some();
        if existed {
            set_draft(store, None)?;
            notifier.emit(ChangeEvent::SettingsUpdated);
        }
        Ok(existed)
    }

    /// Session fields built from the draft; the draft itself stays until the
    /// session is saved.
    pub fn to_fields(draft: &DraftSession) -> SessionFields {
        SessionFields {
            date: None,
            location: Some(draft.location.clone()),
            notes: Some(draft.notes.clone()),
            attempts: draft.attempts.clone(),
        }
    }
}
