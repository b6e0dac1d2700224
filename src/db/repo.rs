//! Typed access to the store: problems, sessions and the settings bag.

use crate::db::store::{Collection, Store};
use crate::errors::{AppError, AppResult};
use crate::models::settings::{
    SETTING_ACHIEVEMENTS, SETTING_DRAFT, SETTING_GRADE_PREFIX, SETTING_THEME, SETTING_XP,
};
use crate::models::{AppState, DraftSession, GradePrefix, Problem, Session, Theme};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;

fn decode_all<T: DeserializeOwned>(store: &dyn Store, collection: Collection) -> AppResult<Vec<T>> {
    store
        .get_all(collection)?
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(AppError::from))
        .collect()
}

pub fn load_problems(store: &dyn Store) -> AppResult<Vec<Problem>> {
    decode_all(store, Collection::Problems)
}

pub fn load_sessions(store: &dyn Store) -> AppResult<Vec<Session>> {
    decode_all(store, Collection::Sessions)
}

pub fn save_problem(store: &mut dyn Store, problem: &Problem) -> AppResult<()> {
    store.save(Collection::Problems, serde_json::to_value(problem)?)?;
    Ok(())
}

pub fn save_session(store: &mut dyn Store, session: &Session) -> AppResult<()> {
    store.save(Collection::Sessions, serde_json::to_value(session)?)?;
    Ok(())
}

/// Merge `patch` into a problem and return the updated record.
pub fn patch_problem(store: &mut dyn Store, id: &str, patch: Value) -> AppResult<Problem> {
    let updated = store
        .put(Collection::Problems, id, patch)?
        .ok_or_else(|| AppError::ProblemNotFound(id.to_string()))?;
    Ok(serde_json::from_value(updated)?)
}

pub fn patch_session(store: &mut dyn Store, id: &str, patch: Value) -> AppResult<Session> {
    let updated = store
        .put(Collection::Sessions, id, patch)?
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))?;
    Ok(serde_json::from_value(updated)?)
}

/// Look a problem up by id, or by name (case-insensitive) when no id matches.
pub fn find_problem<'a>(problems: &'a [Problem], key: &str) -> Option<&'a Problem> {
    problems
        .iter()
        .find(|p| p.id == key)
        .or_else(|| problems.iter().find(|p| p.name.eq_ignore_ascii_case(key.trim())))
}

/// Like [`find_problem`] but over the stored problems, failing when unknown.
pub fn resolve_problem(store: &dyn Store, key: &str) -> AppResult<Problem> {
    let problems = load_problems(store)?;
    find_problem(&problems, key)
        .cloned()
        .ok_or_else(|| AppError::ProblemNotFound(key.to_string()))
}

/// Read a setting, falling back to `default` when absent or of the wrong shape.
pub fn get_setting<T: DeserializeOwned>(store: &dyn Store, name: &str, default: T) -> AppResult<T> {
    match store.setting(name)? {
        None | Some(Value::Null) => Ok(default),
        Some(v) => match serde_json::from_value(v) {
            Ok(val) => Ok(val),
            Err(e) => {
                tracing::warn!(setting = name, error = %e, "ignoring malformed setting");
                Ok(default)
            }
        },
    }
}

pub fn set_setting<T: Serialize>(store: &mut dyn Store, name: &str, value: &T) -> AppResult<()> {
    store.set_setting(name, serde_json::to_value(value)?)
}

pub fn load_state(store: &dyn Store) -> AppResult<AppState> {
    let prefix: String = get_setting(store, SETTING_GRADE_PREFIX, "C".to_string())?;
    Ok(AppState {
        theme: get_setting(store, SETTING_THEME, Theme::default())?,
        grade_prefix: GradePrefix::from_code(&prefix).unwrap_or_default(),
        xp: get_setting(store, SETTING_XP, 0u64)?,
        achievements_unlocked: get_setting(store, SETTING_ACHIEVEMENTS, BTreeSet::new())?,
        draft_session: get_setting(store, SETTING_DRAFT, None)?,
    })
}

pub fn set_xp(store: &mut dyn Store, xp: u64) -> AppResult<()> {
    set_setting(store, SETTING_XP, &xp)
}

/// Record the unlocked set and the XP that includes its rewards in one write.
pub fn commit_achievements(
    store: &mut dyn Store,
    unlocked: &BTreeSet<String>,
    xp: u64,
) -> AppResult<()> {
    store.set_settings(&[
        (SETTING_ACHIEVEMENTS, serde_json::to_value(unlocked)?),
        (SETTING_XP, serde_json::to_value(xp)?),
    ])
}

pub fn set_theme(store: &mut dyn Store, theme: Theme) -> AppResult<()> {
    set_setting(store, SETTING_THEME, &theme)
}

pub fn set_grade_prefix(store: &mut dyn Store, prefix: GradePrefix) -> AppResult<()> {
    set_setting(store, SETTING_GRADE_PREFIX, &prefix.code())
}

pub fn set_draft(store: &mut dyn Store, draft: Option<&DraftSession>) -> AppResult<()> {
    match draft {
        Some(d) => set_setting(store, SETTING_DRAFT, d),
        None => store.set_setting(SETTING_DRAFT, Value::Null),
    }
}
