use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::attempt::Attempt;
use super::grade::GradePrefix;
use crate::errors::{AppError, AppResult};

pub const SETTING_THEME: &str = "theme";
pub const SETTING_GRADE_PREFIX: &str = "gradePrefix";
pub const SETTING_XP: &str = "xp";
pub const SETTING_ACHIEVEMENTS: &str = "achievementsUnlocked";
pub const SETTING_DRAFT: &str = "draftSession";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(AppError::InvalidTheme(s.to_string())),
        }
    }
}

/// In-progress session kept across invocations until it is logged or discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSession {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
    pub started_at: DateTime<Utc>,
}

impl DraftSession {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            location: String::new(),
            notes: String::new(),
            attempts: Vec::new(),
            started_at: now,
        }
    }
}

/// Application-wide settings, loaded from the store once per action and
/// handed to the analytics and progression code explicitly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub theme: Theme,
    pub grade_prefix: GradePrefix,
    pub xp: u64,
    pub achievements_unlocked: BTreeSet<String>,
    pub draft_session: Option<DraftSession>,
}
