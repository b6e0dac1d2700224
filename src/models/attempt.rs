use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::new_id;

/// Outcome of a single go on a problem.
///
/// Older data may carry `"fail"`; it is read as a plain (non-send) attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttemptResult {
    Send,
    #[default]
    #[serde(alias = "fail")]
    Attempt,
}

impl AttemptResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptResult::Send => "send",
            AttemptResult::Attempt => "attempt",
        }
    }

    /// Parse a CLI code: `send`/`s`, `attempt`/`a`, legacy `fail`/`f`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "send" | "s" => Some(AttemptResult::Send),
            "attempt" | "a" | "fail" | "f" => Some(AttemptResult::Attempt),
            _ => None,
        }
    }

    pub fn is_send(&self) -> bool {
        matches!(self, AttemptResult::Send)
    }

    pub fn toggled(&self) -> Self {
        match self {
            AttemptResult::Send => AttemptResult::Attempt,
            AttemptResult::Attempt => AttemptResult::Send,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: String,
    pub problem_id: String,
    #[serde(default)]
    pub result: AttemptResult,
    #[serde(default)]
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

impl Attempt {
    pub fn new(problem_id: impl Into<String>, result: AttemptResult, notes: Option<String>) -> Self {
        Self::new_at(problem_id, result, notes, Utc::now())
    }

    pub fn new_at(
        problem_id: impl Into<String>,
        result: AttemptResult,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id("attempt"),
            problem_id: problem_id.into(),
            result,
            notes: notes.unwrap_or_default(),
            timestamp: now,
        }
    }

    pub fn is_send(&self) -> bool {
        self.result.is_send()
    }
}
