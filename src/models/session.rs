use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::attempt::Attempt;
use super::new_id;

/// A dated batch of attempts. Owns its attempts exclusively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionFields {
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub attempts: Vec<Attempt>,
}

impl Session {
    pub fn new(fields: SessionFields) -> Self {
        Self::new_at(fields, Utc::now())
    }

    pub fn new_at(fields: SessionFields, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id("session"),
            date: fields.date.unwrap_or(now),
            location: fields.location.unwrap_or_default(),
            notes: fields.notes.unwrap_or_default(),
            attempts: fields.attempts,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn sends(&self) -> impl Iterator<Item = &Attempt> {
        self.attempts.iter().filter(|a| a.is_send())
    }

    pub fn send_count(&self) -> usize {
        self.sends().count()
    }

    /// Calendar day (UTC) the session belongs to.
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn has_send_on(&self, problem_id: &str) -> bool {
        self.sends().any(|a| a.problem_id == problem_id)
    }
}
