use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::grade::grade_number;
use super::new_id;

pub const DEFAULT_GRADE: &str = "C1";

fn default_grade() -> String {
    DEFAULT_GRADE.to_string()
}

/// A climb the user tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: String,
    pub name: String,
    #[serde(default = "default_grade")]
    pub grade: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-supplied fields for a new problem; everything but the name is optional.
#[derive(Debug, Clone, Default)]
pub struct ProblemFields {
    pub name: String,
    pub grade: Option<String>,
    pub area: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
}

impl Problem {
    pub fn new(fields: ProblemFields) -> Self {
        Self::new_at(fields, Utc::now())
    }

    pub fn new_at(fields: ProblemFields, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id("problem"),
            name: fields.name,
            grade: fields
                .grade
                .filter(|g| !g.trim().is_empty())
                .unwrap_or_else(default_grade),
            area: fields.area.unwrap_or_default(),
            completed_date: None,
            notes: fields.notes.unwrap_or_default(),
            photo_url: fields.photo_url.filter(|u| !u.trim().is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn grade_number(&self) -> u32 {
        grade_number(&self.grade)
    }

    pub fn is_completed(&self) -> bool {
        self.completed_date.is_some()
    }
}
