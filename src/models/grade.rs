use crate::errors::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Grading system selected by the user. Only grades carrying this letter
/// take part in the analytics views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GradePrefix {
    #[default]
    C,
    V,
}

impl GradePrefix {
    pub fn code(&self) -> &'static str {
        match self {
            GradePrefix::C => "C",
            GradePrefix::V => "V",
        }
    }

    /// Helper: convert input code from CLI (lowercase or uppercase)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "C" => Some(GradePrefix::C),
            "V" => Some(GradePrefix::V),
            _ => None,
        }
    }

    pub fn parse(code: &str) -> AppResult<Self> {
        Self::from_code(code).ok_or_else(|| AppError::InvalidGradePrefix(code.to_string()))
    }

    /// Inclusive numeric range used for histogram buckets.
    pub fn bucket_range(&self) -> std::ops::RangeInclusive<u32> {
        match self {
            GradePrefix::C => 1..=9,
            GradePrefix::V => 0..=16,
        }
    }

    fn letter(&self) -> char {
        match self {
            GradePrefix::C => 'C',
            GradePrefix::V => 'V',
        }
    }

    /// True when `grade` belongs to this grading system (leading letter, any case).
    pub fn matches(&self, grade: &str) -> bool {
        grade
            .trim_start()
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&self.letter()))
    }

    pub fn label(&self, value: u32) -> String {
        format!("{}{}", self.code(), value)
    }
}

impl fmt::Display for GradePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Numeric value of a grade: the first run of digits, `None` when there is none.
/// Runs too long for a `u32` saturate to `u32::MAX`.
pub fn parse_grade_number(grade: &str) -> Option<u32> {
    DIGITS
        .find(grade)
        .map(|m| m.as_str().parse().unwrap_or(u32::MAX))
}

/// Numeric value of a grade with "no digits" read as 0 (used for XP and PB).
pub fn grade_number(grade: &str) -> u32 {
    parse_grade_number(grade).unwrap_or(0)
}
