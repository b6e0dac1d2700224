//! Grade trend and histogram over logged sends.

use crate::errors::{AppError, AppResult};
use crate::models::{GradePrefix, Problem, Session, parse_grade_number};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;

/// Window applied to the series, relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl TimeRange {
    pub fn code(&self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Year => "1y",
            TimeRange::All => "all",
        }
    }

    pub fn parse(code: &str) -> AppResult<Self> {
        match code.trim().to_lowercase().as_str() {
            "7d" | "week" => Ok(TimeRange::Week),
            "30d" | "month" => Ok(TimeRange::Month),
            "1y" | "365d" | "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            _ => Err(AppError::InvalidRange(code.to_string())),
        }
    }

    /// Earliest instant kept, or `None` for the whole history.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::Week => Some(now - Duration::days(7)),
            TimeRange::Month => Some(now - Duration::days(30)),
            TimeRange::Year => Some(now - Duration::days(365)),
            TimeRange::All => None,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Numeric grades sent in one session.
#[derive(Debug, Clone, PartialEq)]
pub struct GradePoint {
    pub date: DateTime<Utc>,
    pub avg: f64,
    pub max: u32,
    pub grades: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramBucket {
    pub grade: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub prefix: GradePrefix,
    pub range: TimeRange,
    pub points: Vec<GradePoint>,
    pub session_count: usize,
    pub highest: Option<u32>,
    pub histogram: Vec<HistogramBucket>,
}

impl Insights {
    /// Highest grade label, or an em dash when nothing qualifies.
    pub fn highest_label(&self) -> String {
        self.highest
            .map(|g| self.prefix.label(g))
            .unwrap_or_else(|| "—".to_string())
    }
}

/// One point per session that sent at least one graded problem of `prefix`,
/// sorted by date. Dangling problem references are skipped.
pub fn grade_series(sessions: &[Session], problems: &[Problem], prefix: GradePrefix) -> Vec<GradePoint> {
    let by_id: HashMap<&str, &Problem> = problems.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut points: Vec<GradePoint> = sessions
        .iter()
        .filter_map(|s| {
            let grades: Vec<u32> = s
                .sends()
                .filter_map(|a| by_id.get(a.problem_id.as_str()))
                .filter(|p| prefix.matches(&p.grade))
                .filter_map(|p| parse_grade_number(&p.grade))
                .collect();

            let max = *grades.iter().max()?;
            let avg = grades.iter().map(|&g| g as f64).sum::<f64>() / grades.len() as f64;
            Some(GradePoint {
                date: s.date,
                avg,
                max,
                grades,
            })
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points
}

pub fn filter_range(points: Vec<GradePoint>, range: TimeRange, now: DateTime<Utc>) -> Vec<GradePoint> {
    match range.cutoff(now) {
        Some(cutoff) => points.into_iter().filter(|p| p.date >= cutoff).collect(),
        None => points,
    }
}

/// Count every sent grade value per bucket of the prefix range.
pub fn histogram(points: &[GradePoint], prefix: GradePrefix) -> Vec<HistogramBucket> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for g in points.iter().flat_map(|p| p.grades.iter()) {
        *counts.entry(*g).or_default() += 1;
    }

    prefix
        .bucket_range()
        .map(|grade| HistogramBucket {
            grade,
            count: counts.get(&grade).copied().unwrap_or(0),
        })
        .collect()
}

pub fn compute_insights(
    sessions: &[Session],
    problems: &[Problem],
    prefix: GradePrefix,
    range: TimeRange,
    now: DateTime<Utc>,
) -> Insights {
    let points = filter_range(grade_series(sessions, problems, prefix), range, now);
    let highest = points.iter().map(|p| p.max).max();
    let histogram = histogram(&points, prefix);

    Insights {
        prefix,
        range,
        session_count: points.len(),
        highest,
        histogram,
        points,
    }
}
