use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Parse a `--date` value: RFC 3339, or `YYYY-MM-DD` taken as noon UTC so the
/// calendar day is the same in every time zone near UTC.
pub fn parse_session_date(s: &str) -> AppResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let d = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(s.to_string()))?;
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    Ok(d.and_time(noon).and_utc())
}

pub fn parse_optional_date(input: Option<&String>) -> AppResult<Option<DateTime<Utc>>> {
    input.map(|s| parse_session_date(s)).transpose()
}
