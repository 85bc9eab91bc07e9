//! Boundary normalization shared by the request types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::application::ApplicationStatus;

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";

/// A record id as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Number(i64),
    Text(String),
}

impl IdInput {
    pub fn parse(&self) -> Result<i64, AppError> {
        match self {
            IdInput::Number(n) => Ok(*n),
            IdInput::Text(s) => parse_id(s),
        }
    }
}

pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("Invalid id '{raw}'")))
}

/// Trimmed text, or `None` when absent or blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_status(raw: &str) -> Result<ApplicationStatus, AppError> {
    raw.trim()
        .parse::<ApplicationStatus>()
        .map_err(|_| AppError::Validation(format!("Invalid status '{raw}'")))
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_applied_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::Validation(format!("Invalid applied date '{raw}'")))
}

/// Resolves an optional category reference. Null, `0`, blank and
/// `"uncategorized"` all mean no category.
pub fn category_ref(value: Option<IdInput>) -> Result<Option<i64>, AppError> {
    match value {
        None => Ok(None),
        Some(IdInput::Number(0)) => Ok(None),
        Some(IdInput::Number(n)) => Ok(Some(n)),
        Some(IdInput::Text(s)) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("uncategorized") {
                return Ok(None);
            }
            let id = parse_id(s)?;
            Ok((id != 0).then_some(id))
        }
    }
}
