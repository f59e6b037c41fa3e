//! Scalar normalization for time and number fields.
//!
//! Every timestamp ends up as ISO-8601 text: bare dates as `YYYY-MM-DD`,
//! naive date-times as `YYYY-MM-DDTHH:MM:SS[.fff]`, and offset date-times with
//! a trailing `+HH:MM`. Fractional seconds are written with 3, 6 or 9 digits
//! and omitted when zero. Numbers are stored as `f64`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CzmlError, Result};
use crate::input::Input;

/// Canonical value of a field that takes either a timestamp or a number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeOrNumber {
    /// ISO-8601 text.
    Time(String),
    Number(f64),
}

impl TimeOrNumber {
    pub fn as_time(&self) -> Option<&str> {
        match self {
            TimeOrNumber::Time(s) => Some(s),
            TimeOrNumber::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TimeOrNumber::Number(n) => Some(*n),
            TimeOrNumber::Time(_) => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            TimeOrNumber::Time(s) => JsonValue::String(s.clone()),
            TimeOrNumber::Number(n) => JsonValue::from(*n),
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

pub fn format_datetime_tz(dt: DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f%:z").to_string()
}

/// Parse ISO-8601 text and render it canonically. Offset date-times are tried
/// first, then naive date-times, then bare dates.
pub fn parse_timestamp(text: &str) -> Option<String> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(format_datetime_tz(dt));
    }
    if let Ok(dt) = text.parse::<NaiveDateTime>() {
        return Some(format_datetime(dt));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M") {
        return Some(format_datetime(dt));
    }
    text.parse::<NaiveDate>().ok().map(format_date)
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Canonicalize a timestamp-only value. `Null` clears.
pub fn normalize_time(input: &Input) -> Result<Option<String>> {
    match input {
        Input::Null => Ok(None),
        Input::Date(d) => Ok(Some(format_date(*d))),
        Input::DateTime(dt) => Ok(Some(format_datetime(*dt))),
        Input::DateTimeTz(dt) => Ok(Some(format_datetime_tz(*dt))),
        Input::Text(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| CzmlError::mismatch("ISO-8601 timestamp", "text")),
        other => Err(CzmlError::mismatch("timestamp", other.kind_name())),
    }
}

/// Canonicalize a value that may be a timestamp or a number. Numeric text is
/// read as a number before any timestamp parsing is attempted.
pub fn normalize_time_or_number(input: &Input) -> Result<Option<TimeOrNumber>> {
    match input {
        Input::Number(n) if n.is_finite() => Ok(Some(TimeOrNumber::Number(*n))),
        Input::Text(s) => {
            if let Some(n) = parse_number(s) {
                return Ok(Some(TimeOrNumber::Number(n)));
            }
            parse_timestamp(s)
                .map(|t| Some(TimeOrNumber::Time(t)))
                .ok_or_else(|| CzmlError::mismatch("timestamp or number", "text"))
        }
        Input::Null | Input::Date(_) | Input::DateTime(_) | Input::DateTimeTz(_) => {
            Ok(normalize_time(input)?.map(TimeOrNumber::Time))
        }
        other => Err(CzmlError::mismatch("timestamp or number", other.kind_name())),
    }
}

/// Canonicalize a plain number. Numeric text is accepted.
pub fn normalize_number(input: &Input) -> Result<Option<f64>> {
    match input {
        Input::Null => Ok(None),
        Input::Number(n) if n.is_finite() => Ok(Some(*n)),
        Input::Text(s) => parse_number(s)
            .map(Some)
            .ok_or_else(|| CzmlError::mismatch("number", "text")),
        other => Err(CzmlError::mismatch("finite number", other.kind_name())),
    }
}
