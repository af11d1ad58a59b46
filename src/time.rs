// src/time.rs

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use humantime::parse_duration;
use std::time::SystemTime;

use crate::error::{Result, TraceError};

/// Parses the calendar part of a trace header, e.g. `Mon Jan 02 03:04:05 2023`.
///
/// The leading weekday is ignored, so a weekday that disagrees with the date
/// does not reject the value. Anything else yields `None`.
pub fn parse_trace_datetime(text: &str) -> Option<NaiveDateTime> {
    let mut tokens = text.split_whitespace();
    let _weekday = tokens.next()?;
    let rest = tokens.collect::<Vec<_>>().join(" ");

    NaiveDateTime::parse_from_str(&rest, "%b %d %H:%M:%S %Y").ok()
}

/// Parses a user-provided window bound into a naive local time.
/// Handles `now`, relative times ("2h ago") and absolute timestamps.
pub fn parse_time_string(time_str: &str) -> Result<NaiveDateTime> {
    let time_str = time_str.trim();

    if time_str.eq_ignore_ascii_case("now") {
        return Ok(Local::now().naive_local());
    }

    // Relative duration, e.g. "15m" or "2h ago"
    let clean_str = time_str.strip_suffix(" ago").unwrap_or(time_str);
    if let Ok(duration) = parse_duration(clean_str) {
        let target_time = SystemTime::now() - duration;
        return Ok(DateTime::<Local>::from(target_time).naive_local());
    }

    // RFC3339 keeps its own offset; trace times carry none, so drop it
    if let Ok(datetime) = DateTime::parse_from_rfc3339(time_str) {
        return Ok(datetime.naive_local());
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(time_str, fmt) {
            return Ok(datetime);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(time_str, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(datetime);
        }
    }

    Err(TraceError::InvalidTime(time_str.to_string()))
}
