use time::format_description::well_known::Rfc3339;
use time::{format_description, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::AppError;

// Naive ISO layouts emitted by the API (Python `datetime.isoformat()` without tzinfo).
const NAIVE_FORMATS: [&str; 4] = [
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
    "[year]-[month]-[day]T[hour]:[minute]:[second]",
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]",
    "[year]-[month]-[day] [hour]:[minute]:[second]",
];

const HISTORY_STAMP_FORMAT: &str = "[month repr:short] [day padding:none], [year] [hour]:[minute]";

/// Parse a server timestamp into UTC.
///
/// RFC3339 values keep their offset (converted to UTC). Naive values are assumed UTC,
/// which is how the API records them. Anything else yields `None`.
pub fn parse_server_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(dt.to_offset(UtcOffset::UTC));
    }

    for fmt in NAIVE_FORMATS {
        let Ok(items) = format_description::parse(fmt) else {
            continue;
        };
        if let Ok(pdt) = PrimitiveDateTime::parse(trimmed, &items) {
            return Some(pdt.assume_utc());
        }
    }

    None
}

pub fn now_rfc3339_utc() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| AppError::new("TIME_FORMAT_FAILED", "Failed to format time").with_details(e.to_string()))
}

/// Human relative time ("a few seconds ago", "5 minutes ago", "in 2 hours").
///
/// Thresholds follow the usual humanized buckets: seconds < 45s, a minute < 90s,
/// minutes < 45m, an hour < 90m, hours < 22h, a day < 36h, days < 26d, a month < 45d,
/// months < 320d, a year < 548d, then years.
pub fn format_relative(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let delta = now - then;
    let future = delta.is_negative();
    let secs = delta.abs().whole_seconds();

    let phrase = if secs < 45 {
        "a few seconds".to_string()
    } else if secs < 90 {
        "a minute".to_string()
    } else if secs < 45 * 60 {
        format!("{} minutes", round_div(secs, 60).max(2))
    } else if secs < 90 * 60 {
        "an hour".to_string()
    } else if secs < 22 * 3600 {
        format!("{} hours", round_div(secs, 3600).max(2))
    } else if secs < 36 * 3600 {
        "a day".to_string()
    } else if secs < 26 * 86_400 {
        format!("{} days", round_div(secs, 86_400).max(2))
    } else if secs < 45 * 86_400 {
        "a month".to_string()
    } else if secs < 320 * 86_400 {
        format!("{} months", round_div(secs, 30 * 86_400).max(2))
    } else if secs < 548 * 86_400 {
        "a year".to_string()
    } else {
        format!("{} years", round_div(secs, 365 * 86_400).max(2))
    };

    if future {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn round_div(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}

/// Relative time for a raw server timestamp; unparseable values are shown verbatim.
pub fn display_relative(raw: &str, now: OffsetDateTime) -> String {
    match parse_server_timestamp(raw) {
        Some(then) => format_relative(then, now),
        None => raw.trim().to_string(),
    }
}

/// Absolute stamp used in history listings, e.g. `Jan 5, 2026 14:03`.
pub fn display_history_stamp(raw: &str) -> String {
    let Some(ts) = parse_server_timestamp(raw) else {
        return raw.trim().to_string();
    };
    format_description::parse(HISTORY_STAMP_FORMAT)
        .ok()
        .and_then(|items| ts.format(&items).ok())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Offset helper for deterministic fixtures.
pub fn minutes_before(base: OffsetDateTime, minutes: i64) -> OffsetDateTime {
    base - Duration::minutes(minutes)
}
