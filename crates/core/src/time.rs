//! Timestamp handling and the relative-time parser
//!
//! Event timestamps are stored as text. Generated timestamps use RFC 3339
//! with second precision and a `Z` suffix; older logs may carry naive ISO
//! forms, which are read as UTC.
//!
//! Time filters accept either an absolute instant or a relative expression
//! such as `-10m`, `-2h`, `-3d` or `-2w`. Anything unparsable yields `None`,
//! which callers treat as "no bound".

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, Utc};

/// Naive layouts accepted after RFC 3339 fails.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Current UTC time in the on-disk timestamp format.
pub fn now_iso() -> String {
    format_instant(Utc::now())
}

/// Format an instant the way events store it.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an absolute timestamp.
///
/// Accepts RFC 3339 (any offset, normalized to UTC), naive
/// `YYYY-MM-DDTHH:MM[:SS[.frac]]` with an optional trailing `Z`,
/// `YYYY-MM-DD HH:MM:SS` and a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = text.strip_suffix('Z').unwrap_or(text);
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Parse an absolute or relative time bound against the current clock.
pub fn parse_relative(text: &str) -> Option<DateTime<Utc>> {
    parse_relative_at(text, Utc::now())
}

/// Parse an absolute or relative time bound against a fixed `now`.
///
/// Relative expressions are `-<digits>[unit]` where unit is `m`, `h`, `d`
/// or `w` (case-insensitive, minutes when omitted).
pub fn parse_relative_at(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = text.trim();
    let Some(rest) = text.strip_prefix('-') else {
        return parse_instant(text);
    };

    let split = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (digits, unit) = rest.split_at(split);
    if digits.is_empty() {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;

    let offset = match unit.to_ascii_lowercase().as_str() {
        "" | "m" => TimeDelta::try_minutes(magnitude)?,
        "h" => TimeDelta::try_hours(magnitude)?,
        "d" => TimeDelta::try_days(magnitude)?,
        "w" => TimeDelta::try_weeks(magnitude)?,
        _ => return None,
    };
    now.checked_sub_signed(offset)
}
