//! Timestamp parsing and calendar feature extraction

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Calendar components used as model features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarParts {
    pub year: i32,
    pub month: u32,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u32,
    pub hour: u32,
}

impl From<NaiveDateTime> for CalendarParts {
    fn from(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day_of_week: dt.weekday().num_days_from_monday(),
            hour: dt.hour(),
        }
    }
}

/// Parse a trip timestamp into its wall-clock time.
///
/// Accepts `2015-05-07 19:52:06 UTC`, naive date-times with optional
/// fractional seconds, RFC 3339 / offset forms and bare dates. Offset forms
/// keep their local time; the offset is not applied.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let s = trimmed.strip_suffix(" UTC").unwrap_or(trimmed);

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f %z") {
        return Some(dt.naive_local());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
