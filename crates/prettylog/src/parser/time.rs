//! Time resolution for values found under time-candidate keys.
//!
//! Strings are tried against a fixed list of layouts, numbers are treated as
//! Unix epochs whose unit is inferred from their magnitude.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Utc};

/// A scalar that may hold a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeValue<'a> {
    Text(&'a str),
    Number(f64),
}

/// Layouts carrying their own offset.
const ZONED_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%a %b %d %H:%M:%S %z %Y",
    "%d %b %y %H:%M %z",
];

/// Layouts without an offset, read as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%a %b %e %H:%M:%S %Y",
];

/// syslog-style "stamp" layout; the year is missing from the input and is
/// taken from the current clock.
const STAMP_LAYOUT: &str = "%Y %b %e %H:%M:%S%.f";

// Epoch magnitude thresholds
const NANOS_THRESHOLD: f64 = 1e18;
const MICROS_THRESHOLD: f64 = 1e15;
const MILLIS_THRESHOLD: f64 = 1e12;

pub fn resolve_time(value: TimeValue<'_>) -> Option<DateTime<FixedOffset>> {
    match value {
        TimeValue::Number(n) => resolve_epoch(n),
        TimeValue::Text(s) => resolve_text(s),
    }
}

/// Interpret `value` as a Unix epoch in seconds, milliseconds, microseconds
/// or nanoseconds depending on its order of magnitude.
pub fn resolve_epoch(value: f64) -> Option<DateTime<FixedOffset>> {
    if !value.is_finite() {
        return None;
    }

    let magnitude = value.abs();
    let units_per_second = if magnitude > NANOS_THRESHOLD {
        1e9
    } else if magnitude > MICROS_THRESHOLD {
        1e6
    } else if magnitude > MILLIS_THRESHOLD {
        1e3
    } else {
        1.0
    };

    let secs = (value / units_per_second).floor();
    let remainder = value - secs * units_per_second;
    let nanos = (remainder * (1e9 / units_per_second)).round().clamp(0.0, 999_999_999.0);

    DateTime::<Utc>::from_timestamp(secs as i64, nanos as u32).map(|dt| dt.fixed_offset())
}

fn resolve_text(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }

    for layout in ZONED_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(s, layout) {
            return Some(dt);
        }
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    let with_year = format!("{} {}", Utc::now().year(), s);
    if let Ok(naive) = NaiveDateTime::parse_from_str(&with_year, STAMP_LAYOUT) {
        return Some(naive.and_utc().fixed_offset());
    }

    // Epochs written as strings (logfmt has no numeric type)
    s.parse::<f64>().ok().and_then(resolve_epoch)
}
