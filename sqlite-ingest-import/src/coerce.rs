//! Per-column value coercion applied just before binding.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use sqlite_ingest_core::{StorageType, Value};

/// Text layouts tried, in order, when a date-time column receives text.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Prepare `value` for a column of type `target`.
///
/// Arrays are always flattened to delimiter-joined text. Date-time columns
/// parse text and store null when nothing parses, rather than failing the
/// row. Text columns render other scalars as text. Everything else binds
/// unchanged.
pub fn coerce_value(value: Value, target: StorageType) -> Value {
    let value = value.flatten();
    match target {
        StorageType::DateTime => coerce_datetime(value),
        StorageType::String => match value {
            Value::Null | Value::Text(_) | Value::Blob(_) => value,
            other => Value::Text(other.to_string()),
        },
        _ => value,
    }
}

fn coerce_datetime(value: Value) -> Value {
    match value {
        Value::Null | Value::DateTime(_) => value,
        Value::Text(text) => match parse_datetime(&text) {
            Some(dt) => Value::DateTime(dt),
            None => {
                log::debug!("Unparseable date-time '{}'; storing null", text);
                Value::Null
            }
        },
        other => {
            log::debug!("Cannot store {} in a date-time column; storing null", other.kind_name());
            Value::Null
        }
    }
}

/// Parse a date-time from text.
///
/// Accepts RFC 3339 (converted to UTC), the common ISO-like layouts, a bare
/// date, and finally the fixed-width `YYYYMMDDHHmmss.ffffff+UUU` stamp.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    parse_offset_stamp(text)
}

/// Parse `YYYYMMDDHHmmss.ffffff+UUU`, where `UUU` is the offset from UTC in
/// minutes. The result is normalized to UTC.
pub fn parse_offset_stamp(text: &str) -> Option<NaiveDateTime> {
    if text.len() != 25 || !text.is_ascii() || text.as_bytes()[14] != b'.' {
        return None;
    }

    let year = digits(&text[0..4])?;
    let month = digits(&text[4..6])?;
    let day = digits(&text[6..8])?;
    let hour = digits(&text[8..10])?;
    let minute = digits(&text[10..12])?;
    let second = digits(&text[12..14])?;
    let micros = digits(&text[15..21])?;
    let offset = i64::from(digits(&text[22..25])?);
    let offset = match &text[21..22] {
        "+" => offset,
        "-" => -offset,
        _ => return None,
    };

    let local = NaiveDate::from_ymd_opt(year as i32, month, day)?
        .and_hms_micro_opt(hour, minute, second, micros)?;
    local.checked_sub_signed(TimeDelta::try_minutes(offset)?)
}

fn digits(s: &str) -> Option<u32> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests/coerce_tests.rs"]
mod tests;
