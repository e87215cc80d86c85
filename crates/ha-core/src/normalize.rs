//! Timestamp normalization and day attribution.
//!
//! Sleep timestamps arrive on the UTC clock already. Workout timestamps are
//! naive wall-clock strings paired with an IANA zone name, and are converted
//! to UTC using the zone's rules for that date.
//!
//! # Day attribution
//!
//! - Sleep is credited to the UTC date of `sleep_end` (the wake-up day).
//! - Workouts are credited to the UTC date of the converted instant, never the
//!   local date. When those two dates differ the workout is flagged as having
//!   crossed a day boundary.
//!
//! # Ambiguous and skipped wall times
//!
//! - During a fall-back overlap the earliest occurrence is used, i.e. the
//!   offset in force before the clocks were turned back.
//! - During a spring-forward gap the offset in force before the transition is
//!   used, as if the wall clock had not been moved forward yet.

use chrono::{
    DateTime, Datelike, FixedOffset, LocalResult, NaiveDateTime, Offset, SecondsFormat, TimeDelta,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use serde_json::Value;

use crate::error::RecordError;
use crate::record::{SleepRecord, WorkoutRecord};
use crate::validate::{SleepEntry, WorkoutEntry};

/// Fixed format of workout wall-clock timestamps.
pub const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const LOCAL_TIMESTAMP_EXAMPLE: &str = "'YYYY-MM-DD HH:MM:SS' (e.g., '2023-10-01 08:30:00')";
const UTC_TIMESTAMP_EXAMPLE: &str =
    "RFC 3339 with seconds and offset (e.g., '2023-10-01T00:30:00Z' or '2023-10-01T00:30:00+00:00')";

/// Longest workout accepted, in minutes (24 hours).
pub const MAX_WORKOUT_MINUTES: i64 = 1440;

const DURATION_EXPECTED: &str = "an integer between 0 and 1440";
const CALORIES_EXPECTED: &str = "an integer between 0 and 4294967295";

/// A local wall-clock time converted to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Converted {
    pub local: NaiveDateTime,
    pub utc: DateTime<Utc>,
    pub crossed_day_boundary: bool,
}

/// Parses an RFC 3339 timestamp with seconds and an offset (`Z` or `+HH:MM`) and
/// converts it to UTC.
pub fn parse_utc_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, RecordError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| RecordError::TimestampFormat {
            field,
            value: raw.to_string(),
            expected: UTC_TIMESTAMP_EXAMPLE,
        })
}

/// Checks the exact `YYYY-MM-DD HH:MM:SS` layout. chrono's `%Y` alone also
/// takes signed and five-digit years.
fn has_local_layout(raw: &str) -> bool {
    raw.len() == 19
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            10 => b == b' ',
            13 | 16 => b == b':',
            _ => b.is_ascii_digit(),
        })
}

/// Parses a naive `YYYY-MM-DD HH:MM:SS` wall-clock timestamp.
///
/// Years run from 0001 to 9999.
pub fn parse_local_timestamp(raw: &str) -> Result<NaiveDateTime, RecordError> {
    let format_error = || RecordError::TimestampFormat {
        field: "timestamp",
        value: raw.to_string(),
        expected: LOCAL_TIMESTAMP_EXAMPLE,
    };
    if !has_local_layout(raw) {
        return Err(format_error());
    }
    NaiveDateTime::parse_from_str(raw, LOCAL_TIMESTAMP_FORMAT)
        .ok()
        .filter(|dt| dt.year() >= 1)
        .ok_or_else(format_error)
}

/// Looks up an IANA timezone identifier, e.g. `America/Los_Angeles`.
pub fn resolve_timezone(name: &str) -> Result<Tz, RecordError> {
    name.parse::<Tz>()
        .map_err(|_| RecordError::TimezoneResolution {
            zone: name.to_string(),
        })
}

/// Returns the UTC offset the zone applies to the given wall-clock time.
///
/// See the [module documentation](self) for how overlaps and gaps resolve.
/// `None` only when the lookup for a gap falls outside chrono's range.
fn local_offset(zone: Tz, local: NaiveDateTime) -> Option<FixedOffset> {
    match zone.offset_from_local_datetime(&local) {
        LocalResult::Single(offset) | LocalResult::Ambiguous(offset, _) => Some(offset.fix()),
        LocalResult::None => {
            // Look a day earlier on the UTC clock to find the pre-transition offset.
            let before = local.checked_sub_signed(TimeDelta::days(1))?;
            Some(zone.offset_from_utc_datetime(&before).fix())
        }
    }
}

/// Converts a wall-clock time in `zone` to UTC and flags calendar date changes.
///
/// Fails with [`RecordError::RangeValidation`] when the UTC instant is not
/// representable.
pub fn to_utc(local: NaiveDateTime, zone: Tz) -> Result<Converted, RecordError> {
    let utc_naive = local_offset(zone, local)
        .and_then(|offset| {
            local.checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
        })
        .ok_or_else(|| RecordError::RangeValidation {
            field: "timestamp",
            value: format!("'{}'", local.format(LOCAL_TIMESTAMP_FORMAT)),
            expected: "a time representable in UTC",
        })?;
    let utc = Utc.from_utc_datetime(&utc_naive);
    Ok(Converted {
        local,
        utc,
        crossed_day_boundary: local.date() != utc.date_naive(),
    })
}

/// Formats a UTC instant with second precision and a `+00:00` suffix.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

fn expect_str<'a>(field: &'static str, value: &'a Value, expected: &'static str) -> Result<&'a str, RecordError> {
    value.as_str().ok_or_else(|| RecordError::TimestampFormat {
        field,
        value: value.to_string(),
        expected,
    })
}

/// Coerces a scalar JSON value to a string. Strings are taken verbatim.
fn scalar_string(field: &'static str, value: &Value) -> Result<String, RecordError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(_) | Value::Bool(_) | Value::Null => Ok(value.to_string()),
        Value::Array(_) | Value::Object(_) => Err(RecordError::RangeValidation {
            field,
            value: value.to_string(),
            expected: "a scalar value",
        }),
    }
}

/// Reads a JSON number, accepting numeric strings.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Reads an integer, accepting numeric strings and integral floats.
#[allow(clippy::cast_possible_truncation)]
fn integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    if let Value::String(s) = value {
        if let Ok(i) = s.trim().parse::<i64>() {
            return Some(i);
        }
    }
    let f = number(value)?;
    (f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}

fn bounded_integer(
    field: &'static str,
    value: &Value,
    range: std::ops::RangeInclusive<i64>,
    expected: &'static str,
) -> Result<i64, RecordError> {
    integer(value)
        .filter(|i| range.contains(i))
        .ok_or_else(|| RecordError::RangeValidation {
            field,
            value: describe(value),
            expected,
        })
}

/// Converts a validated sleep entry into a [`SleepRecord`].
pub fn normalize_sleep(entry: &SleepEntry<'_>) -> Result<SleepRecord, RecordError> {
    let start_raw = expect_str("sleep_start", entry.sleep_start, UTC_TIMESTAMP_EXAMPLE)?;
    let end_raw = expect_str("sleep_end", entry.sleep_end, UTC_TIMESTAMP_EXAMPLE)?;
    let sleep_start = parse_utc_timestamp("sleep_start", start_raw)?;
    let sleep_end = parse_utc_timestamp("sleep_end", end_raw)?;

    let duration_hours = number(entry.duration_hours)
        .filter(|h| (0.0..=24.0).contains(h))
        .ok_or_else(|| RecordError::RangeValidation {
            field: "duration_hours",
            value: describe(entry.duration_hours),
            expected: "a number between 0 and 24",
        })?;

    let quality = bounded_integer(
        "quality_score",
        entry.quality_score,
        0..=100,
        "an integer between 0 and 100",
    )?;
    let quality_score = u8::try_from(quality).map_err(|_| RecordError::RangeValidation {
        field: "quality_score",
        value: quality.to_string(),
        expected: "an integer between 0 and 100",
    })?;

    Ok(SleepRecord::new(sleep_start, sleep_end, duration_hours, quality_score))
}

/// Converts a validated workout entry into a [`WorkoutRecord`] on the UTC clock.
pub fn normalize_workout(entry: &WorkoutEntry<'_>) -> Result<WorkoutRecord, RecordError> {
    let timestamp_raw = expect_str("timestamp", entry.timestamp, LOCAL_TIMESTAMP_EXAMPLE)?;
    let local = parse_local_timestamp(timestamp_raw)?;

    let zone_raw = entry
        .tz
        .as_str()
        .ok_or_else(|| RecordError::TimezoneResolution {
            zone: entry.tz.to_string(),
        })?;
    let zone = resolve_timezone(zone_raw)?;
    let converted = to_utc(local, zone)?;

    let duration_min = bounded_integer(
        "duration_min",
        entry.duration_min,
        0..=MAX_WORKOUT_MINUTES,
        DURATION_EXPECTED,
    )?;
    let calories = bounded_integer(
        "calories",
        entry.calories,
        0..=i64::from(u32::MAX),
        CALORIES_EXPECTED,
    )?;

    let out_of_range = |field: &'static str, value: i64, expected: &'static str| {
        RecordError::RangeValidation {
            field,
            value: value.to_string(),
            expected,
        }
    };

    Ok(WorkoutRecord {
        id: scalar_string("id", entry.id)?,
        timestamp_utc: converted.utc,
        date_utc: converted.utc.date_naive(),
        original_timestamp: timestamp_raw.to_string(),
        original_timezone: zone_raw.to_string(),
        workout_type: scalar_string("type", entry.kind)?,
        duration_min: u32::try_from(duration_min)
            .map_err(|_| out_of_range("duration_min", duration_min, DURATION_EXPECTED))?,
        calories: u32::try_from(calories)
            .map_err(|_| out_of_range("calories", calories, CALORIES_EXPECTED))?,
        crossed_day_boundary: converted.crossed_day_boundary,
    })
}
