//! Structural validation of raw input entries.
//!
//! Checks that every required key is present and hands back a typed entry
//! borrowing those values. Types and ranges are checked later, during
//! normalization.

use serde_json::Value;

use crate::error::RecordError;

/// Fields every sleep entry must carry.
pub const SLEEP_REQUIRED_FIELDS: [&str; 4] =
    ["sleep_start", "sleep_end", "duration_hours", "quality_score"];

/// Fields every workout entry must carry.
pub const WORKOUT_REQUIRED_FIELDS: [&str; 6] =
    ["id", "timestamp", "tz", "type", "duration_min", "calories"];

static NULL: Value = Value::Null;

/// Checks that `entry` is an object containing every field in `required`.
///
/// The error lists all missing fields in alphabetical order. A non-object
/// entry is missing every field.
pub fn validate(entry: &Value, required: &[&str]) -> Result<(), RecordError> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|name| entry.get(**name).is_none())
        .map(|name| (*name).to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    missing.sort();
    let mut required: Vec<String> = required.iter().map(|name| (*name).to_string()).collect();
    required.sort();
    Err(RecordError::MissingFields { missing, required })
}

fn require<'a, const N: usize>(
    entry: &'a Value,
    required: [&'static str; N],
) -> Result<[&'a Value; N], RecordError> {
    validate(entry, &required)?;

    let mut values = [&NULL; N];
    for (slot, name) in values.iter_mut().zip(required) {
        if let Some(value) = entry.get(name) {
            *slot = value;
        }
    }
    Ok(values)
}

/// A sleep entry whose required fields are known to be present.
#[derive(Debug, Clone, Copy)]
pub struct SleepEntry<'a> {
    pub sleep_start: &'a Value,
    pub sleep_end: &'a Value,
    pub duration_hours: &'a Value,
    pub quality_score: &'a Value,
}

impl<'a> SleepEntry<'a> {
    pub fn from_value(entry: &'a Value) -> Result<Self, RecordError> {
        let [sleep_start, sleep_end, duration_hours, quality_score] =
            require(entry, SLEEP_REQUIRED_FIELDS)?;
        Ok(Self {
            sleep_start,
            sleep_end,
            duration_hours,
            quality_score,
        })
    }
}

/// A workout entry whose required fields are known to be present.
#[derive(Debug, Clone, Copy)]
pub struct WorkoutEntry<'a> {
    pub id: &'a Value,
    pub timestamp: &'a Value,
    pub tz: &'a Value,
    pub kind: &'a Value,
    pub duration_min: &'a Value,
    pub calories: &'a Value,
}

impl<'a> WorkoutEntry<'a> {
    pub fn from_value(entry: &'a Value) -> Result<Self, RecordError> {
        let [id, timestamp, tz, kind, duration_min, calories] =
            require(entry, WORKOUT_REQUIRED_FIELDS)?;
        Ok(Self {
            id,
            timestamp,
            tz,
            kind,
            duration_min,
            calories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn missing_of(err: RecordError) -> Vec<String> {
        match err {
            RecordError::MissingFields { missing, .. } => missing,
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn complete_workout_passes() {
        let entry = json!({
            "id": "w1",
            "timestamp": "2023-10-01 08:30:00",
            "tz": "America/Los_Angeles",
            "type": "run",
            "duration_min": 30,
            "calories": 300
        });
        let parsed = WorkoutEntry::from_value(&entry).unwrap();
        assert_eq!(parsed.tz, "America/Los_Angeles");
        assert_eq!(parsed.kind, "run");
    }

    #[test]
    fn lists_every_missing_field_sorted() {
        let entry = json!({"id": "w1", "timestamp": "2023-10-01 08:30:00"});
        let err = WorkoutEntry::from_value(&entry).unwrap_err();
        assert_eq!(
            missing_of(err),
            vec!["calories", "duration_min", "tz", "type"]
        );
    }

    #[test]
    fn missing_tz_is_reported_by_name() {
        let entry = json!({
            "id": "w1",
            "timestamp": "not even a timestamp",
            "type": "run",
            "duration_min": 30,
            "calories": 300
        });
        let err = validate(&entry, &WORKOUT_REQUIRED_FIELDS).unwrap_err();
        assert_eq!(missing_of(err), vec!["tz"]);
    }

    #[test]
    fn null_value_counts_as_present() {
        let entry = json!({
            "sleep_start": null,
            "sleep_end": "2023-10-01T07:00:00Z",
            "duration_hours": 7.0,
            "quality_score": 80
        });
        assert!(validate(&entry, &SLEEP_REQUIRED_FIELDS).is_ok());
    }

    #[test]
    fn non_object_entry_is_missing_everything() {
        let err = SleepEntry::from_value(&json!("oops")).unwrap_err();
        assert_eq!(
            missing_of(err),
            vec!["duration_hours", "quality_score", "sleep_end", "sleep_start"]
        );
    }

    #[test]
    fn required_list_in_message_is_sorted() {
        let err = validate(&json!({}), &SLEEP_REQUIRED_FIELDS).unwrap_err();
        assert!(
            err.to_string()
                .ends_with("Required: duration_hours, quality_score, sleep_end, sleep_start")
        );
    }
}
