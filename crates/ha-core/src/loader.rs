//! Loading sleep and workout files.
//!
//! Each load runs read → decode → container check → per-record validation
//! and normalization. File-level problems always abort the load. What
//! happens to an invalid record depends on the [`LoadPolicy`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Dataset, LoadError, RecordError};
use crate::normalize::{normalize_sleep, normalize_workout};
use crate::record::{SleepRecord, WorkoutRecord};
use crate::validate::{SleepEntry, WorkoutEntry};

/// What to do when a record fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadPolicy {
    /// Abort the whole load on the first invalid record.
    FailFast,
    /// Leave invalid records out and report them alongside the result.
    #[default]
    SkipAndWarn,
}

/// A record left out under [`LoadPolicy::SkipAndWarn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in its source array.
    pub index: usize,
    pub reason: RecordError,
}

/// Accepted records plus the ones that were skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Loaded<T> {
    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

/// Loads a sleep file (`{"records": [...]}`).
pub fn load_sleep(path: &Path, policy: LoadPolicy) -> Result<Loaded<SleepRecord>, LoadError> {
    let text = read_input(Dataset::Sleep, path)?;
    parse_sleep(&text, policy)
}

/// Loads a workout file (`{"workout_log": [...]}`).
pub fn load_workouts(path: &Path, policy: LoadPolicy) -> Result<Loaded<WorkoutRecord>, LoadError> {
    let text = read_input(Dataset::Workout, path)?;
    parse_workouts(&text, policy)
}

/// Parses sleep data from JSON text.
pub fn parse_sleep(text: &str, policy: LoadPolicy) -> Result<Loaded<SleepRecord>, LoadError> {
    let document = decode(Dataset::Sleep, text)?;
    let entries = collection(Dataset::Sleep, &document)?;
    collect(Dataset::Sleep, entries, policy, |entry| {
        normalize_sleep(&SleepEntry::from_value(entry)?)
    })
}

/// Parses workout data from JSON text.
pub fn parse_workouts(text: &str, policy: LoadPolicy) -> Result<Loaded<WorkoutRecord>, LoadError> {
    let document = decode(Dataset::Workout, text)?;
    let entries = collection(Dataset::Workout, &document)?;
    collect(Dataset::Workout, entries, policy, |entry| {
        normalize_workout(&WorkoutEntry::from_value(entry)?)
    })
}

fn read_input(dataset: Dataset, path: &Path) -> Result<String, LoadError> {
    tracing::debug!(%dataset, path = %path.display(), "reading input file");
    std::fs::read_to_string(path).map_err(|source| LoadError::FileAccess {
        dataset,
        path: path.to_path_buf(),
        source,
    })
}

fn decode(dataset: Dataset, text: &str) -> Result<Value, LoadError> {
    serde_json::from_str(text).map_err(|source| LoadError::MalformedData { dataset, source })
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns the record array under the dataset's top-level key.
fn collection(dataset: Dataset, document: &Value) -> Result<&[Value], LoadError> {
    let key = dataset.collection_key();
    let Some(object) = document.as_object() else {
        return Err(LoadError::Structure {
            dataset,
            message: format!(
                "must be a JSON object with a '{key}' key, got {}",
                json_type(document)
            ),
        });
    };
    let Some(value) = object.get(key) else {
        return Err(LoadError::Structure {
            dataset,
            message: format!("must contain '{key}' key"),
        });
    };
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| LoadError::Structure {
            dataset,
            message: format!("'{key}' must be a list, got {}", json_type(value)),
        })
}

fn collect<T>(
    dataset: Dataset,
    entries: &[Value],
    policy: LoadPolicy,
    normalize: impl Fn(&Value) -> Result<T, RecordError>,
) -> Result<Loaded<T>, LoadError> {
    let mut records = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match normalize(entry) {
            Ok(record) => {
                tracing::debug!(%dataset, index, "accepted record");
                records.push(record);
            }
            Err(reason) => match policy {
                LoadPolicy::FailFast => {
                    return Err(LoadError::Record {
                        dataset,
                        index,
                        source: reason,
                    });
                }
                LoadPolicy::SkipAndWarn => {
                    tracing::warn!(%dataset, index, %reason, "skipping invalid record");
                    skipped.push(SkippedRecord { index, reason });
                }
            },
        }
    }

    tracing::info!(
        %dataset,
        accepted = records.len(),
        skipped = skipped.len(),
        "loaded records"
    );
    Ok(Loaded { records, skipped })
}
