//! Error types for loading and normalizing health records.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Link to the list of valid IANA timezone names, shown on resolution errors.
pub const IANA_ZONE_LIST_URL: &str = "https://en.wikipedia.org/wiki/List_of_tz_database_time_zones";

/// Which input a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Sleep,
    Workout,
}

impl Dataset {
    /// Top-level key holding the record array in this dataset's input file.
    pub const fn collection_key(self) -> &'static str {
        match self {
            Self::Sleep => "records",
            Self::Workout => "workout_log",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Workout => "workout",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record failed validation or normalization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// One or more required fields are absent. Names are sorted.
    #[error("missing required fields: {}. Required: {}", .missing.join(", "), .required.join(", "))]
    MissingFields {
        missing: Vec<String>,
        required: Vec<String>,
    },

    /// A timestamp string does not match the expected format.
    #[error("invalid timestamp in '{field}': '{value}'. Expected format: {expected}")]
    TimestampFormat {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// The timezone identifier is not in the IANA database.
    #[error(
        "invalid timezone '{zone}'. Use IANA timezone identifiers (e.g., 'America/Los_Angeles', 'Europe/London'). See: {url}",
        url = IANA_ZONE_LIST_URL
    )]
    TimezoneResolution { zone: String },

    /// A numeric field is out of bounds or has the wrong type.
    #[error("invalid value for '{field}': got {value}, expected {expected}")]
    RangeValidation {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Loading an input file failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file is missing or unreadable.
    #[error("{dataset} data file {}: {}", access_problem(.source), .path.display())]
    FileAccess {
        dataset: Dataset,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("invalid JSON in {dataset} data: {source}")]
    MalformedData {
        dataset: Dataset,
        #[source]
        source: serde_json::Error,
    },

    /// The top-level container is missing or has the wrong shape.
    #[error("{dataset} data {message}")]
    Structure { dataset: Dataset, message: String },

    /// A record failed validation (fail-fast policy).
    #[error("error processing {dataset} record {index}: {source}")]
    Record {
        dataset: Dataset,
        index: usize,
        #[source]
        source: RecordError,
    },
}

fn access_problem(err: &std::io::Error) -> &'static str {
    if err.kind() == std::io::ErrorKind::NotFound {
        "not found"
    } else {
        "unreadable"
    }
}

/// User-facing error categories, one per failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    FileAccess,
    MalformedData,
    Structure,
    MissingFields,
    TimestampFormat,
    TimezoneResolution,
    RangeValidation,
}

impl RecordError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingFields { .. } => ErrorCategory::MissingFields,
            Self::TimestampFormat { .. } => ErrorCategory::TimestampFormat,
            Self::TimezoneResolution { .. } => ErrorCategory::TimezoneResolution,
            Self::RangeValidation { .. } => ErrorCategory::RangeValidation,
        }
    }
}

impl LoadError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::FileAccess { .. } => ErrorCategory::FileAccess,
            Self::MalformedData { .. } => ErrorCategory::MalformedData,
            Self::Structure { .. } => ErrorCategory::Structure,
            Self::Record { source, .. } => source.category(),
        }
    }

    /// Returns true when the input file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileAccess { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
