//! Core logic for the health data aggregator.
//!
//! This crate contains the fundamental types and logic for:
//! - Validation: required-field checks on raw JSON entries
//! - Normalization: converting sleep and workout timestamps to UTC and
//!   attributing each record to a UTC calendar date
//! - Loading: reading input files under a fail-fast or skip-and-warn policy
//! - Merging and correlation: daily aggregates and sleep/exercise metrics
//! - Reporting: the JSON output document

pub mod correlate;
pub mod error;
pub mod loader;
pub mod merge;
pub mod normalize;
mod record;
pub mod report;
pub mod validate;

pub use correlate::{BucketStats, Correlations, calculate_correlations};
pub use error::{Dataset, ErrorCategory, LoadError, RecordError};
pub use loader::{LoadPolicy, Loaded, SkippedRecord, load_sleep, load_workouts};
pub use merge::{DailyData, merge_by_day};
pub use record::{DailyAggregate, SleepRecord, SleepSummary, WorkoutRecord};
pub use report::HealthReport;
