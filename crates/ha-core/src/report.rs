//! Output document for merged health data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::correlate::{BucketStats, Correlations};
use crate::merge::DailyData;
use crate::normalize::format_utc;
use crate::record::{DailyAggregate, WorkoutRecord};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub metadata: Metadata,
    pub daily_data: Vec<DailyEntry>,
    pub correlations: CorrelationSummary,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub generated_at: String,
    pub total_days: usize,
    /// `None` when there is no data at all.
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize)]
pub struct DailyEntry {
    pub date_utc: String,
    pub sleep: Option<DaySleep>,
    pub workouts: Vec<DayWorkout>,
    pub daily_totals: DailyTotals,
}

#[derive(Debug, Serialize)]
pub struct DaySleep {
    pub hours: f64,
    pub quality_score: u8,
}

#[derive(Debug, Serialize)]
pub struct DayWorkout {
    pub id: String,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub duration_min: u32,
    pub calories: u32,
    pub timestamp_utc: String,
    pub original_timestamp: String,
    pub original_timezone: String,
    pub day_boundary_crossed: bool,
}

#[derive(Debug, Serialize)]
pub struct DailyTotals {
    pub total_calories: u64,
    pub total_workout_minutes: u64,
    pub workout_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CorrelationSummary {
    pub low_sleep_days: BucketSummary,
    pub good_sleep_days: BucketSummary,
    pub day_boundary_crossings: usize,
}

#[derive(Debug, Serialize)]
pub struct BucketSummary {
    pub count: usize,
    pub avg_calories_burned: f64,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl From<&WorkoutRecord> for DayWorkout {
    fn from(workout: &WorkoutRecord) -> Self {
        Self {
            id: workout.id().to_string(),
            workout_type: workout.workout_type().to_string(),
            duration_min: workout.duration_min(),
            calories: workout.calories(),
            timestamp_utc: format_utc(workout.timestamp_utc()),
            original_timestamp: workout.original_timestamp().to_string(),
            original_timezone: workout.original_timezone().to_string(),
            day_boundary_crossed: workout.crossed_day_boundary(),
        }
    }
}

impl From<&DailyAggregate> for DailyEntry {
    fn from(day: &DailyAggregate) -> Self {
        Self {
            date_utc: format_date(day.date_utc()),
            sleep: day.sleep().map(|s| DaySleep {
                hours: s.hours,
                quality_score: s.quality,
            }),
            workouts: day.workouts().iter().map(DayWorkout::from).collect(),
            daily_totals: DailyTotals {
                total_calories: day.total_calories(),
                total_workout_minutes: day.total_workout_minutes(),
                workout_count: day.workouts().len(),
            },
        }
    }
}

impl From<Option<BucketStats>> for BucketSummary {
    fn from(stats: Option<BucketStats>) -> Self {
        stats.map_or(
            Self {
                count: 0,
                avg_calories_burned: 0.0,
            },
            |s| Self {
                count: s.count,
                avg_calories_burned: round2(s.avg_calories),
            },
        )
    }
}

impl HealthReport {
    /// Builds the output document.
    ///
    /// `workout_records` is the full loaded workout list; the boundary
    /// crossing count is taken from it.
    pub fn build(
        daily: &DailyData,
        workout_records: &[WorkoutRecord],
        correlations: &Correlations,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let date_range = match (daily.keys().next(), daily.keys().next_back()) {
            (Some(start), Some(end)) => Some(DateRange {
                start: format_date(*start),
                end: format_date(*end),
            }),
            _ => None,
        };

        Self {
            metadata: Metadata {
                generated_at: generated_at.to_rfc3339(),
                total_days: daily.len(),
                date_range,
            },
            daily_data: daily.values().map(DailyEntry::from).collect(),
            correlations: CorrelationSummary {
                low_sleep_days: correlations.low_sleep.into(),
                good_sleep_days: correlations.good_sleep.into(),
                day_boundary_crossings: workout_records
                    .iter()
                    .filter(|w| w.crossed_day_boundary())
                    .count(),
            },
        }
    }

    /// Serializes with two-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
