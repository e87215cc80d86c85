//! Normalized record shapes.
//!
//! Records are only constructed by the normalizer, after range checks have
//! passed. Fields are exposed through accessors so a record cannot be
//! changed once built.

use chrono::{DateTime, NaiveDate, Utc};

/// A sleep session on the UTC clock, attributed to the day the sleeper woke up.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepRecord {
    date_utc: NaiveDate,
    sleep_start_utc: DateTime<Utc>,
    sleep_end_utc: DateTime<Utc>,
    duration_hours: f64,
    quality_score: u8,
}

impl SleepRecord {
    pub(crate) fn new(
        sleep_start_utc: DateTime<Utc>,
        sleep_end_utc: DateTime<Utc>,
        duration_hours: f64,
        quality_score: u8,
    ) -> Self {
        Self {
            date_utc: sleep_end_utc.date_naive(),
            sleep_start_utc,
            sleep_end_utc,
            duration_hours,
            quality_score,
        }
    }

    /// The wake-up date on the UTC clock.
    pub const fn date_utc(&self) -> NaiveDate {
        self.date_utc
    }

    pub const fn sleep_start_utc(&self) -> DateTime<Utc> {
        self.sleep_start_utc
    }

    pub const fn sleep_end_utc(&self) -> DateTime<Utc> {
        self.sleep_end_utc
    }

    pub const fn duration_hours(&self) -> f64 {
        self.duration_hours
    }

    pub const fn quality_score(&self) -> u8 {
        self.quality_score
    }
}

/// A workout converted from local wall-clock time to UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutRecord {
    pub(crate) id: String,
    pub(crate) timestamp_utc: DateTime<Utc>,
    pub(crate) date_utc: NaiveDate,
    pub(crate) original_timestamp: String,
    pub(crate) original_timezone: String,
    pub(crate) workout_type: String,
    pub(crate) duration_min: u32,
    pub(crate) calories: u32,
    pub(crate) crossed_day_boundary: bool,
}

impl WorkoutRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn timestamp_utc(&self) -> DateTime<Utc> {
        self.timestamp_utc
    }

    /// The UTC date this workout is attributed to.
    pub const fn date_utc(&self) -> NaiveDate {
        self.date_utc
    }

    /// The local timestamp exactly as it appeared in the input.
    pub fn original_timestamp(&self) -> &str {
        &self.original_timestamp
    }

    /// The IANA zone identifier exactly as it appeared in the input.
    pub fn original_timezone(&self) -> &str {
        &self.original_timezone
    }

    pub fn workout_type(&self) -> &str {
        &self.workout_type
    }

    pub const fn duration_min(&self) -> u32 {
        self.duration_min
    }

    pub const fn calories(&self) -> u32 {
        self.calories
    }

    /// Whether converting to UTC moved the workout onto a different calendar date.
    pub const fn crossed_day_boundary(&self) -> bool {
        self.crossed_day_boundary
    }
}

/// Sleep values attached to a day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepSummary {
    pub hours: f64,
    pub quality: u8,
}

/// Everything recorded for one UTC calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAggregate {
    date_utc: NaiveDate,
    sleep: Option<SleepSummary>,
    workouts: Vec<WorkoutRecord>,
    total_calories: u64,
    total_workout_minutes: u64,
}

impl DailyAggregate {
    /// Creates an empty aggregate with its own workout list.
    pub const fn new(date_utc: NaiveDate) -> Self {
        Self {
            date_utc,
            sleep: None,
            workouts: Vec::new(),
            total_calories: 0,
            total_workout_minutes: 0,
        }
    }

    /// Replaces the sleep summary for this day.
    pub fn set_sleep(&mut self, sleep: &SleepRecord) {
        self.sleep = Some(SleepSummary {
            hours: sleep.duration_hours,
            quality: sleep.quality_score,
        });
    }

    /// Appends a workout and updates the running totals.
    pub fn add_workout(&mut self, workout: WorkoutRecord) {
        self.total_calories += u64::from(workout.calories);
        self.total_workout_minutes += u64::from(workout.duration_min);
        self.workouts.push(workout);
    }

    pub const fn date_utc(&self) -> NaiveDate {
        self.date_utc
    }

    pub const fn sleep(&self) -> Option<SleepSummary> {
        self.sleep
    }

    pub fn sleep_hours(&self) -> Option<f64> {
        self.sleep.map(|s| s.hours)
    }

    pub fn workouts(&self) -> &[WorkoutRecord] {
        &self.workouts
    }

    pub const fn total_calories(&self) -> u64 {
        self.total_calories
    }

    pub const fn total_workout_minutes(&self) -> u64 {
        self.total_workout_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn workout(id: &str, calories: u32, minutes: u32) -> WorkoutRecord {
        let ts = Utc.with_ymd_and_hms(2023, 10, 2, 6, 15, 0).unwrap();
        WorkoutRecord {
            id: id.to_string(),
            timestamp_utc: ts,
            date_utc: ts.date_naive(),
            original_timestamp: "2023-10-01 23:15:00".to_string(),
            original_timezone: "America/Los_Angeles".to_string(),
            workout_type: "run".to_string(),
            duration_min: minutes,
            calories,
            crossed_day_boundary: true,
        }
    }

    #[test]
    fn sleep_record_uses_wake_up_date() {
        let start = Utc.with_ymd_and_hms(2023, 9, 30, 23, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2023, 10, 1, 7, 0, 0).unwrap();
        let record = SleepRecord::new(start, end, 8.0, 80);
        assert_eq!(record.date_utc(), NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
    }

    #[test]
    fn totals_track_workout_list() {
        let date = NaiveDate::from_ymd_opt(2023, 10, 2).unwrap();
        let mut day = DailyAggregate::new(date);
        day.add_workout(workout("w1", 300, 30));
        day.add_workout(workout("w2", 450, 45));

        assert_eq!(day.workouts().len(), 2);
        assert_eq!(day.total_calories(), 750);
        assert_eq!(day.total_workout_minutes(), 75);
    }

    #[test]
    fn aggregates_do_not_share_workout_lists() {
        let date = NaiveDate::from_ymd_opt(2023, 10, 2).unwrap();
        let mut first = DailyAggregate::new(date);
        let second = DailyAggregate::new(date);
        first.add_workout(workout("w1", 100, 10));

        assert_eq!(first.workouts().len(), 1);
        assert!(second.workouts().is_empty());
    }
}
