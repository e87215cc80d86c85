//! Merging sleep and workout records by UTC date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::record::{DailyAggregate, SleepRecord, WorkoutRecord};

/// Daily aggregates keyed (and ordered) by UTC date.
pub type DailyData = BTreeMap<NaiveDate, DailyAggregate>;

/// Groups records by their attributed UTC date.
///
/// A day appears only if at least one record maps to it. When several sleep
/// records share a date the last one wins. Workouts keep their input order.
pub fn merge_by_day(sleep_records: &[SleepRecord], workout_records: &[WorkoutRecord]) -> DailyData {
    let mut daily = DailyData::new();

    for sleep in sleep_records {
        let date = sleep.date_utc();
        daily
            .entry(date)
            .or_insert_with(|| DailyAggregate::new(date))
            .set_sleep(sleep);
    }

    for workout in workout_records {
        let date = workout.date_utc();
        daily
            .entry(date)
            .or_insert_with(|| DailyAggregate::new(date))
            .add_workout(workout.clone());
    }

    tracing::info!(days = daily.len(), "merged records by UTC date");
    daily
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{LoadPolicy, parse_sleep, parse_workouts};

    fn fixtures() -> (Vec<SleepRecord>, Vec<WorkoutRecord>) {
        let sleep = parse_sleep(
            r#"{"records": [
                {"sleep_start": "2023-09-30T23:00:00Z", "sleep_end": "2023-10-01T05:00:00Z",
                 "duration_hours": 6.0, "quality_score": 55},
                {"sleep_start": "2023-10-01T22:00:00Z", "sleep_end": "2023-10-02T06:00:00Z",
                 "duration_hours": 8.0, "quality_score": 90},
                {"sleep_start": "2023-10-02T13:00:00Z", "sleep_end": "2023-10-02T14:00:00Z",
                 "duration_hours": 1.0, "quality_score": 40}
            ]}"#,
            LoadPolicy::FailFast,
        )
        .unwrap()
        .into_records();

        let workouts = parse_workouts(
            r#"{"workout_log": [
                {"id": "a", "timestamp": "2023-10-01 08:30:00", "tz": "America/Los_Angeles",
                 "type": "run", "duration_min": 30, "calories": 300},
                {"id": "b", "timestamp": "2023-10-01 23:15:00", "tz": "America/Los_Angeles",
                 "type": "lift", "duration_min": 45, "calories": 250},
                {"id": "c", "timestamp": "2023-10-02 07:00:00", "tz": "Europe/London",
                 "type": "swim", "duration_min": 40, "calories": 400},
                {"id": "d", "timestamp": "2023-10-05 12:00:00", "tz": "UTC",
                 "type": "walk", "duration_min": 60, "calories": 200}
            ]}"#,
            LoadPolicy::FailFast,
        )
        .unwrap()
        .into_records();

        (sleep, workouts)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, day).unwrap()
    }

    #[test]
    fn one_entry_per_touched_date() {
        let (sleep, workouts) = fixtures();
        let daily = merge_by_day(&sleep, &workouts);

        let dates: Vec<_> = daily.keys().copied().collect();
        assert_eq!(dates, [date(1), date(2), date(5)]);
    }

    #[test]
    fn late_workout_is_attributed_to_next_utc_day() {
        let (sleep, workouts) = fixtures();
        let daily = merge_by_day(&sleep, &workouts);

        let oct1: Vec<_> = daily[&date(1)].workouts().iter().map(WorkoutRecord::id).collect();
        let oct2: Vec<_> = daily[&date(2)].workouts().iter().map(WorkoutRecord::id).collect();
        assert_eq!(oct1, ["a"]);
        assert_eq!(oct2, ["b", "c"]);
        assert_eq!(daily[&date(2)].total_calories(), 650);
        assert_eq!(daily[&date(2)].total_workout_minutes(), 85);
    }

    #[test]
    fn last_sleep_record_for_a_date_wins() {
        let (sleep, workouts) = fixtures();
        let daily = merge_by_day(&sleep, &workouts);

        let summary = daily[&date(2)].sleep().unwrap();
        assert!((summary.hours - 1.0).abs() < f64::EPSILON);
        assert_eq!(summary.quality, 40);
    }

    #[test]
    fn workout_only_day_has_no_sleep() {
        let (sleep, workouts) = fixtures();
        let daily = merge_by_day(&sleep, &workouts);

        assert!(daily[&date(5)].sleep().is_none());
        assert_eq!(daily[&date(5)].total_calories(), 200);
    }

    #[test]
    fn totals_equal_sum_of_workouts() {
        let (sleep, workouts) = fixtures();
        for day in merge_by_day(&sleep, &workouts).values() {
            let calories: u64 = day.workouts().iter().map(|w| u64::from(w.calories())).sum();
            let minutes: u64 = day.workouts().iter().map(|w| u64::from(w.duration_min())).sum();
            assert_eq!(day.total_calories(), calories);
            assert_eq!(day.total_workout_minutes(), minutes);
        }
    }

    #[test]
    fn merging_twice_gives_identical_results() {
        let (sleep, workouts) = fixtures();
        assert_eq!(merge_by_day(&sleep, &workouts), merge_by_day(&sleep, &workouts));
    }

    #[test]
    fn empty_inputs_give_empty_map() {
        assert!(merge_by_day(&[], &[]).is_empty());
    }
}
