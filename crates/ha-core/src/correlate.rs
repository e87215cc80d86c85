//! Sleep vs. exercise correlation metrics.

use crate::merge::DailyData;
use crate::record::DailyAggregate;

/// Below this many hours a night counts as low sleep.
pub const LOW_SLEEP_HOURS: f64 = 6.0;

/// At or above this many hours a night counts as good sleep.
pub const GOOD_SLEEP_HOURS: f64 = 7.0;

/// Day count and mean calories for one sleep bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStats {
    pub count: usize,
    pub avg_calories: f64,
}

/// Correlation results. Each metric is absent when it has no data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Correlations {
    /// Active days after less than [`LOW_SLEEP_HOURS`] of sleep.
    pub low_sleep: Option<BucketStats>,
    /// Active days after at least [`GOOD_SLEEP_HOURS`] of sleep.
    pub good_sleep: Option<BucketStats>,
    /// Share of low-sleep days with at least one workout.
    pub workout_rate_low_sleep: Option<f64>,
    /// Share of good-sleep days with at least one workout.
    pub workout_rate_good_sleep: Option<f64>,
}

fn is_low(hours: f64) -> bool {
    hours < LOW_SLEEP_HOURS
}

fn is_good(hours: f64) -> bool {
    hours >= GOOD_SLEEP_HOURS
}

#[allow(clippy::cast_precision_loss)]
fn bucket<'a>(days: impl Iterator<Item = &'a DailyAggregate>) -> Option<BucketStats> {
    let (count, calories) = days.fold((0_usize, 0_u64), |(n, total), day| {
        (n + 1, total + day.total_calories())
    });
    (count > 0).then(|| BucketStats {
        count,
        avg_calories: calories as f64 / count as f64,
    })
}

#[allow(clippy::cast_precision_loss)]
fn workout_rate(days: &[(f64, bool)], in_bucket: fn(f64) -> bool) -> Option<f64> {
    let (total, active) = days
        .iter()
        .filter(|(hours, _)| in_bucket(*hours))
        .fold((0_usize, 0_usize), |(n, with), (_, worked_out)| {
            (n + 1, with + usize::from(*worked_out))
        });
    (total > 0).then(|| active as f64 / total as f64)
}

/// Computes sleep/exercise metrics over merged daily data.
///
/// Calorie buckets only consider days with calories burned; days with 6 to 7
/// hours of sleep or no sleep record fall in neither bucket. Workout rates
/// consider every day with a sleep record.
pub fn calculate_correlations(daily: &DailyData) -> Correlations {
    let active_with_sleep = || {
        daily
            .values()
            .filter(|day| day.total_calories() > 0)
            .filter_map(|day| day.sleep_hours().map(|hours| (hours, day)))
    };

    let low_sleep = bucket(
        active_with_sleep()
            .filter(|(hours, _)| is_low(*hours))
            .map(|(_, day)| day),
    );
    let good_sleep = bucket(
        active_with_sleep()
            .filter(|(hours, _)| is_good(*hours))
            .map(|(_, day)| day),
    );

    let slept: Vec<(f64, bool)> = daily
        .values()
        .filter_map(|day| {
            day.sleep_hours()
                .map(|hours| (hours, !day.workouts().is_empty()))
        })
        .collect();

    Correlations {
        low_sleep,
        good_sleep,
        workout_rate_low_sleep: workout_rate(&slept, is_low),
        workout_rate_good_sleep: workout_rate(&slept, is_good),
    }
}
