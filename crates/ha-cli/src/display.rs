//! Human-readable console sections.

use std::fmt::Write;

use ha_core::normalize::parse_local_timestamp;
use ha_core::{Correlations, DailyData, Dataset, SkippedRecord, WorkoutRecord};

fn heading(output: &mut String, title: &str) {
    writeln!(output, "{title}").unwrap();
    writeln!(output, "{}", "─".repeat(title.chars().count())).unwrap();
}

/// Lists records left out of a skip-and-warn load.
pub fn format_skipped(dataset: Dataset, skipped: &[SkippedRecord]) -> String {
    let mut output = String::new();
    if skipped.is_empty() {
        return output;
    }

    writeln!(
        output,
        "Warning: skipped {} invalid {dataset} record(s):",
        skipped.len()
    )
    .unwrap();
    for record in skipped {
        writeln!(output, "  - Record {}: {}", record.index, record.reason).unwrap();
    }
    output
}

/// Shows which workouts landed on a different date after conversion to UTC.
pub fn format_boundary_analysis(workouts: &[WorkoutRecord]) -> String {
    let mut output = String::new();
    heading(&mut output, "DAY BOUNDARY ANALYSIS");

    let crossings: Vec<_> = workouts.iter().filter(|w| w.crossed_day_boundary()).collect();
    if crossings.is_empty() {
        writeln!(output, "No workouts crossed the day boundary.").unwrap();
        return output;
    }

    writeln!(
        output,
        "Found {} workout(s) that crossed the day boundary:",
        crossings.len()
    )
    .unwrap();
    for workout in crossings {
        let local_date = parse_local_timestamp(workout.original_timestamp())
            .map(|dt| dt.date().to_string())
            .unwrap_or_default();
        writeln!(output).unwrap();
        writeln!(output, "  Workout: {} ({})", workout.id(), workout.workout_type()).unwrap();
        writeln!(
            output,
            "    Local: {} {}",
            workout.original_timestamp(),
            workout.original_timezone()
        )
        .unwrap();
        writeln!(
            output,
            "    UTC:   {} UTC",
            workout.timestamp_utc().format("%Y-%m-%d %H:%M:%S")
        )
        .unwrap();
        writeln!(
            output,
            "    Date:  {local_date} (local) -> {} (UTC, attributed)",
            workout.date_utc()
        )
        .unwrap();
    }
    output
}

/// Prints each merged day with its sleep and workouts.
pub fn format_daily_summary(daily: &DailyData) -> String {
    let mut output = String::new();
    heading(&mut output, "MERGED DAILY DATA (UTC)");

    if daily.is_empty() {
        writeln!(output, "No data.").unwrap();
        return output;
    }

    for (date, day) in daily {
        writeln!(output).unwrap();
        writeln!(output, "{date}").unwrap();

        match day.sleep() {
            Some(sleep) => writeln!(
                output,
                "  Sleep:    {:.1} hrs (quality: {}/100)",
                sleep.hours, sleep.quality
            )
            .unwrap(),
            None => writeln!(output, "  Sleep:    No data").unwrap(),
        }

        if day.workouts().is_empty() {
            writeln!(output, "  Workouts: None").unwrap();
            continue;
        }

        writeln!(output, "  Workouts: {}", day.workouts().len()).unwrap();
        for workout in day.workouts() {
            let marker = if workout.crossed_day_boundary() {
                " [day boundary crossed]"
            } else {
                ""
            };
            writeln!(
                output,
                "    - {}: {} cal, {} min{marker}",
                workout.workout_type(),
                workout.calories(),
                workout.duration_min()
            )
            .unwrap();
        }
        writeln!(
            output,
            "  Total:    {} cal, {} min",
            day.total_calories(),
            day.total_workout_minutes()
        )
        .unwrap();
    }
    output
}

/// Prints the sleep vs. exercise metrics.
pub fn format_correlations(correlations: &Correlations) -> String {
    let mut output = String::new();
    heading(&mut output, "CORRELATION ANALYSIS");

    let has_rates = correlations.workout_rate_low_sleep.is_some()
        || correlations.workout_rate_good_sleep.is_some();
    if correlations.low_sleep.is_none() && correlations.good_sleep.is_none() && !has_rates {
        writeln!(output, "Not enough sleep data for correlations.").unwrap();
        return output;
    }

    if let Some(low) = correlations.low_sleep {
        writeln!(output, "Days with < 6 hours sleep ({} days):", low.count).unwrap();
        writeln!(output, "  Average calories burned: {:.0}", low.avg_calories).unwrap();
    }
    if let Some(good) = correlations.good_sleep {
        writeln!(output, "Days with >= 7 hours sleep ({} days):", good.count).unwrap();
        writeln!(output, "  Average calories burned: {:.0}", good.avg_calories).unwrap();
    }

    if has_rates {
        writeln!(output, "Workout frequency:").unwrap();
        if let Some(rate) = correlations.workout_rate_low_sleep {
            writeln!(output, "  After < 6 hours sleep:  {:.0}% of days", rate * 100.0).unwrap();
        }
        if let Some(rate) = correlations.workout_rate_good_sleep {
            writeln!(output, "  After >= 7 hours sleep: {:.0}% of days", rate * 100.0).unwrap();
        }
    }

    if let (Some(low), Some(good)) = (correlations.low_sleep, correlations.good_sleep) {
        let diff = good.avg_calories - low.avg_calories;
        writeln!(output).unwrap();
        if diff.abs() < 0.5 {
            writeln!(output, "Insight: no difference in calories burned on well-rested days").unwrap();
        } else if diff > 0.0 {
            writeln!(output, "Insight: {diff:.0} more calories burned on well-rested days").unwrap();
        } else {
            writeln!(output, "Insight: {:.0} fewer calories burned on well-rested days", -diff).unwrap();
        }
    }
    output
}
