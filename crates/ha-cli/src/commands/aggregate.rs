//! The aggregation pipeline: load, merge, correlate, write.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ha_core::{
    Correlations, DailyData, Dataset, HealthReport, Loaded, SleepRecord, WorkoutRecord,
    calculate_correlations, load_sleep, load_workouts, merge_by_day,
};

use crate::display;
use crate::{Config, Sections};

/// Everything computed from one pair of input files.
#[derive(Debug)]
pub struct Aggregation {
    pub sleep: Loaded<SleepRecord>,
    pub workouts: Loaded<WorkoutRecord>,
    pub daily: DailyData,
    pub correlations: Correlations,
}

impl Aggregation {
    pub fn report(&self, generated_at: DateTime<Utc>) -> HealthReport {
        HealthReport::build(
            &self.daily,
            &self.workouts.records,
            &self.correlations,
            generated_at,
        )
    }
}

/// Loads both inputs and computes the daily merge and correlations.
pub fn aggregate(config: &Config) -> Result<Aggregation> {
    let sleep = load_sleep(&config.sleep_path, config.policy)?;
    let workouts = load_workouts(&config.workouts_path, config.policy)?;

    let daily = merge_by_day(&sleep.records, &workouts.records);
    let correlations = calculate_correlations(&daily);

    Ok(Aggregation {
        sleep,
        workouts,
        daily,
        correlations,
    })
}

fn write_report(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Runs the pipeline, printing progress and the requested sections.
pub fn run(config: &Config, sections: Sections) -> Result<()> {
    println!("Personal Health Data Aggregator");
    println!();
    println!("Loading data...");

    let aggregation = aggregate(config)?;

    eprint!("{}", display::format_skipped(Dataset::Sleep, &aggregation.sleep.skipped));
    eprint!(
        "{}",
        display::format_skipped(Dataset::Workout, &aggregation.workouts.skipped)
    );
    println!("  Loaded {} sleep records (UTC)", aggregation.sleep.records.len());
    println!(
        "  Loaded {} workout records (converted from local time)",
        aggregation.workouts.records.len()
    );

    if sections.boundaries {
        println!();
        print!(
            "{}",
            display::format_boundary_analysis(&aggregation.workouts.records)
        );
    }

    println!();
    println!("Merging data by UTC date...");
    println!("  Created {} daily aggregates", aggregation.daily.len());

    if sections.summary {
        println!();
        print!("{}", display::format_daily_summary(&aggregation.daily));
    }
    if sections.correlations {
        println!();
        print!("{}", display::format_correlations(&aggregation.correlations));
    }

    let json = aggregation
        .report(Utc::now())
        .to_json_pretty()
        .context("failed to encode report")?;
    write_report(&config.output_path, &json)?;
    tracing::info!(path = %config.output_path.display(), "report written");

    println!();
    println!("JSON output saved to: {}", config.output_path.display());
    Ok(())
}
