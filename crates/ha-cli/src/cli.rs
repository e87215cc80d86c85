//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ha_core::LoadPolicy;

/// Merges sleep and workout data by UTC date.
///
/// Workout timestamps are converted from local time using IANA timezone
/// rules, so a late-evening workout may land on the next UTC day.
#[derive(Debug, Parser)]
#[command(name = "health-agg", version, about, long_about = None)]
pub struct Cli {
    /// Path to sleep data JSON file.
    #[arg(long, value_name = "PATH")]
    pub sleep: Option<PathBuf>,

    /// Path to workout data JSON file.
    #[arg(long, value_name = "PATH")]
    pub workouts: Option<PathBuf>,

    /// Output file path for merged JSON data.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// What to do with invalid records.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Print the merged daily data.
    #[arg(long)]
    pub show_summary: bool,

    /// Print workouts whose UTC date differs from their local date.
    #[arg(long)]
    pub show_boundaries: bool,

    /// Print sleep vs. exercise metrics.
    #[arg(long)]
    pub show_correlations: bool,

    /// Print every section and enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Invalid-record handling, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Abort on the first invalid record.
    FailFast,
    /// Skip invalid records and list them as warnings.
    SkipAndWarn,
}

impl From<PolicyArg> for LoadPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::FailFast => Self::FailFast,
            PolicyArg::SkipAndWarn => Self::SkipAndWarn,
        }
    }
}

/// Which console sections to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Sections {
    pub boundaries: bool,
    pub summary: bool,
    pub correlations: bool,
}

impl Cli {
    pub const fn sections(&self) -> Sections {
        Sections {
            boundaries: self.verbose || self.show_boundaries,
            summary: self.verbose || self.show_summary,
            correlations: self.verbose || self.show_correlations,
        }
    }
}
