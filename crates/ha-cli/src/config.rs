//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use ha_core::LoadPolicy;
use serde::{Deserialize, Serialize};

use crate::Cli;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Sleep data input file.
    pub sleep_path: PathBuf,
    /// Workout data input file.
    pub workouts_path: PathBuf,
    /// Where the merged JSON document is written.
    pub output_path: PathBuf,
    /// Invalid-record handling.
    pub policy: LoadPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sleep_path: PathBuf::from("data/sleep.json"),
            workouts_path: PathBuf::from("data/workouts.json"),
            output_path: PathBuf::from("merged_health_data.json"),
            policy: LoadPolicy::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`,
    /// then `HEALTH_AGG_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("HEALTH_AGG_"));

        figment.extract()
    }

    /// Applies explicit command-line flags on top of the loaded values.
    #[must_use]
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(path) = &cli.sleep {
            self.sleep_path.clone_from(path);
        }
        if let Some(path) = &cli.workouts {
            self.workouts_path.clone_from(path);
        }
        if let Some(path) = &cli.output {
            self.output_path.clone_from(path);
        }
        if let Some(policy) = cli.policy {
            self.policy = policy.into();
        }
        self
    }
}

/// Returns the platform-specific config directory.
///
/// On Linux: `~/.config/health-agg`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("health-agg"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_paths_match_documented_layout() {
        let config = Config::default();
        assert_eq!(config.sleep_path, PathBuf::from("data/sleep.json"));
        assert_eq!(config.workouts_path, PathBuf::from("data/workouts.json"));
        assert_eq!(config.output_path, PathBuf::from("merged_health_data.json"));
        assert_eq!(config.policy, LoadPolicy::SkipAndWarn);
    }

    #[test]
    fn test_dirs_config_path_ends_with_app_name() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "health-agg");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("config.toml");
        std::fs::write(
            &file,
            "sleep_path = \"/data/night.json\"\npolicy = \"fail-fast\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&file)).unwrap();
        assert_eq!(config.sleep_path, PathBuf::from("/data/night.json"));
        assert_eq!(config.policy, LoadPolicy::FailFast);
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("config.toml");
        std::fs::write(&file, "policy = \"sometimes\"\n").unwrap();

        assert!(Config::load_from(Some(&file)).is_err());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "health-agg",
            "--workouts",
            "w.json",
            "--policy",
            "fail-fast",
        ]);
        let config = Config::default().with_overrides(&cli);
        assert_eq!(config.workouts_path, PathBuf::from("w.json"));
        assert_eq!(config.sleep_path, PathBuf::from("data/sleep.json"));
        assert_eq!(config.policy, LoadPolicy::FailFast);
    }
}
