//! Configuration file and data path resolution.
//!
//! Settings come from a TOML file named by `--config` or the
//! `CRASH_VIZ_CONFIG` environment variable, with every key optional:
//!
//! ```toml
//! data = "data/accidents.csv"
//!
//! [race]
//! top_n = 10
//! sub_steps = 4
//! transition_ms = 100
//! start_date = "2015-01-31"
//! cutoff_date = "2024-12-31"
//!
//! [histogram]
//! mode = "compare"
//! first_year = 2015
//! second_year = 2024
//!
//! [layout]
//! width = 100
//! label_width = 32
//! ```
//!
//! Command-line flags override file values.

use std::path::{Path, PathBuf};

use crash_viz_histogram_models::HistogramConfig;
use crash_viz_race_models::RaceConfig;
use crash_viz_render::LayoutConfig;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CRASH_VIZ_CONFIG";

/// Environment variable naming the accident CSV.
pub const DATA_ENV: &str = "CRASH_VIZ_DATA";

/// Accident CSV used when nothing else is configured.
pub const DEFAULT_DATA_PATH: &str = "data/accidents.csv";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path of the config file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`AppConfig`].
    #[error("Invalid config file {path}: {message}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// Parser message.
        message: String,
    },
}

/// Everything the config file can set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Accident CSV path.
    pub data: Option<PathBuf>,
    /// Race timeline and playback settings.
    pub race: RaceConfig,
    /// Histogram settings.
    pub histogram: HistogramConfig,
    /// Terminal layout.
    pub layout: LayoutConfig,
}

impl AppConfig {
    /// Parses a config file's contents.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `contents` is not valid.
    pub fn from_toml(contents: &str, path: &str) -> Result<Self, ConfigError> {
        toml::de::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Loads the config file named by `cli_path`, falling back to
    /// [`CONFIG_ENV`]. With neither set, returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the named file is unreadable or invalid.
    pub fn load(cli_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = cli_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let Some(path) = path else {
            log::debug!("No config file given; using defaults");
            return Ok(Self::default());
        };

        let display = path.display().to_string();
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config = Self::from_toml(&contents, &display)?;
        log::info!("Loaded config from {display}");
        Ok(config)
    }

    /// The accident CSV path: `cli_path`, then [`DATA_ENV`], then the
    /// config file, then [`DEFAULT_DATA_PATH`].
    #[must_use]
    pub fn data_path(&self, cli_path: Option<&Path>) -> PathBuf {
        cli_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(DATA_ENV).map(PathBuf::from))
            .or_else(|| self.data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crash_viz_histogram_models::HistogramKind;

    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml("", "empty.toml").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.race.top_n, 10);
        assert_eq!(config.layout.width, 100);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
data = "exports/crashes.csv"

[race]
top_n = 5
cutoff_date = "2019-12-31"

[histogram]
mode = "compare"

[layout]
colors = false
"#,
            "partial.toml",
        )
        .unwrap();

        assert_eq!(config.data, Some(PathBuf::from("exports/crashes.csv")));
        assert_eq!(config.race.top_n, 5);
        assert_eq!(config.race.sub_steps, 4);
        assert_eq!(
            config.race.cutoff_date,
            NaiveDate::from_ymd_opt(2019, 12, 31).unwrap()
        );
        assert_eq!(config.histogram.mode, HistogramKind::Compare);
        assert!(!config.layout.colors);
        assert_eq!(config.layout.label_width, 32);
    }

    #[test]
    fn invalid_toml_names_the_file() {
        let err = AppConfig::from_toml("[race]\ntop_n = \"many\"", "bad.toml").unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let err = AppConfig::load(Some(Path::new("no/such/crash_viz.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn cli_data_path_wins() {
        let config = AppConfig {
            data: Some(PathBuf::from("from-config.csv")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.data_path(Some(Path::new("from-cli.csv"))),
            PathBuf::from("from-cli.csv")
        );
    }
}
