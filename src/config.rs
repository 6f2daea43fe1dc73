//! Run configuration: the climate year window, the Hawaii fallback estimate,
//! and where the three source files live.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{PipelineError, Result};

/// Environment variable that overrides the configured `current_year`.
pub const CURRENT_YEAR_ENV: &str = "HOLIDAY_CURRENT_YEAR";

pub const TEMPERATURE_FILE: &str = "climdiv-tmpcst.txt";
pub const PASSENGERS_FILE: &str = "airport_passengers.csv";
pub const DELAYS_FILE: &str = "flight_delays.csv";
pub const SNAPSHOT_FILE: &str = "combined_state_data.csv";

/// Temperatures used for Hawaii, which the continental climate-division
/// dataset does not cover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HawaiiEstimate {
    pub avg_dec_temperature: f64,
    pub avg_nov_temperature: f64,
}

impl Default for HawaiiEstimate {
    fn default() -> Self {
        Self {
            avg_dec_temperature: 73.0,
            avg_nov_temperature: 75.0,
        }
    }
}

/// Stored as a JSON object on disk; every field is optional:
/// ```json
/// { "current_year": 2024, "window_years": 5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub current_year: i32,
    pub window_years: u32,
    pub hawaii: HawaiiEstimate,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            current_year: 2024,
            window_years: 5,
            hawaii: HawaiiEstimate::default(),
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| PipelineError::SourceNotFound {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Applies a textual year override such as [`CURRENT_YEAR_ENV`]. A value
    /// that is not a year is ignored with a warning.
    pub fn with_year_override(self, value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None => self,
            Some(text) => match text.parse() {
                Ok(year) => self.with_current_year(year),
                Err(_) => {
                    warn!(value = %text, "Ignoring invalid HOLIDAY_CURRENT_YEAR");
                    self
                }
            },
        }
    }

    /// Years averaged by the temperature loader, ending at `current_year`.
    pub fn year_window(&self) -> RangeInclusive<i32> {
        let span = self.window_years.max(1) as i32;
        (self.current_year - span + 1)..=self.current_year
    }
}

/// Locations of the three source datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub temperature: PathBuf,
    pub passengers: PathBuf,
    pub delays: PathBuf,
}

impl DataPaths {
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            temperature: dir.join(TEMPERATURE_FILE),
            passengers: dir.join(PASSENGERS_FILE),
            delays: dir.join(DELAYS_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_default_window_is_five_years() {
        let config = PipelineConfig::default();
        assert_eq!(config.year_window(), 2020..=2024);
    }

    #[test]
    fn test_zero_window_covers_current_year() {
        let config = PipelineConfig {
            window_years: 0,
            ..Default::default()
        };
        assert_eq!(config.year_window(), 2024..=2024);
    }

    #[test]
    fn test_with_current_year_shifts_window() {
        let config = PipelineConfig::default().with_current_year(2010);
        assert_eq!(config.year_window(), 2006..=2010);
    }

    #[test]
    fn test_year_override_applied() {
        let config = PipelineConfig::default().with_year_override(Some("2023"));
        assert_eq!(config.current_year, 2023);
        assert_eq!(config.year_window(), 2019..=2023);
    }

    #[test]
    fn test_invalid_or_absent_year_override_ignored() {
        let config = PipelineConfig::default().with_current_year(2021);
        assert_eq!(config.clone().with_year_override(None).current_year, 2021);
        assert_eq!(config.with_year_override(Some("next")).current_year, 2021);
    }

    #[test]
    fn test_load_partial_json_uses_defaults() {
        let path = temp_path("holiday_travel_test_config.json");
        fs::write(&path, r#"{ "current_year": 2022 }"#).unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.current_year, 2022);
        assert_eq!(config.window_years, 5);
        assert_eq!(config.hawaii, HawaiiEstimate::default());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_source_not_found() {
        let err = PipelineConfig::load(temp_path("holiday_travel_no_such_config.json")).unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { .. }));
    }

    #[test]
    fn test_data_paths_from_dir() {
        let paths = DataPaths::from_dir("data");
        assert_eq!(paths.temperature, Path::new("data/climdiv-tmpcst.txt"));
        assert_eq!(paths.passengers, Path::new("data/airport_passengers.csv"));
        assert_eq!(paths.delays, Path::new("data/flight_delays.csv"));
    }
}
