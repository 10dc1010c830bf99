//! TOML-based study configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::sim::electrify::DEFAULT_COP;

/// Top-level study configuration parsed from TOML.
///
/// All fields have defaults matching the cold-snap study. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::cold_snap`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Input file locations and data-lake coordinates.
    #[serde(default)]
    pub data: DataConfig,
    /// Single-home analysis parameters.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Feeder (county) study parameters.
    #[serde(default)]
    pub feeder: FeederConfig,
    /// Intervention list parameters.
    #[serde(default)]
    pub targeting: TargetingConfig,
}

/// Input file locations and data-lake coordinates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Clean metadata CSV written by `ingest`.
    pub metadata_csv: PathBuf,
    /// Archetype profile CSV written by `analyze-home`.
    pub archetype_csv: PathBuf,
    /// Local mirror of `timeseries_individual_buildings/by_state`.
    pub lake_root: PathBuf,
    /// Two-letter state code.
    pub state: String,
    /// ResStock upgrade scenario (0 is the baseline stock).
    pub upgrade: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            metadata_csv: PathBuf::from("sc_resstock_metadata.csv"),
            archetype_csv: PathBuf::from("archetype_profile.csv"),
            lake_root: PathBuf::from("resstock/timeseries_individual_buildings/by_state"),
            state: "SC".to_string(),
            upgrade: 0,
        }
    }
}

/// Single-home analysis parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Heat pump coefficient of performance.
    pub cop: f64,
    /// Heating fuel substring that marks a target home.
    pub target_fuel: String,
    /// Floor area a target home must exceed (sqft).
    pub min_sqft: f64,
    /// Zoom window start (inclusive).
    pub window_start: Option<NaiveDateTime>,
    /// Zoom window end (inclusive).
    pub window_end: Option<NaiveDateTime>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cop: DEFAULT_COP,
            target_fuel: "Gas".to_string(),
            min_sqft: 2500.0,
            window_start: datetime("2018-01-17 00:00:00"),
            window_end: datetime("2018-01-18 23:59:00"),
        }
    }
}

/// Feeder (county) study parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeederConfig {
    /// Share of gas-heated homes that switch to heat pumps (percent).
    pub adoption_pct: u32,
    /// Heating fuel substrings that make a home addressable.
    pub addressable_fuels: Vec<String>,
    /// Feeder capacity for violation counting (MW). `None` disables the check.
    pub capacity_mw: Option<f64>,
    /// Study window start (inclusive).
    pub window_start: Option<NaiveDateTime>,
    /// Study window end (inclusive).
    pub window_end: Option<NaiveDateTime>,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            adoption_pct: 20,
            addressable_fuels: vec!["Gas".to_string(), "Propane".to_string()],
            capacity_mw: None,
            window_start: datetime("2018-01-16 00:00:00"),
            window_end: datetime("2018-01-19 00:00:00"),
        }
    }
}

/// Intervention list parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetingConfig {
    /// Income bin substrings treated as high income.
    pub income_patterns: Vec<String>,
    /// Maximum rows in the intervention list.
    pub limit: usize,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            income_patterns: vec!["100".to_string(), "200".to_string()],
            limit: 50,
        }
    }
}

fn datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"analysis.cop"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ScenarioConfig {
    /// Returns the cold-snap study (January 2018 winter storm windows).
    pub fn cold_snap() -> Self {
        Self::default()
    }

    /// Returns the full-year preset: no zoom or study windows.
    pub fn full_year() -> Self {
        Self {
            analysis: AnalysisConfig {
                window_start: None,
                window_end: None,
                ..AnalysisConfig::default()
            },
            feeder: FeederConfig {
                window_start: None,
                window_end: None,
                ..FeederConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the high-adoption preset: aggressive uptake of less efficient units.
    pub fn high_adoption() -> Self {
        Self {
            analysis: AnalysisConfig {
                cop: 2.5,
                ..AnalysisConfig::default()
            },
            feeder: FeederConfig {
                adoption_pct: 80,
                ..FeederConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["cold_snap", "full_year", "high_adoption"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "cold_snap" => Ok(Self::cold_snap()),
            "full_year" => Ok(Self::full_year()),
            "high_adoption" => Ok(Self::high_adoption()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// Datetimes are quoted strings such as `"2018-01-16T00:00:00"`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let d = &self.data;
        if d.state.trim().is_empty() {
            errors.push(ConfigError {
                field: "data.state".into(),
                message: "must not be empty".into(),
            });
        }

        let a = &self.analysis;
        if !(a.cop.is_finite() && a.cop > 0.0) {
            errors.push(ConfigError {
                field: "analysis.cop".into(),
                message: "must be > 0".into(),
            });
        }
        if a.target_fuel.trim().is_empty() {
            errors.push(ConfigError {
                field: "analysis.target_fuel".into(),
                message: "must not be empty".into(),
            });
        }
        if !(a.min_sqft.is_finite() && a.min_sqft >= 0.0) {
            errors.push(ConfigError {
                field: "analysis.min_sqft".into(),
                message: "must be a finite number >= 0".into(),
            });
        }
        check_window(
            &mut errors,
            "analysis.window_start",
            a.window_start,
            a.window_end,
        );

        let f = &self.feeder;
        if f.adoption_pct > 100 {
            errors.push(ConfigError {
                field: "feeder.adoption_pct".into(),
                message: "must be <= 100".into(),
            });
        }
        if f.addressable_fuels.is_empty() {
            errors.push(ConfigError {
                field: "feeder.addressable_fuels".into(),
                message: "must list at least one fuel".into(),
            });
        }
        if let Some(cap) = f.capacity_mw {
            if !(cap.is_finite() && cap > 0.0) {
                errors.push(ConfigError {
                    field: "feeder.capacity_mw".into(),
                    message: "must be a finite number > 0".into(),
                });
            }
        }
        check_window(&mut errors, "feeder.window_start", f.window_start, f.window_end);

        if self.targeting.limit == 0 {
            errors.push(ConfigError {
                field: "targeting.limit".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}

fn check_window(
    errors: &mut Vec<ConfigError>,
    field: &str,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) {
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            errors.push(ConfigError {
                field: field.into(),
                message: "must be <= window end".into(),
            });
        }
    }
}
