//! Shared test fixtures for integration tests.
//!
//! Each fixture lives in its own temp directory: a raw metadata export, a
//! local data-lake mirror with one building timeseries, and a config
//! file pointing at both.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime, Timelike};
use grid_stress_sim::config::ScenarioConfig;
use tempfile::TempDir;

/// Building chosen by the default target filter (gas, > 2500 sqft).
pub const TARGET_BLDG: &str = "102";

/// Raw export: pandas index as the unnamed first column, the older
/// floor-area column name, and one out-of-state row.
pub const RAW_METADATA: &str = "\
,in.state,in.city,in.county,in.geometry_floor_area,in.vintage,in.heating_fuel,in.hvac_cooling_type,in.income,in.usage_level,in.weather_file_city
101,SC,Columbia,Richland,2000,1980s,Natural Gas,Central AC,100000-119999,Medium,Columbia
102,SC,Columbia,Richland,2800,2000s,Natural Gas,Central AC,60000-69999,High,Columbia
103,SC,Columbia,Richland,3000,2010s,Electricity,Heat Pump,200000+,Medium,Columbia
201,SC,Aiken,Aiken,1900,1970s,Propane,Room AC,200000+,Low,Augusta
301,GA,Atlanta,Fulton,3500,2000s,Natural Gas,Central AC,200000+,High,Atlanta
";

/// Electricity per interval for the target home (kWh).
pub const BASE_KWH: f64 = 0.5;
/// Gas heating per interval during the morning spike, 05:00-07:45 (kWh).
pub const SPIKE_GAS_KWH: f64 = 3.0;
/// Gas heating per interval otherwise (kWh).
pub const IDLE_GAS_KWH: f64 = 0.6;

/// Scratch workspace with raw inputs and a matching config.
pub struct Fixture {
    pub dir: TempDir,
    pub raw_metadata: PathBuf,
    pub config: ScenarioConfig,
    pub config_path: PathBuf,
}

impl Fixture {
    /// Creates raw metadata, a `state=SC/upgrade=0` lake, and `study.toml`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let root = dir.path();

        let raw_metadata = root.join("raw_metadata.csv");
        fs::write(&raw_metadata, RAW_METADATA).expect("raw metadata should be written");

        let lake_root = root.join("lake");
        let building_dir = lake_root.join("state=SC").join("upgrade=0");
        fs::create_dir_all(&building_dir).expect("lake dirs should be created");
        fs::write(
            building_dir.join(format!("{TARGET_BLDG}-0.csv")),
            building_timeseries(),
        )
        .expect("timeseries should be written");
        // Another building whose name contains the target id.
        fs::write(building_dir.join("1020-0.csv"), "timestamp\n")
            .expect("decoy should be written");

        let toml = config_toml(root, &lake_root);
        let config_path = root.join("study.toml");
        fs::write(&config_path, &toml).expect("config should be written");
        let config = ScenarioConfig::from_toml_str(&toml).expect("fixture config should parse");

        Self {
            dir,
            raw_metadata,
            config,
            config_path,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn config_toml(root: &Path, lake_root: &Path) -> String {
    format!(
        r#"[data]
metadata_csv = "{}"
archetype_csv = "{}"
lake_root = "{}"
state = "SC"

[feeder]
adoption_pct = 50
"#,
        toml_path(&root.join("sc_resstock_metadata.csv")),
        toml_path(&root.join("archetype_profile.csv")),
        toml_path(lake_root),
    )
}

fn toml_path(p: &Path) -> String {
    p.display().to_string().replace('\\', "/")
}

/// Four days of 15-minute intervals starting 2018-01-16 00:15.
///
/// Electricity is flat; gas heating spikes every morning.
pub fn building_timeseries() -> String {
    let start = NaiveDateTime::parse_from_str("2018-01-16 00:15:00", "%Y-%m-%d %H:%M:%S")
        .expect("start timestamp should parse");
    let mut csv = String::from(
        "timestamp,out.electricity.total.energy_consumption,out.natural_gas.heating.energy_consumption\n",
    );
    for i in 0..(4 * 96) {
        let t = start + Duration::minutes(15 * i);
        let gas = if (5..8).contains(&t.hour()) {
            SPIKE_GAS_KWH
        } else {
            IDLE_GAS_KWH
        };
        let _ = writeln!(csv, "{},{BASE_KWH},{gas}", t.format("%Y-%m-%d %H:%M:%S"));
    }
    csv
}
