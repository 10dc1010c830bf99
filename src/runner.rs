//! Config-driven pipelines behind each CLI command.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ScenarioConfig;
use crate::error::{GridError, Result};
use crate::io::export::{export_archetype, load_archetype};
use crate::resstock::ingest::{IngestSummary, ingest_metadata};
use crate::resstock::lake::{find_building_file, resolve_timeseries_dir};
use crate::resstock::metadata::{HomeRecord, MetadataTable, load_metadata};
use crate::resstock::timeseries::load_timeseries;
use crate::sim::electrify::{ArchetypeProfile, ProfileSummary, electrify};
use crate::sim::feeder::{FeederStudy, StudySettings};
use crate::sim::selection::{TargetList, addressable_homes, intervention_list, select_target};

/// Normalizes a raw metadata export into the configured metadata CSV.
///
/// `state` and `out` override the configured values when given.
///
/// # Errors
///
/// Propagates ingest failures.
pub fn run_ingest(
    cfg: &ScenarioConfig,
    raw: &Path,
    state: Option<&str>,
    out: Option<&Path>,
) -> Result<IngestSummary> {
    let state = state.unwrap_or(cfg.data.state.as_str());
    let out = out.unwrap_or(cfg.data.metadata_csv.as_path());
    info!(raw = %raw.display(), state, "ingesting ResStock metadata");
    ingest_metadata(raw, state, out)
}

/// Result of the single-home analysis.
#[derive(Debug, Clone)]
pub struct HomeAnalysis {
    pub target: HomeRecord,
    /// Timeseries file the profile was built from.
    pub source: PathBuf,
    /// Full electrified profile, as written to the archetype CSV.
    pub profile: ArchetypeProfile,
    /// Zoom window of `profile`.
    pub window: ArchetypeProfile,
    pub summary: ProfileSummary,
}

/// Picks a target home, electrifies its timeseries, and writes the
/// archetype profile CSV.
///
/// # Errors
///
/// Fails when metadata or timeseries cannot be loaded, no target
/// qualifies, or the archetype cannot be written.
pub fn analyze_home(cfg: &ScenarioConfig) -> Result<HomeAnalysis> {
    let table = load_metadata(&cfg.data.metadata_csv)?;
    info!(homes = table.len(), "loaded metadata");

    let a = &cfg.analysis;
    let target = select_target(&table, &a.target_fuel, a.min_sqft)?.clone();
    info!(bldg_id = %target.bldg_id, sqft = ?target.sqft, "target selected");

    let dir = resolve_timeseries_dir(&cfg.data.lake_root, &cfg.data.state, cfg.data.upgrade)?;
    let source = find_building_file(&dir, &target.bldg_id)?;
    info!(path = %source.display(), "found building timeseries");

    let intervals = load_timeseries(&source)?;
    let profile = electrify(Some(target.bldg_id.clone()), &intervals, a.cop)?;
    export_archetype(&profile, &cfg.data.archetype_csv)?;
    info!(path = %cfg.data.archetype_csv.display(), "archetype profile saved");

    let window = profile.window(a.window_start, a.window_end);
    if window.is_empty() {
        warn!("zoom window holds no intervals");
    }
    let summary = window.summary();

    Ok(HomeAnalysis {
        target,
        source,
        profile,
        window,
        summary,
    })
}

/// Metadata and windowed archetype shared by feeder studies.
#[derive(Debug, Clone)]
pub struct StudyInputs {
    pub table: MetadataTable,
    pub profile: ArchetypeProfile,
}

impl StudyInputs {
    /// Loads the metadata and archetype CSVs, cut to the feeder window.
    ///
    /// # Errors
    ///
    /// Fails when either file is missing or malformed.
    pub fn load(cfg: &ScenarioConfig) -> Result<Self> {
        let table = load_metadata(&cfg.data.metadata_csv)?;
        let full = load_archetype(&cfg.data.archetype_csv)?;
        let profile = full.window(cfg.feeder.window_start, cfg.feeder.window_end);
        if profile.is_empty() {
            warn!(
                intervals = full.len(),
                "feeder window holds no archetype intervals"
            );
        }
        Ok(Self { table, profile })
    }

    /// County used when none is requested: the first in sorted order.
    pub fn default_county(&self) -> Option<String> {
        self.table.counties().into_iter().next()
    }
}

/// Study settings from config, with an optional adoption override.
pub fn study_settings(cfg: &ScenarioConfig, adoption_pct: Option<u32>) -> StudySettings {
    StudySettings {
        adoption_pct: adoption_pct.unwrap_or(cfg.feeder.adoption_pct),
        addressable_fuels: cfg.feeder.addressable_fuels.clone(),
        capacity_mw: cfg.feeder.capacity_mw,
    }
}

/// Runs a feeder study and builds the county's intervention list.
///
/// # Errors
///
/// Fails for an unknown county, adoption above 100, or metadata without
/// a heating column.
pub fn run_feeder(
    cfg: &ScenarioConfig,
    inputs: &StudyInputs,
    county: &str,
    adoption_pct: Option<u32>,
) -> Result<(FeederStudy, TargetList)> {
    let settings = study_settings(cfg, adoption_pct);
    let study = FeederStudy::run(&inputs.table, county, &inputs.profile, &settings)?;
    let targets = county_targets(cfg, inputs, county, cfg.targeting.limit)?;
    Ok((study, targets))
}

/// Intervention list for `county`.
///
/// # Errors
///
/// Fails for an unknown county or metadata without a heating column.
pub fn county_targets(
    cfg: &ScenarioConfig,
    inputs: &StudyInputs,
    county: &str,
    limit: usize,
) -> Result<TargetList> {
    let homes = inputs.table.homes_in_county(county);
    if homes.is_empty() {
        return Err(GridError::UnknownCounty(county.to_string()));
    }
    let gas = addressable_homes(&inputs.table, &homes, &cfg.feeder.addressable_fuels)?;
    Ok(intervention_list(
        inputs.table.has_income,
        &gas,
        &cfg.targeting.income_patterns,
        limit,
    ))
}
