//! Feeder aggregation: scale one archetype across a county's homes.

use serde::Serialize;
use tracing::{debug, info};

use super::electrify::ArchetypeProfile;
use super::kpi::StressReport;
use super::selection::addressable_homes;
use super::types::CurvePoint;
use crate::error::{GridError, Result};
use crate::resstock::metadata::MetadataTable;

const KWH_PER_MWH: f64 = 1000.0;

/// A feeder that aggregates home demand into net load.
///
/// Load is positive demand in MW. Without a capacity the feeder never
/// reports a violation.
#[derive(Debug, Clone)]
pub struct Feeder {
    name: String,
    net_mw: f64,
    capacity_mw: f64,
}

impl Feeder {
    /// Creates a new feeder with no capacity limit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            net_mw: 0.0,
            capacity_mw: f64::INFINITY,
        }
    }

    /// Creates a new feeder with a capacity limit.
    ///
    /// Negative limits clamp to zero; a NaN limit means no limit.
    pub fn with_capacity(name: impl Into<String>, capacity_mw: f64) -> Self {
        let capacity_mw = if capacity_mw.is_nan() {
            f64::INFINITY
        } else {
            capacity_mw.max(0.0)
        };
        Self {
            name: name.into(),
            net_mw: 0.0,
            capacity_mw,
        }
    }

    /// Resets accumulated load to zero.
    pub fn reset(&mut self) {
        self.net_mw = 0.0;
    }

    /// Adds demand to the feeder.
    pub fn add_mw(&mut self, mw: f64) {
        self.net_mw += mw;
    }

    /// Returns the current load in MW.
    pub fn net_mw(&self) -> f64 {
        self.net_mw
    }

    /// Returns the capacity in MW (infinite when unset).
    pub fn capacity_mw(&self) -> f64 {
        self.capacity_mw
    }

    /// Returns `true` when the load fits the capacity.
    pub fn within_capacity(&self) -> bool {
        self.net_mw <= self.capacity_mw
    }

    /// Returns the feeder name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Inputs to a feeder study beyond the metadata and archetype.
#[derive(Debug, Clone)]
pub struct StudySettings {
    /// Share of addressable homes that convert (0-100).
    pub adoption_pct: u32,
    /// Heating fuel substrings that make a home addressable.
    pub addressable_fuels: Vec<String>,
    pub capacity_mw: Option<f64>,
}

/// Outcome of a feeder study: the aggregate curve and its metrics.
#[derive(Debug, Clone, Serialize)]
pub struct FeederStudy {
    pub county: String,
    pub adoption_pct: u32,
    pub report: StressReport,
    pub curve: Vec<CurvePoint>,
}

impl FeederStudy {
    /// Runs a study for `county`.
    ///
    /// Every addressable home contributes the archetype's existing load;
    /// `floor(eligible * adoption_pct / 100)` of them also add the heat
    /// pump load. Interval energy is converted to average MW.
    ///
    /// # Errors
    ///
    /// Returns an error for an adoption rate above 100, an unknown county,
    /// or metadata without a heating column.
    pub fn run(
        table: &MetadataTable,
        county: &str,
        profile: &ArchetypeProfile,
        settings: &StudySettings,
    ) -> Result<Self> {
        if settings.adoption_pct > 100 {
            return Err(GridError::InvalidAdoption(settings.adoption_pct));
        }
        let county_homes = table.homes_in_county(county);
        if county_homes.is_empty() {
            return Err(GridError::UnknownCounty(county.to_string()));
        }

        let gas_homes = addressable_homes(table, &county_homes, &settings.addressable_fuels)?;
        let eligible = gas_homes.len();
        let installs = projected_installs(eligible, settings.adoption_pct);
        debug!(county, homes = county_homes.len(), eligible, installs, "feeder population");

        let mut feeder = match settings.capacity_mw {
            Some(cap) => Feeder::with_capacity(county, cap),
            None => Feeder::new(county),
        };
        let curve = aggregate(&mut feeder, profile, eligible, installs);
        let report = StressReport::from_curve(&curve, eligible, installs, profile.interval_hours());

        info!(
            feeder = feeder.name(),
            capacity_mw = feeder.capacity_mw(),
            adoption_pct = settings.adoption_pct,
            new_peak_mw = report.new_peak_mw,
            peak_increase_pct = report.peak_increase_pct,
            "feeder study complete"
        );

        Ok(Self {
            county: county.to_string(),
            adoption_pct: settings.adoption_pct,
            report,
            curve,
        })
    }
}

/// Homes expected to convert, rounded down.
pub fn projected_installs(eligible: usize, adoption_pct: u32) -> usize {
    eligible * adoption_pct as usize / 100
}

fn aggregate(
    feeder: &mut Feeder,
    profile: &ArchetypeProfile,
    eligible: usize,
    installs: usize,
) -> Vec<CurvePoint> {
    let dt = profile.interval_hours();
    let to_mw = |kwh: f64, homes: usize| kwh * homes as f64 / KWH_PER_MWH / dt;

    profile
        .points
        .iter()
        .map(|p| {
            let baseline_mw = to_mw(p.electricity_kwh, eligible);
            let added_mw = to_mw(p.hp_added_kwh, installs);
            feeder.reset();
            feeder.add_mw(baseline_mw);
            feeder.add_mw(added_mw);
            CurvePoint {
                timestamp: p.timestamp,
                baseline_mw,
                added_mw,
                total_mw: feeder.net_mw(),
                within_capacity: feeder.within_capacity(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resstock::metadata::read_metadata;
    use crate::sim::types::ProfilePoint;
    use chrono::{Duration, NaiveDateTime};

    const META: &str = "\
bldg_id,in.county,in.sqft,in.heating_fuel
1,Richland,2400,Natural Gas
2,Richland,2600,Electricity
3,Richland,2700,Natural Gas
4,Richland,3200,Propane
5,Richland,1800,Natural Gas
6,Aiken,5000,Natural Gas
";

    fn profile(data: &[(f64, f64)]) -> ArchetypeProfile {
        let t0 =
            NaiveDateTime::parse_from_str("2018-01-17 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let points = data
            .iter()
            .enumerate()
            .map(|(i, &(e, hp))| ProfilePoint {
                timestamp: t0 + Duration::minutes(15 * i as i64),
                electricity_kwh: e,
                gas_heating_kwh: hp * 3.0,
                hp_added_kwh: hp,
                total_after_kwh: e + hp,
            })
            .collect();
        ArchetypeProfile::new(Some("1".into()), points)
    }

    fn settings(adoption_pct: u32) -> StudySettings {
        StudySettings {
            adoption_pct,
            addressable_fuels: vec!["Gas".into(), "Propane".into()],
            capacity_mw: None,
        }
    }

    #[test]
    fn test_within_capacity() {
        let mut feeder = Feeder::with_capacity("F", 4.0);
        feeder.add_mw(3.5);
        assert!(feeder.within_capacity());
        feeder.add_mw(1.0);
        assert!(!feeder.within_capacity());
        feeder.reset();
        assert_eq!(feeder.net_mw(), 0.0);
        assert!(Feeder::new("F").capacity_mw().is_infinite());
    }

    #[test]
    fn nan_capacity_never_flags_violations() {
        let mut feeder = Feeder::with_capacity("F", f64::NAN);
        assert!(feeder.capacity_mw().is_infinite());
        feeder.add_mw(1_000.0);
        assert!(feeder.within_capacity());
        assert_eq!(Feeder::with_capacity("F", -2.0).capacity_mw(), 0.0);
        assert_eq!(Feeder::with_capacity("Richland", 5.0).name(), "Richland");
    }

    #[test]
    fn installs_round_down() {
        assert_eq!(projected_installs(4, 20), 0);
        assert_eq!(projected_installs(4, 50), 2);
        assert_eq!(projected_installs(7, 100), 7);
        assert_eq!(projected_installs(0, 80), 0);
    }

    #[test]
    fn scales_archetype_by_home_counts() {
        let table = read_metadata(META.as_bytes()).unwrap();
        // 15-minute intervals: 1 kWh per interval = 4 kW average.
        let study =
            FeederStudy::run(&table, "Richland", &profile(&[(1.0, 0.5), (2.0, 1.0)]), &settings(50))
                .unwrap();
        assert_eq!(study.report.eligible_homes, 4);
        assert_eq!(study.report.projected_installs, 2);
        let p = &study.curve[1];
        assert!((p.baseline_mw - 2.0 * 4.0 / 1000.0 / 0.25).abs() < 1e-12);
        assert!((p.added_mw - 1.0 * 2.0 / 1000.0 / 0.25).abs() < 1e-12);
        assert!((p.total_mw - (p.baseline_mw + p.added_mw)).abs() < 1e-12);
    }

    #[test]
    fn zero_adoption_leaves_curve_unchanged() {
        let table = read_metadata(META.as_bytes()).unwrap();
        let study =
            FeederStudy::run(&table, "Richland", &profile(&[(1.0, 0.5)]), &settings(0)).unwrap();
        assert_eq!(study.curve[0].added_mw, 0.0);
        assert_eq!(study.report.peak_growth_mw, 0.0);
    }

    #[test]
    fn capacity_flags_violations() {
        let table = read_metadata(META.as_bytes()).unwrap();
        let mut s = settings(100);
        // baseline 0.016 MW, added 0.008 MW per interval below
        s.capacity_mw = Some(0.02);
        let study =
            FeederStudy::run(&table, "Richland", &profile(&[(1.0, 0.5), (0.5, 0.0)]), &s).unwrap();
        assert!(!study.curve[0].within_capacity);
        assert!(study.curve[1].within_capacity);
        assert_eq!(study.report.capacity_violations, 1);
    }

    #[test]
    fn rejects_bad_inputs() {
        let table = read_metadata(META.as_bytes()).unwrap();
        let p = profile(&[(1.0, 0.5)]);
        assert!(matches!(
            FeederStudy::run(&table, "Richland", &p, &settings(101)),
            Err(GridError::InvalidAdoption(101))
        ));
        assert!(matches!(
            FeederStudy::run(&table, "Nowhere", &p, &settings(20)),
            Err(GridError::UnknownCounty(_))
        ));
    }
}
