//! Heat pump electrification of a single home's interval data.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::types::{DEFAULT_INTERVAL_HOURS, ProfilePoint};
use crate::error::{GridError, Result};
use crate::resstock::timeseries::IntervalRecord;

/// Heat pump efficiency used when none is configured.
pub const DEFAULT_COP: f64 = 3.0;

/// A home's electrified load profile, used as the per-home template for
/// feeder scaling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeProfile {
    /// Source building, when known.
    pub bldg_id: Option<String>,
    pub points: Vec<ProfilePoint>,
}

impl ArchetypeProfile {
    /// Wraps already-electrified points.
    pub fn new(bldg_id: Option<String>, points: Vec<ProfilePoint>) -> Self {
        Self { bldg_id, points }
    }

    /// Points with `start <= timestamp <= end`. Open bounds are unbounded.
    pub fn window(&self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        let points = self
            .points
            .iter()
            .filter(|p| start.is_none_or(|s| p.timestamp >= s))
            .filter(|p| end.is_none_or(|e| p.timestamp <= e))
            .copied()
            .collect();
        Self {
            bldg_id: self.bldg_id.clone(),
            points,
        }
    }

    /// Interval length in hours, inferred from the first two points.
    pub fn interval_hours(&self) -> f64 {
        match self.points.as_slice() {
            [a, b, ..] => {
                let hours = (b.timestamp - a.timestamp).num_seconds() as f64 / 3600.0;
                if hours > 0.0 {
                    hours
                } else {
                    DEFAULT_INTERVAL_HOURS
                }
            }
            _ => DEFAULT_INTERVAL_HOURS,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Peak and energy figures for this profile.
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary::from_points(&self.points)
    }
}

/// Replaces gas space heating with a heat pump of the given COP.
///
/// Added electric load is `gas_heating_kwh / cop`.
///
/// # Errors
///
/// Returns [`GridError::InvalidCop`] unless `cop` is finite and positive.
pub fn electrify(
    bldg_id: Option<String>,
    intervals: &[IntervalRecord],
    cop: f64,
) -> Result<ArchetypeProfile> {
    if !(cop.is_finite() && cop > 0.0) {
        return Err(GridError::InvalidCop(cop));
    }
    let points = intervals
        .iter()
        .map(|r| {
            let hp_added_kwh = r.gas_heating_kwh / cop;
            ProfilePoint {
                timestamp: r.timestamp,
                electricity_kwh: r.electricity_kwh,
                gas_heating_kwh: r.gas_heating_kwh,
                hp_added_kwh,
                total_after_kwh: r.electricity_kwh + hp_added_kwh,
            }
        })
        .collect();
    Ok(ArchetypeProfile::new(bldg_id, points))
}

/// Before/after peaks of a single-home profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub intervals: usize,
    /// Highest baseline interval (kWh per interval).
    pub baseline_peak_kwh: f64,
    pub baseline_peak_at: Option<NaiveDateTime>,
    /// Highest electrified interval (kWh per interval).
    pub simulated_peak_kwh: f64,
    pub simulated_peak_at: Option<NaiveDateTime>,
    /// Heat pump energy added over the profile (kWh).
    pub added_energy_kwh: f64,
    /// Peak growth relative to the baseline peak (0 when the baseline peak is zero).
    pub peak_increase_pct: f64,
}

impl ProfileSummary {
    /// Computes the summary from profile points.
    pub fn from_points(points: &[ProfilePoint]) -> Self {
        let baseline = peak_of(points, |p| p.electricity_kwh);
        let simulated = peak_of(points, |p| p.total_after_kwh);
        let baseline_peak_kwh = baseline.map_or(0.0, |(v, _)| v);
        let simulated_peak_kwh = simulated.map_or(0.0, |(v, _)| v);
        let peak_increase_pct = if baseline_peak_kwh > 0.0 {
            100.0 * (simulated_peak_kwh - baseline_peak_kwh) / baseline_peak_kwh
        } else {
            0.0
        };
        Self {
            intervals: points.len(),
            baseline_peak_kwh,
            baseline_peak_at: baseline.map(|(_, t)| t),
            simulated_peak_kwh,
            simulated_peak_at: simulated.map(|(_, t)| t),
            added_energy_kwh: points.iter().map(|p| p.hp_added_kwh).sum(),
            peak_increase_pct,
        }
    }
}

/// First maximum of `value` over `points`.
fn peak_of(
    points: &[ProfilePoint],
    value: impl Fn(&ProfilePoint) -> f64,
) -> Option<(f64, NaiveDateTime)> {
    points.iter().fold(None, |best, p| {
        let v = value(p);
        match best {
            Some((b, _)) if b >= v => best,
            _ => Some((v, p.timestamp)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ts(minutes: i64) -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2018-01-17 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
            + Duration::minutes(minutes)
    }

    fn intervals(data: &[(f64, f64)]) -> Vec<IntervalRecord> {
        data.iter()
            .enumerate()
            .map(|(i, &(e, g))| IntervalRecord {
                timestamp: ts(15 * i as i64),
                electricity_kwh: e,
                gas_heating_kwh: g,
            })
            .collect()
    }

    #[test]
    fn adds_gas_over_cop() {
        let profile = electrify(None, &intervals(&[(1.0, 3.0), (0.5, 0.0)]), 3.0).unwrap();
        assert!((profile.points[0].hp_added_kwh - 1.0).abs() < 1e-12);
        assert!((profile.points[0].total_after_kwh - 2.0).abs() < 1e-12);
        assert_eq!(profile.points[1].total_after_kwh, 0.5);
    }

    #[test]
    fn rejects_non_positive_cop() {
        assert!(matches!(
            electrify(None, &intervals(&[(1.0, 1.0)]), 0.0),
            Err(GridError::InvalidCop(_))
        ));
        assert!(electrify(None, &[], f64::NAN).is_err());
    }

    #[test]
    fn window_is_inclusive() {
        let profile = electrify(None, &intervals(&[(1.0, 0.0); 8]), 3.0).unwrap();
        let w = profile.window(Some(ts(15)), Some(ts(60)));
        assert_eq!(w.len(), 4);
        assert_eq!(w.points[0].timestamp, ts(15));
        assert_eq!(w.points[3].timestamp, ts(60));
        assert_eq!(profile.window(None, None).len(), 8);
    }

    #[test]
    fn interval_hours_inferred_or_defaulted() {
        let profile = electrify(None, &intervals(&[(1.0, 0.0); 3]), 3.0).unwrap();
        assert_eq!(profile.interval_hours(), 0.25);
        let single = electrify(None, &intervals(&[(1.0, 0.0)]), 3.0).unwrap();
        assert_eq!(single.interval_hours(), DEFAULT_INTERVAL_HOURS);
    }

    #[test]
    fn summary_tracks_both_peaks() {
        // baseline peaks at t=0 (2.0), simulated peaks at t=1 (1.0 + 6/3 = 3.0)
        let profile = electrify(None, &intervals(&[(2.0, 0.0), (1.0, 6.0), (0.5, 0.0)]), 3.0)
            .unwrap();
        let s = profile.summary();
        assert_eq!(s.baseline_peak_kwh, 2.0);
        assert_eq!(s.baseline_peak_at, Some(ts(0)));
        assert!((s.simulated_peak_kwh - 3.0).abs() < 1e-12);
        assert_eq!(s.simulated_peak_at, Some(ts(15)));
        assert!((s.peak_increase_pct - 50.0).abs() < 1e-9);
        assert!((s.added_energy_kwh - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_summary_is_zero() {
        let s = ProfileSummary::from_points(&[]);
        assert_eq!(s.intervals, 0);
        assert_eq!(s.peak_increase_pct, 0.0);
        assert!(s.baseline_peak_at.is_none());
    }
}
