//! Post-hoc grid stress metrics from an aggregate feeder curve.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::types::CurvePoint;

/// Headline metrics of a feeder study.
///
/// Computed post-hoc from the curve so the reported numbers always agree
/// with the exported data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressReport {
    /// Gas-heated homes that could convert.
    pub eligible_homes: usize,
    /// Homes converting at the study's adoption rate.
    pub projected_installs: usize,
    /// Peak of the existing load (MW).
    pub old_peak_mw: f64,
    pub old_peak_at: Option<NaiveDateTime>,
    /// Peak of the electrified load (MW).
    pub new_peak_mw: f64,
    pub new_peak_at: Option<NaiveDateTime>,
    /// `new_peak_mw - old_peak_mw`.
    pub peak_growth_mw: f64,
    /// Peak growth relative to the old peak (0 when the old peak is zero).
    pub peak_increase_pct: f64,
    /// Heat pump energy added over the curve (MWh).
    pub added_energy_mwh: f64,
    /// Intervals where the feeder capacity is exceeded.
    pub capacity_violations: usize,
}

impl StressReport {
    /// Computes the report from the complete curve.
    ///
    /// # Arguments
    ///
    /// * `curve` - Aggregate feeder curve
    /// * `eligible_homes` - Addressable home count
    /// * `projected_installs` - Converting home count
    /// * `interval_hours` - Curve interval length for energy integration
    pub fn from_curve(
        curve: &[CurvePoint],
        eligible_homes: usize,
        projected_installs: usize,
        interval_hours: f64,
    ) -> Self {
        let mut old_peak: Option<(f64, NaiveDateTime)> = None;
        let mut new_peak: Option<(f64, NaiveDateTime)> = None;
        let mut added_mwh = 0.0;
        let mut violations = 0;

        for p in curve {
            if old_peak.is_none_or(|(v, _)| p.baseline_mw > v) {
                old_peak = Some((p.baseline_mw, p.timestamp));
            }
            if new_peak.is_none_or(|(v, _)| p.total_mw > v) {
                new_peak = Some((p.total_mw, p.timestamp));
            }
            added_mwh += p.added_mw * interval_hours;
            if !p.within_capacity {
                violations += 1;
            }
        }

        let old_peak_mw = old_peak.map_or(0.0, |(v, _)| v);
        let new_peak_mw = new_peak.map_or(0.0, |(v, _)| v);
        let peak_growth_mw = new_peak_mw - old_peak_mw;
        let peak_increase_pct = if old_peak_mw > 0.0 {
            100.0 * peak_growth_mw / old_peak_mw
        } else {
            0.0
        };

        Self {
            eligible_homes,
            projected_installs,
            old_peak_mw,
            old_peak_at: old_peak.map(|(_, t)| t),
            new_peak_mw,
            new_peak_at: new_peak.map(|(_, t)| t),
            peak_growth_mw,
            peak_increase_pct,
            added_energy_mwh: added_mwh,
            capacity_violations: violations,
        }
    }
}

fn at(t: Option<NaiveDateTime>) -> String {
    t.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Grid Stress Report ---")?;
        writeln!(f, "Eligible gas homes:    {}", self.eligible_homes)?;
        writeln!(f, "Projected installs:    {}", self.projected_installs)?;
        writeln!(
            f,
            "Current peak:          {:.2} MW at {}",
            self.old_peak_mw,
            at(self.old_peak_at)
        )?;
        writeln!(
            f,
            "New peak:              {:.2} MW at {} (+{:.2} MW)",
            self.new_peak_mw,
            at(self.new_peak_at),
            self.peak_growth_mw
        )?;
        writeln!(f, "Grid stress increase:  {:.1}%", self.peak_increase_pct)?;
        writeln!(f, "Added energy:          {:.2} MWh", self.added_energy_mwh)?;
        write!(f, "Capacity violations:   {}", self.capacity_violations)
    }
}
