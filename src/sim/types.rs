//! Core study types: electrified profile points and aggregate curve points.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Interval length assumed when a profile is too short to infer one (hours).
pub const DEFAULT_INTERVAL_HOURS: f64 = 0.25;

/// One interval of a single home's load before and after electrification.
///
/// Energy fields are kWh per interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfilePoint {
    pub timestamp: NaiveDateTime,
    /// Existing electricity use (gas heat still in place).
    pub electricity_kwh: f64,
    /// Gas consumed for space heating.
    pub gas_heating_kwh: f64,
    /// Electricity a heat pump needs to deliver the same heat.
    pub hp_added_kwh: f64,
    /// `electricity_kwh + hp_added_kwh`.
    pub total_after_kwh: f64,
}

/// One interval of aggregate feeder demand.
///
/// Demand fields are average MW over the interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub timestamp: NaiveDateTime,
    /// Existing demand of every addressable home.
    pub baseline_mw: f64,
    /// Demand added by converted homes.
    pub added_mw: f64,
    /// `baseline_mw + added_mw`.
    pub total_mw: f64,
    /// Whether `total_mw` fits the feeder capacity (always `true` without one).
    pub within_capacity: bool,
}

impl fmt::Display for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | baseline={:>8.3} MW  added={:>8.3} MW  total={:>8.3} MW ok={}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.baseline_mw,
            self.added_mw,
            self.total_mw,
            self.within_capacity,
        )
    }
}
