//! Grid stress simulator for residential heat-pump electrification.
//!
//! Reads NREL ResStock metadata and 15-minute load profiles, injects the
//! electric load of replacing gas heating with heat pumps, and scales a
//! single-home archetype across a county feeder.

/// REST API (feature `api`).
#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
/// CSV outputs.
pub mod io;
pub mod plot;
pub mod reporting;
/// ResStock inputs: metadata, timeseries, and the local data lake.
pub mod resstock;
pub mod runner;
/// Electrification, target selection, feeder aggregation, and metrics.
pub mod sim;
pub mod telemetry;
