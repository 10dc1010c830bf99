/// Heat pump electrification of archetype load.
pub mod electrify;
/// Feeder model and county-level aggregation.
pub mod feeder;
pub mod kpi;
/// Target, addressable-market, and intervention-list selection.
pub mod selection;
pub mod types;
