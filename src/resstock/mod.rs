//! ResStock data access: metadata, ingest, interval timeseries, and the
//! local data-lake mirror.

pub mod ingest;
pub mod lake;
pub mod metadata;
pub mod timeseries;

/// Column names used across ResStock releases.
pub mod columns {
    pub const BLDG_ID: &str = "bldg_id";
    pub const STATE: &str = "in.state";
    pub const CITY: &str = "in.city";
    pub const COUNTY: &str = "in.county";
    pub const SQFT: &str = "in.sqft";
    pub const FLOOR_AREA: &str = "in.geometry_floor_area";
    pub const VINTAGE: &str = "in.vintage";
    pub const HEATING_FUEL: &str = "in.heating_fuel";
    pub const HVAC_HEATING_TYPE: &str = "in.hvac_heating_type";
    pub const COOLING_TYPE: &str = "in.hvac_cooling_type";
    pub const INCOME: &str = "in.income";
    pub const USAGE_LEVEL: &str = "in.usage_level";

    pub const TIMESTAMP: &str = "timestamp";
    pub const ELECTRICITY_TOTAL: &str = "out.electricity.total.energy_consumption";
    pub const GAS_HEATING: &str = "out.natural_gas.heating.energy_consumption";
    pub const HP_ADDED: &str = "hp_added_load";
    pub const TOTAL_AFTER: &str = "total_load_after";
}

/// Returns the first of `preferred` or `fallback` present in `headers`.
pub(crate) fn resolve_alias<'a>(
    headers: &csv::StringRecord,
    preferred: &'a str,
    fallback: &'a str,
) -> Option<&'a str> {
    if headers.iter().any(|h| h == preferred) {
        Some(preferred)
    } else if headers.iter().any(|h| h == fallback) {
        Some(fallback)
    } else {
        None
    }
}

pub(crate) fn header_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

pub(crate) fn header_names(headers: &csv::StringRecord) -> Vec<String> {
    headers.iter().map(str::to_string).collect()
}
