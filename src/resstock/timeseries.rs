//! Per-building 15-minute interval data.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::debug;

use super::columns;
use super::{header_index, header_names};
use crate::error::{GridError, Result};

/// Timestamp layouts seen in ResStock exports and our own CSVs.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Energy use over one interval ending at `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRecord {
    pub timestamp: NaiveDateTime,
    /// Total site electricity (kWh per interval).
    pub electricity_kwh: f64,
    /// Natural gas used for space heating (kWh per interval).
    pub gas_heating_kwh: f64,
}

/// Parses a timestamp in any of the accepted layouts.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Loads a building timeseries CSV.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a required column is
/// missing, or a row holds an invalid timestamp or number.
pub fn load_timeseries(path: &Path) -> Result<Vec<IntervalRecord>> {
    let file = File::open(path).map_err(|e| GridError::io(path, e))?;
    let records = read_timeseries(file).map_err(|e| match e {
        GridError::Csv { source, .. } => GridError::csv(path, source),
        other => other,
    })?;
    debug!(path = %path.display(), intervals = records.len(), "loaded timeseries");
    Ok(records)
}

/// Reads a building timeseries from any reader, sorted by timestamp.
///
/// Empty energy cells read as zero.
///
/// # Errors
///
/// See [`load_timeseries`].
pub fn read_timeseries(reader: impl Read) -> Result<Vec<IntervalRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| GridError::csv("<timeseries>", e))?
        .clone();

    let require = |name: &str| {
        header_index(&headers, name).ok_or_else(|| GridError::MissingColumn {
            column: name.to_string(),
            available: header_names(&headers),
        })
    };
    let ts_idx = require(columns::TIMESTAMP)?;
    let elec_idx = require(columns::ELECTRICITY_TOTAL)?;
    let gas_idx = require(columns::GAS_HEATING)?;

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let record = result.map_err(|e| GridError::csv("<timeseries>", e))?;

        let raw_ts = record.get(ts_idx).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| GridError::InvalidTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;

        out.push(IntervalRecord {
            timestamp,
            electricity_kwh: parse_energy(&record, elec_idx, line, columns::ELECTRICITY_TOTAL)?,
            gas_heating_kwh: parse_energy(&record, gas_idx, line, columns::GAS_HEATING)?,
        });
    }

    out.sort_by_key(|r| r.timestamp);
    Ok(out)
}

pub(crate) fn parse_energy(
    record: &csv::StringRecord,
    idx: usize,
    line: usize,
    column: &str,
) -> Result<f64> {
    let value = record.get(idx).unwrap_or("");
    if value.is_empty() {
        return Ok(0.0);
    }
    value.parse::<f64>().map_err(|_| GridError::InvalidNumber {
        line,
        column: column.to_string(),
        value: value.to_string(),
    })
}
