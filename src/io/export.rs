//! CSV export and re-import of archetype profiles and feeder curves.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{GridError, Result};
use crate::resstock::columns;
use crate::resstock::timeseries::{parse_energy, parse_timestamp};
use crate::resstock::{header_index, header_names};
use crate::sim::electrify::ArchetypeProfile;
use crate::sim::types::{CurvePoint, ProfilePoint};

/// Archetype profile header; the dashboard-era input contract.
const ARCHETYPE_HEADER: &[&str] = &[
    columns::TIMESTAMP,
    columns::ELECTRICITY_TOTAL,
    columns::GAS_HEATING,
    columns::HP_ADDED,
    columns::TOTAL_AFTER,
];

/// Feeder curve header.
const CURVE_HEADER: &str = "timestamp,baseline_mw,added_mw,total_mw,within_capacity";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes an archetype profile to a CSV file at `path`.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_archetype(profile: &ArchetypeProfile, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| GridError::io(path, e))?;
    write_archetype_csv(&profile.points, io::BufWriter::new(file))
        .map_err(|e| GridError::io(path, e))
}

/// Writes archetype points as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_archetype_csv(points: &[ProfilePoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(ARCHETYPE_HEADER)?;
    for p in points {
        wtr.write_record(&[
            p.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.6}", p.electricity_kwh),
            format!("{:.6}", p.gas_heating_kwh),
            format!("{:.6}", p.hp_added_kwh),
            format!("{:.6}", p.total_after_kwh),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Loads an archetype profile written by [`export_archetype`].
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn load_archetype(path: &Path) -> Result<ArchetypeProfile> {
    let file = File::open(path).map_err(|e| GridError::io(path, e))?;
    read_archetype_csv(file).map_err(|e| match e {
        GridError::Csv { source, .. } => GridError::csv(path, source),
        other => other,
    })
}

/// Reads archetype points from any reader, sorted by timestamp.
///
/// # Errors
///
/// Returns an error for missing columns, invalid timestamps, or
/// non-numeric values.
pub fn read_archetype_csv(reader: impl Read) -> Result<ArchetypeProfile> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| GridError::csv("<archetype>", e))?
        .clone();

    let mut idx = [0usize; 5];
    for (slot, name) in idx.iter_mut().zip(ARCHETYPE_HEADER) {
        *slot = header_index(&headers, name).ok_or_else(|| GridError::MissingColumn {
            column: (*name).to_string(),
            available: header_names(&headers),
        })?;
    }

    let mut points = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let record = result.map_err(|e| GridError::csv("<archetype>", e))?;
        let raw_ts = record.get(idx[0]).unwrap_or("");
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| GridError::InvalidTimestamp {
            line,
            value: raw_ts.to_string(),
        })?;
        points.push(ProfilePoint {
            timestamp,
            electricity_kwh: parse_energy(&record, idx[1], line, ARCHETYPE_HEADER[1])?,
            gas_heating_kwh: parse_energy(&record, idx[2], line, ARCHETYPE_HEADER[2])?,
            hp_added_kwh: parse_energy(&record, idx[3], line, ARCHETYPE_HEADER[3])?,
            total_after_kwh: parse_energy(&record, idx[4], line, ARCHETYPE_HEADER[4])?,
        });
    }
    points.sort_by_key(|p| p.timestamp);
    Ok(ArchetypeProfile::new(None, points))
}

/// Writes a feeder curve to a CSV file at `path`.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_curve(curve: &[CurvePoint], path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| GridError::io(path, e))?;
    write_curve_csv(curve, io::BufWriter::new(file)).map_err(|e| GridError::io(path, e))
}

/// Writes a feeder curve as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_curve_csv(curve: &[CurvePoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(CURVE_HEADER.split(','))?;
    for p in curve {
        wtr.write_record(&[
            p.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.6}", p.baseline_mw),
            format!("{:.6}", p.added_mw),
            format!("{:.6}", p.total_mw),
            p.within_capacity.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
