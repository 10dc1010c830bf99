//! Normalizes a raw ResStock metadata export into the clean metadata CSV.
//!
//! Raw exports differ between releases: the building id may live in the
//! index (exported as `index` or as an unnamed first column) and some
//! columns were renamed. Ingest recovers the id, keeps one state, and
//! writes a fixed column selection.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::columns;
use super::{header_index, header_names};
use crate::error::{GridError, Result};

/// Columns kept in the clean metadata, with the older-release alias for each.
const KEEP: &[(&str, Option<&str>)] = &[
    (columns::BLDG_ID, None),
    (columns::CITY, None),
    (columns::COUNTY, None),
    (columns::SQFT, Some(columns::FLOOR_AREA)),
    (columns::VINTAGE, None),
    (columns::HEATING_FUEL, Some(columns::HVAC_HEATING_TYPE)),
    (columns::COOLING_TYPE, None),
    (columns::INCOME, None),
    (columns::USAGE_LEVEL, None),
];

/// Outcome of an ingest run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestSummary {
    /// Data rows read from the raw export.
    pub rows_read: usize,
    /// Rows written after the state filter.
    pub rows_written: usize,
    /// Output header, in order.
    pub columns: Vec<String>,
}

/// Reads `raw`, keeps homes in `state`, and writes the clean CSV to `out`.
///
/// The table is staged in a temporary file next to `out` and moved into
/// place only once the whole export has been read, so a failed run leaves
/// any previous output untouched.
///
/// # Errors
///
/// Returns an error on I/O failure or when no building id column can be
/// recovered.
pub fn ingest_metadata(raw: &Path, state: &str, out: &Path) -> Result<IngestSummary> {
    let input = File::open(raw).map_err(|e| GridError::io(raw, e))?;

    let dir = match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let staged = NamedTempFile::new_in(dir).map_err(|e| GridError::io(dir, e))?;
    let mut buf = io::BufWriter::new(staged);
    let summary = normalize(input, state, &mut buf).map_err(|e| match e {
        GridError::Csv { source, .. } => GridError::csv(raw, source),
        other => other,
    })?;
    let staged = buf
        .into_inner()
        .map_err(|e| GridError::io(out, e.into_error()))?;

    let replaced = out.exists();
    staged.persist(out).map_err(|e| GridError::io(out, e.error))?;
    if replaced {
        info!(path = %out.display(), "replaced previous metadata output");
    }

    info!(
        state,
        rows_read = summary.rows_read,
        rows_written = summary.rows_written,
        path = %out.display(),
        "metadata saved"
    );
    Ok(summary)
}

/// Normalizes a raw export from `reader` into `writer`.
///
/// # Errors
///
/// Returns [`GridError::MissingBuildingId`] when neither `bldg_id`,
/// `index`, nor an unnamed first column exists.
pub fn normalize(reader: impl Read, state: &str, writer: impl Write) -> Result<IngestSummary> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| GridError::csv("<raw metadata>", e))?
        .clone();

    let id_idx = recover_bldg_id(&headers)?;

    // (output name, source index)
    let mut selected: Vec<(String, usize)> = Vec::with_capacity(KEEP.len());
    for &(name, alias) in KEEP {
        if name == columns::BLDG_ID {
            selected.push((name.to_string(), id_idx));
        } else if let Some(i) = header_index(&headers, name) {
            selected.push((name.to_string(), i));
        } else if let Some(i) = alias.and_then(|a| header_index(&headers, a)) {
            selected.push((headers[i].to_string(), i));
        }
    }

    let state_idx = header_index(&headers, columns::STATE);
    if state_idx.is_none() {
        warn!("raw metadata has no `in.state` column; keeping every row");
    }

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    let out_columns: Vec<String> = selected.iter().map(|(n, _)| n.clone()).collect();
    wtr.write_record(&out_columns)
        .map_err(|e| GridError::csv("<metadata output>", e))?;

    let mut rows_read = 0;
    let mut rows_written = 0;
    for result in rdr.records() {
        let record = result.map_err(|e| GridError::csv("<raw metadata>", e))?;
        rows_read += 1;

        if let Some(si) = state_idx {
            let row_state = record.get(si).unwrap_or("");
            if !row_state.eq_ignore_ascii_case(state) {
                continue;
            }
        }

        wtr.write_record(selected.iter().map(|&(_, i)| record.get(i).unwrap_or("")))
            .map_err(|e| GridError::csv("<metadata output>", e))?;
        rows_written += 1;
    }
    wtr.flush()
        .map_err(|e| GridError::io("<metadata output>", e))?;

    Ok(IngestSummary {
        rows_read,
        rows_written,
        columns: out_columns,
    })
}

/// Finds the column holding building ids.
fn recover_bldg_id(headers: &csv::StringRecord) -> Result<usize> {
    if let Some(i) = header_index(headers, columns::BLDG_ID) {
        return Ok(i);
    }
    if let Some(i) = header_index(headers, "index") {
        info!("renaming `index` column to `bldg_id`");
        return Ok(i);
    }
    if headers.get(0).is_some_and(str::is_empty) {
        info!("using unnamed first column as `bldg_id`");
        return Ok(0);
    }
    Err(GridError::MissingBuildingId {
        available: header_names(headers),
    })
}
