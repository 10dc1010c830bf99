//! Clean ResStock metadata: one row per modeled home.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use super::columns;
use super::{header_index, header_names, resolve_alias};
use crate::error::{GridError, Result};

/// One modeled home from the metadata table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeRecord {
    /// ResStock building id, kept textual for file matching.
    pub bldg_id: String,
    pub city: Option<String>,
    pub county: Option<String>,
    /// Conditioned floor area (sqft).
    pub sqft: Option<f64>,
    pub vintage: Option<String>,
    /// Heating fuel, or heating system type on releases without a fuel column.
    pub heating_fuel: Option<String>,
    pub cooling_type: Option<String>,
    /// Household income bin label.
    pub income: Option<String>,
    pub usage_level: Option<String>,
}

impl HomeRecord {
    /// Creates a record with only an id set.
    pub fn new(bldg_id: impl Into<String>) -> Self {
        Self {
            bldg_id: bldg_id.into(),
            city: None,
            county: None,
            sqft: None,
            vintage: None,
            heating_fuel: None,
            cooling_type: None,
            income: None,
            usage_level: None,
        }
    }

    /// Returns `true` when the heating value contains any of `patterns`,
    /// ignoring case.
    pub fn heated_by_any(&self, patterns: &[String]) -> bool {
        self.heating_fuel
            .as_deref()
            .is_some_and(|fuel| contains_any(fuel, patterns))
    }

    /// Returns `true` when the income bin contains any of `patterns`.
    pub fn income_matches_any(&self, patterns: &[String]) -> bool {
        self.income
            .as_deref()
            .is_some_and(|income| patterns.iter().any(|p| income.contains(p.as_str())))
    }
}

pub(crate) fn contains_any(value: &str, patterns: &[String]) -> bool {
    let value = value.to_lowercase();
    patterns
        .iter()
        .any(|p| value.contains(p.to_lowercase().as_str()))
}

/// A metadata row that could not be used.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based CSV line.
    pub line: usize,
    pub message: String,
}

/// Loaded metadata table plus the column layout it was read with.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    pub homes: Vec<HomeRecord>,
    /// Column the heating values came from, if any.
    pub heating_column: Option<String>,
    /// Column the floor areas came from, if any.
    pub sqft_column: Option<String>,
    /// Whether the source carried an income column.
    pub has_income: bool,
    /// Header of the source CSV, in order.
    pub columns: Vec<String>,
    pub row_errors: Vec<RowError>,
}

impl MetadataTable {
    /// Sorted, de-duplicated, non-empty county names.
    pub fn counties(&self) -> Vec<String> {
        self.homes
            .iter()
            .filter_map(|h| h.county.as_deref())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Homes whose county equals `county` exactly.
    pub fn homes_in_county(&self, county: &str) -> Vec<&HomeRecord> {
        self.homes
            .iter()
            .filter(|h| h.county.as_deref() == Some(county))
            .collect()
    }

    /// Number of loaded homes.
    pub fn len(&self) -> usize {
        self.homes.len()
    }

    /// Returns `true` when no homes were loaded.
    pub fn is_empty(&self) -> bool {
        self.homes.is_empty()
    }
}

/// Loads the clean metadata CSV produced by `ingest`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the header is unreadable,
/// or no `bldg_id` column exists.
pub fn load_metadata(path: &Path) -> Result<MetadataTable> {
    let file = File::open(path).map_err(|e| GridError::io(path, e))?;
    let table = read_metadata(file).map_err(|e| match e {
        GridError::Csv { source, .. } => GridError::csv(path, source),
        other => other,
    })?;
    debug!(
        path = %path.display(),
        homes = table.homes.len(),
        skipped = table.row_errors.len(),
        "loaded metadata"
    );
    Ok(table)
}

/// Reads metadata CSV from any reader.
///
/// # Errors
///
/// Returns an error if the header is unreadable or lacks `bldg_id`.
pub fn read_metadata(reader: impl Read) -> Result<MetadataTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| GridError::csv("<metadata>", e))?
        .clone();

    let id_idx =
        header_index(&headers, columns::BLDG_ID).ok_or_else(|| GridError::MissingColumn {
            column: columns::BLDG_ID.to_string(),
            available: header_names(&headers),
        })?;

    let heating_column = resolve_alias(&headers, columns::HEATING_FUEL, columns::HVAC_HEATING_TYPE);
    let sqft_column = resolve_alias(&headers, columns::SQFT, columns::FLOOR_AREA);

    let idx = |name: Option<&str>| name.and_then(|n| header_index(&headers, n));
    let city = idx(Some(columns::CITY));
    let county = idx(Some(columns::COUNTY));
    let sqft = idx(sqft_column);
    let vintage = idx(Some(columns::VINTAGE));
    let heating = idx(heating_column);
    let cooling = idx(Some(columns::COOLING_TYPE));
    let income = idx(Some(columns::INCOME));
    let usage = idx(Some(columns::USAGE_LEVEL));

    let mut table = MetadataTable {
        heating_column: heating_column.map(str::to_string),
        sqft_column: sqft_column.map(str::to_string),
        has_income: income.is_some(),
        columns: header_names(&headers),
        ..MetadataTable::default()
    };

    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                table.row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let field = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let Some(bldg_id) = field(Some(id_idx)) else {
            table.row_errors.push(RowError {
                line,
                message: "empty bldg_id".to_string(),
            });
            continue;
        };

        table.homes.push(HomeRecord {
            bldg_id,
            city: field(city),
            county: field(county),
            sqft: field(sqft).and_then(|v| v.parse::<f64>().ok()),
            vintage: field(vintage),
            heating_fuel: field(heating),
            cooling_type: field(cooling),
            income: field(income),
            usage_level: field(usage),
        });
    }

    if !table.row_errors.is_empty() {
        warn!(count = table.row_errors.len(), "skipped unusable metadata rows");
    }

    Ok(table)
}
