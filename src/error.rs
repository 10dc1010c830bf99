//! Error types shared by ingest, analysis, and feeder studies.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Failures raised while loading ResStock data or running a study.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("cannot access \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error in \"{}\": {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("column `{column}` not found; available: {}", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("could not recover `bldg_id`; available: {}", available.join(", "))]
    MissingBuildingId { available: Vec<String> },

    #[error("line {line}: invalid timestamp \"{value}\"")]
    InvalidTimestamp { line: usize, value: String },

    #[error("line {line}: column `{column}` has non-numeric value \"{value}\"")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("no homes heated by \"{fuel}\" above {min_sqft} sqft; try lowering the floor-area filter")]
    NoTargets { fuel: String, min_sqft: f64 },

    #[error("no timeseries folder for state {state} under \"{}\"; found: {}", root.display(), listing.join(", "))]
    TimeseriesDirNotFound {
        root: PathBuf,
        state: String,
        listing: Vec<String>,
    },

    #[error("no timeseries file for building {bldg_id} in \"{}\"; found: {}", dir.display(), listing.join(", "))]
    BuildingFileNotFound {
        dir: PathBuf,
        bldg_id: String,
        listing: Vec<String>,
    },

    #[error("unknown county \"{0}\"")]
    UnknownCounty(String),

    #[error("adoption rate {0}% is outside 0-100")]
    InvalidAdoption(u32),

    #[error("heat pump COP must be a positive number, got {0}")]
    InvalidCop(f64),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("API server on {addr}: {source}")]
    Server {
        addr: String,
        #[source]
        source: io::Error,
    },
}

impl GridError {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps a CSV error with the path it concerns.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
