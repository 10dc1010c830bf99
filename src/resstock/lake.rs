//! Local mirror of the ResStock per-building timeseries tree.
//!
//! Releases disagree on partition order: some use
//! `state=<S>/upgrade=<U>`, others `upgrade=<U>/state=<S>`. Both are tried.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{GridError, Result};

/// Entries shown when a lookup fails.
const LISTING_LIMIT: usize = 5;

/// Locates the timeseries directory for `state` and `upgrade` under `root`.
///
/// # Errors
///
/// Returns [`GridError::TimeseriesDirNotFound`] with the first few entries
/// of `root` when neither partition order exists.
pub fn resolve_timeseries_dir(root: &Path, state: &str, upgrade: u32) -> Result<PathBuf> {
    let state_first = root
        .join(format!("state={state}"))
        .join(format!("upgrade={upgrade}"));
    let upgrade_first = root
        .join(format!("upgrade={upgrade}"))
        .join(format!("state={state}"));

    for candidate in [state_first, upgrade_first] {
        if candidate.is_dir() {
            info!(path = %candidate.display(), "resolved timeseries folder");
            return Ok(candidate);
        }
    }

    Err(GridError::TimeseriesDirNotFound {
        root: root.to_path_buf(),
        state: state.to_string(),
        listing: list_entries(root),
    })
}

/// Finds the CSV timeseries file for `bldg_id` in `dir`.
///
/// Files are named like `<bldg_id>-<upgrade>.csv`. An exact id before the
/// first `-` wins; otherwise the first file (sorted) containing the id.
///
/// # Errors
///
/// Returns [`GridError::BuildingFileNotFound`] when nothing matches.
pub fn find_building_file(dir: &Path, bldg_id: &str) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| GridError::io(dir, e))?;
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .filter(|p| file_name(p).contains(bldg_id))
        .collect();
    candidates.sort();
    debug!(bldg_id, matches = candidates.len(), "searched for building file");

    let exact = candidates.iter().position(|p| {
        p.file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.split('-').next())
            == Some(bldg_id)
    });

    match exact {
        Some(i) => Ok(candidates.swap_remove(i)),
        None if !candidates.is_empty() => Ok(candidates.swap_remove(0)),
        None => Err(GridError::BuildingFileNotFound {
            dir: dir.to_path_buf(),
            bldg_id: bldg_id.to_string(),
            listing: list_entries(dir),
        }),
    }
}

fn file_name(p: &Path) -> String {
    p.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn list_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names.truncate(LISTING_LIMIT);
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    #[test]
    fn resolves_state_first_layout() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("state=SC").join("upgrade=0");
        fs::create_dir_all(&dir).unwrap();
        assert_eq!(resolve_timeseries_dir(root.path(), "SC", 0).unwrap(), dir);
    }

    #[test]
    fn resolves_upgrade_first_layout() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("upgrade=0").join("state=SC");
        fs::create_dir_all(&dir).unwrap();
        assert_eq!(resolve_timeseries_dir(root.path(), "SC", 0).unwrap(), dir);
    }

    #[test]
    fn missing_layout_lists_root() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("state=GA")).unwrap();
        let err = resolve_timeseries_dir(root.path(), "SC", 0).unwrap_err();
        match err {
            GridError::TimeseriesDirNotFound { listing, .. } => {
                assert_eq!(listing, vec!["state=GA".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn prefers_exact_building_id() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("1120-0.csv"));
        touch(&dir.path().join("112-0.csv"));
        touch(&dir.path().join("112-0.parquet"));
        let found = find_building_file(dir.path(), "112").unwrap();
        assert_eq!(found.file_name().unwrap(), "112-0.csv");
    }

    #[test]
    fn falls_back_to_substring_match() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("bldg0000112.csv"));
        let found = find_building_file(dir.path(), "112").unwrap();
        assert_eq!(found.file_name().unwrap(), "bldg0000112.csv");
    }

    #[test]
    fn missing_file_lists_directory() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..7 {
            touch(&dir.path().join(format!("{i}-0.csv")));
        }
        let err = find_building_file(dir.path(), "999").unwrap_err();
        match err {
            GridError::BuildingFileNotFound { listing, .. } => assert_eq!(listing.len(), 5),
            other => panic!("unexpected error: {other}"),
        }
    }
}
