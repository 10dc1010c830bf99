//! Home selection: single-home targets, addressable market, and the
//! intervention list.

use serde::Serialize;

use crate::error::{GridError, Result};
use crate::resstock::columns;
use crate::resstock::metadata::{HomeRecord, MetadataTable};

/// Picks the first home heated by `fuel` with floor area above `min_sqft`.
///
/// # Errors
///
/// Returns [`GridError::NoTargets`] when no home qualifies.
pub fn select_target<'a>(
    table: &'a MetadataTable,
    fuel: &str,
    min_sqft: f64,
) -> Result<&'a HomeRecord> {
    let fuels = [fuel.to_string()];
    table
        .homes
        .iter()
        .find(|h| h.heated_by_any(&fuels) && h.sqft.is_some_and(|s| s > min_sqft))
        .ok_or_else(|| GridError::NoTargets {
            fuel: fuel.to_string(),
            min_sqft,
        })
}

/// Homes that could switch to a heat pump: heated by any of `fuels`.
///
/// # Errors
///
/// Returns [`GridError::MissingColumn`] when the metadata carries no
/// heating column at all.
pub fn addressable_homes<'a>(
    table: &MetadataTable,
    homes: &[&'a HomeRecord],
    fuels: &[String],
) -> Result<Vec<&'a HomeRecord>> {
    if table.heating_column.is_none() {
        return Err(GridError::MissingColumn {
            column: columns::HEATING_FUEL.to_string(),
            available: table.columns.clone(),
        });
    }
    Ok(homes
        .iter()
        .copied()
        .filter(|h| h.heated_by_any(fuels))
        .collect())
}

/// Why a home appears in the intervention list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetBasis {
    /// Gas-heated and in a high income bin.
    HighIncome,
    /// No high-income homes matched; all gas-heated homes are listed.
    NoHighIncomeFallback,
    /// Metadata lacks income data; all gas-heated homes are listed.
    IncomeUnavailable,
}

/// High-priority homes for program outreach.
#[derive(Debug, Clone, Serialize)]
pub struct TargetList {
    pub basis: TargetBasis,
    /// Homes matching `basis` before truncation.
    pub matched: usize,
    pub homes: Vec<HomeRecord>,
}

/// Builds the intervention list from addressable homes.
///
/// High-income gas homes are the likeliest to adopt without incentives,
/// so they are listed first when income data allows it.
pub fn intervention_list(
    has_income: bool,
    gas_homes: &[&HomeRecord],
    income_patterns: &[String],
    limit: usize,
) -> TargetList {
    let (basis, selected): (TargetBasis, Vec<&HomeRecord>) = if !has_income {
        (TargetBasis::IncomeUnavailable, gas_homes.to_vec())
    } else {
        let high: Vec<&HomeRecord> = gas_homes
            .iter()
            .copied()
            .filter(|h| h.income_matches_any(income_patterns))
            .collect();
        if high.is_empty() {
            (TargetBasis::NoHighIncomeFallback, gas_homes.to_vec())
        } else {
            (TargetBasis::HighIncome, high)
        }
    };

    TargetList {
        basis,
        matched: selected.len(),
        homes: selected.into_iter().take(limit).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resstock::metadata::read_metadata;

    const SAMPLE: &str = "\
bldg_id,in.county,in.sqft,in.heating_fuel,in.income
1,Richland,2400,Natural Gas,100000-119999
2,Richland,2600,Electricity,200000+
3,Richland,2700,Natural Gas,30000-34999
4,Richland,3200,Propane,200000+
5,Aiken,5000,Fuel Oil,200000+
";

    fn fuels() -> Vec<String> {
        vec!["Gas".to_string(), "Propane".to_string()]
    }

    #[test]
    fn target_needs_fuel_and_strictly_larger_area() {
        let table = read_metadata(SAMPLE.as_bytes()).unwrap();
        let target = select_target(&table, "gas", 2400.0).unwrap();
        assert_eq!(target.bldg_id, "3");
    }

    #[test]
    fn no_target_is_an_error() {
        let table = read_metadata(SAMPLE.as_bytes()).unwrap();
        assert!(matches!(
            select_target(&table, "Gas", 10_000.0),
            Err(GridError::NoTargets { .. })
        ));
    }

    #[test]
    fn addressable_includes_gas_and_propane() {
        let table = read_metadata(SAMPLE.as_bytes()).unwrap();
        let county = table.homes_in_county("Richland");
        let gas = addressable_homes(&table, &county, &fuels()).unwrap();
        let ids: Vec<&str> = gas.iter().map(|h| h.bldg_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
    }

    #[test]
    fn addressable_without_heating_column_fails() {
        let table = read_metadata("bldg_id,in.county\n1,Richland\n".as_bytes()).unwrap();
        let county = table.homes_in_county("Richland");
        let err = addressable_homes(&table, &county, &fuels()).unwrap_err();
        match &err {
            GridError::MissingColumn { column, available } => {
                assert_eq!(column, columns::HEATING_FUEL);
                assert_eq!(available, &vec!["bldg_id".to_string(), "in.county".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().ends_with("available: bldg_id, in.county"));
    }

    #[test]
    fn high_income_filter() {
        let table = read_metadata(SAMPLE.as_bytes()).unwrap();
        let county = table.homes_in_county("Richland");
        let gas = addressable_homes(&table, &county, &fuels()).unwrap();
        let list = intervention_list(true, &gas, &["100".into(), "200".into()], 50);
        assert_eq!(list.basis, TargetBasis::HighIncome);
        let ids: Vec<&str> = list.homes.iter().map(|h| h.bldg_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn falls_back_when_no_high_income() {
        let table = read_metadata(SAMPLE.as_bytes()).unwrap();
        let county = table.homes_in_county("Richland");
        let gas = addressable_homes(&table, &county, &fuels()).unwrap();
        let list = intervention_list(true, &gas, &["999".into()], 50);
        assert_eq!(list.basis, TargetBasis::NoHighIncomeFallback);
        assert_eq!(list.matched, 3);
    }

    #[test]
    fn income_unavailable_lists_everything_truncated() {
        let table = read_metadata(SAMPLE.as_bytes()).unwrap();
        let county = table.homes_in_county("Richland");
        let gas = addressable_homes(&table, &county, &fuels()).unwrap();
        let list = intervention_list(false, &gas, &["100".into()], 2);
        assert_eq!(list.basis, TargetBasis::IncomeUnavailable);
        assert_eq!(list.matched, 3);
        assert_eq!(list.homes.len(), 2);
    }
}
