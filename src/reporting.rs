//! Plain-text rendering of study results for the terminal.

use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::resstock::columns;
use crate::resstock::metadata::HomeRecord;
use crate::sim::electrify::ProfileSummary;
use crate::sim::selection::{TargetBasis, TargetList};

fn or_dash(v: Option<&str>) -> &str {
    v.unwrap_or("-")
}

fn at(t: Option<NaiveDateTime>) -> String {
    t.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

/// Describes the selected single-home target.
pub fn render_target(home: &HomeRecord) -> String {
    let sqft = home
        .sqft
        .map_or_else(|| "-".to_string(), |s| format!("{s:.0}"));
    format!(
        "Target building {}\n   Size: {sqft} sqft\n   Heat: {}\n",
        home.bldg_id,
        or_dash(home.heating_fuel.as_deref())
    )
}

/// Before/after peaks of the single-home profile.
pub fn render_profile_summary(summary: &ProfileSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Single Home Stress Test ---");
    let _ = writeln!(out, "Intervals:             {}", summary.intervals);
    let _ = writeln!(
        out,
        "Baseline peak:         {:.3} kWh/interval at {}",
        summary.baseline_peak_kwh,
        at(summary.baseline_peak_at)
    );
    let _ = writeln!(
        out,
        "Heat pump peak:        {:.3} kWh/interval at {}",
        summary.simulated_peak_kwh,
        at(summary.simulated_peak_at)
    );
    let _ = writeln!(out, "Peak increase:         {:.1}%", summary.peak_increase_pct);
    let _ = write!(out, "Added energy:          {:.2} kWh", summary.added_energy_kwh);
    out
}

/// The high-priority intervention list as a fixed-width table.
pub fn render_target_list(list: &TargetList) -> String {
    let mut out = String::new();
    let note = match list.basis {
        TargetBasis::HighIncome => format!(
            "Identified {} high-income gas-heated households for targeting.",
            list.matched
        ),
        TargetBasis::NoHighIncomeFallback => {
            "No high-income households found; showing all eligible gas homes.".to_string()
        }
        TargetBasis::IncomeUnavailable => {
            "Income data not available; showing all eligible gas homes.".to_string()
        }
    };
    let _ = writeln!(out, "--- High-Priority Intervention List ---");
    let _ = writeln!(out, "{note}");
    let _ = writeln!(
        out,
        "{:<10} {:<20} {:>7} {:<10} {:<18} {}",
        columns::BLDG_ID,
        columns::CITY,
        columns::SQFT,
        columns::VINTAGE,
        columns::INCOME,
        "heating"
    );
    for h in &list.homes {
        let sqft = h.sqft.map_or_else(|| "-".to_string(), |s| format!("{s:.0}"));
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:>7} {:<10} {:<18} {}",
            h.bldg_id,
            or_dash(h.city.as_deref()),
            sqft,
            or_dash(h.vintage.as_deref()),
            or_dash(h.income.as_deref()),
            or_dash(h.heating_fuel.as_deref()),
        );
    }
    if list.matched > list.homes.len() {
        let _ = writeln!(out, "... {} more", list.matched - list.homes.len());
    }
    out
}
