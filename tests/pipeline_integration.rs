mod common;

use common::{BASE_KWH, Fixture, TARGET_BLDG};
use grid_stress_sim::error::GridError;
use grid_stress_sim::resstock::metadata::load_metadata;
use grid_stress_sim::runner::{StudyInputs, analyze_home, run_feeder, run_ingest};
use grid_stress_sim::sim::selection::TargetBasis;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn ingest_analyze_and_simulate_end_to_end() {
    let fx = Fixture::new();
    let cfg = &fx.config;

    let summary = run_ingest(cfg, &fx.raw_metadata, None, None).expect("ingest should succeed");
    assert_eq!(summary.rows_read, 5);
    assert_eq!(summary.rows_written, 4, "the GA row is filtered out");
    assert_eq!(summary.columns.first().map(String::as_str), Some("bldg_id"));

    let table = load_metadata(&cfg.data.metadata_csv).expect("clean metadata should load");
    assert_eq!(table.sqft_column.as_deref(), Some("in.geometry_floor_area"));
    assert_eq!(table.counties(), vec!["Aiken".to_string(), "Richland".to_string()]);

    let analysis = analyze_home(cfg).expect("analysis should succeed");
    assert_eq!(analysis.target.bldg_id, TARGET_BLDG);
    assert_eq!(
        analysis.source.file_name().and_then(|n| n.to_str()),
        Some("102-0.csv")
    );
    assert_eq!(analysis.profile.len(), 4 * 96);
    assert_eq!(analysis.window.len(), 2 * 96);
    assert!(cfg.data.archetype_csv.exists());

    // COP 3: the 3.0 kWh gas spike adds 1.0 kWh on top of 0.5 kWh.
    let s = &analysis.summary;
    assert!(approx(s.baseline_peak_kwh, BASE_KWH));
    assert!(approx(s.simulated_peak_kwh, 1.5));
    assert!((s.peak_increase_pct - 200.0).abs() < 1e-6);
    // Per day: 12 spike intervals at 1.0 kWh plus 84 at 0.2 kWh.
    assert!((s.added_energy_kwh - 2.0 * 28.8).abs() < 1e-6);

    let inputs = StudyInputs::load(cfg).expect("study inputs should load");
    assert_eq!(inputs.profile.len(), 3 * 96);
    assert_eq!(inputs.default_county().as_deref(), Some("Aiken"));

    let (study, targets) =
        run_feeder(cfg, &inputs, "Richland", None).expect("feeder study should succeed");
    assert_eq!(study.adoption_pct, 50);
    assert_eq!(study.report.eligible_homes, 2);
    assert_eq!(study.report.projected_installs, 1);
    // 2 homes x 0.5 kWh per 15 min = 4 kW; one install adds 4 kW more.
    assert!(approx(study.report.old_peak_mw, 0.004));
    assert!(approx(study.report.new_peak_mw, 0.008));
    assert!((study.report.peak_increase_pct - 100.0).abs() < 1e-6);
    assert_eq!(study.curve.len(), inputs.profile.len());

    assert_eq!(targets.basis, TargetBasis::HighIncome);
    assert_eq!(targets.matched, 1);
    assert_eq!(targets.homes[0].bldg_id, "101");
}

#[test]
fn adoption_floor_leaves_small_county_unchanged() {
    let fx = Fixture::new();
    let cfg = &fx.config;
    run_ingest(cfg, &fx.raw_metadata, None, None).expect("ingest should succeed");
    analyze_home(cfg).expect("analysis should succeed");
    let inputs = StudyInputs::load(cfg).expect("study inputs should load");

    let (study, targets) =
        run_feeder(cfg, &inputs, "Aiken", None).expect("feeder study should succeed");
    assert_eq!(study.report.eligible_homes, 1);
    assert_eq!(study.report.projected_installs, 0, "floor(1 * 50 / 100)");
    assert!(approx(study.report.new_peak_mw, study.report.old_peak_mw));
    assert_eq!(targets.homes.len(), 1);

    let (full, _) = run_feeder(cfg, &inputs, "Aiken", Some(100)).expect("100% is allowed");
    assert_eq!(full.report.projected_installs, 1);
}

#[test]
fn feeder_rejects_unknown_county_and_bad_adoption() {
    let fx = Fixture::new();
    let cfg = &fx.config;
    run_ingest(cfg, &fx.raw_metadata, None, None).expect("ingest should succeed");
    analyze_home(cfg).expect("analysis should succeed");
    let inputs = StudyInputs::load(cfg).expect("study inputs should load");

    let err = run_feeder(cfg, &inputs, "Fulton", None).unwrap_err();
    assert!(matches!(err, GridError::UnknownCounty(ref c) if c == "Fulton"));

    let err = run_feeder(cfg, &inputs, "Richland", Some(101)).unwrap_err();
    assert!(matches!(err, GridError::InvalidAdoption(101)));
}

#[test]
fn analysis_without_lake_lists_what_exists() {
    let fx = Fixture::new();
    let mut cfg = fx.config.clone();
    run_ingest(&cfg, &fx.raw_metadata, None, None).expect("ingest should succeed");
    cfg.data.state = "NC".to_string();

    let err = analyze_home(&cfg).unwrap_err();
    match err {
        GridError::TimeseriesDirNotFound { state, listing, .. } => {
            assert_eq!(state, "NC");
            assert!(listing.iter().any(|e| e == "state=SC"), "{listing:?}");
        }
        other => panic!("unexpected error: {other}"),
    }
}
