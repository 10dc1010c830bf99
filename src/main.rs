//! Grid stress entry point: CLI wiring and config-driven pipelines.

use std::path::Path;
use std::process;

use grid_stress_sim::cli::{self, CliOptions, Command};
use grid_stress_sim::config::ScenarioConfig;
use grid_stress_sim::error::{GridError, Result};
use grid_stress_sim::io::export::{export_archetype, export_curve};
use grid_stress_sim::plot::render_load_chart;
use grid_stress_sim::reporting::{render_profile_summary, render_target, render_target_list};
use grid_stress_sim::runner::{self, StudyInputs};
use grid_stress_sim::telemetry::init_tracing;
use tracing::{error, info};

const CHART_WIDTH: usize = 72;
const CHART_HEIGHT: usize = 16;

fn load_config(opts: &CliOptions) -> Result<ScenarioConfig> {
    // --config takes priority; the parser always fills a preset otherwise
    let cfg = if let Some(ref path) = opts.config {
        ScenarioConfig::from_toml_file(path)?
    } else {
        ScenarioConfig::from_preset(opts.preset.as_deref().unwrap_or(cli::DEFAULT_PRESET))?
    };
    Ok(cfg)
}

fn analyze_home(cfg: &ScenarioConfig, window_out: Option<&Path>) -> Result<()> {
    let analysis = runner::analyze_home(cfg)?;
    print!("{}", render_target(&analysis.target));
    println!("{}", render_profile_summary(&analysis.summary));
    println!();

    let baseline: Vec<f64> = analysis.window.points.iter().map(|p| p.electricity_kwh).collect();
    let simulated: Vec<f64> = analysis.window.points.iter().map(|p| p.total_after_kwh).collect();
    print!(
        "{}",
        render_load_chart(&baseline, &simulated, "kWh/interval", CHART_WIDTH, CHART_HEIGHT)
    );

    if let Some(path) = window_out {
        export_archetype(&analysis.window, path)?;
        info!(path = %path.display(), "zoom window written");
    }
    Ok(())
}

fn simulate(
    cfg: &ScenarioConfig,
    county: Option<&str>,
    adoption: Option<u32>,
    curve_out: Option<&Path>,
) -> Result<()> {
    let inputs = StudyInputs::load(cfg)?;
    let county = match county {
        Some(c) => c.to_string(),
        None => inputs
            .default_county()
            .ok_or_else(|| GridError::UnknownCounty("(metadata lists no counties)".to_string()))?,
    };

    let (study, targets) = runner::run_feeder(cfg, &inputs, &county, adoption)?;
    println!("--- Feeder Study: {} ({}% adoption) ---", study.county, study.adoption_pct);
    println!("{}", study.report);
    println!();

    let baseline: Vec<f64> = study.curve.iter().map(|c| c.baseline_mw).collect();
    let total: Vec<f64> = study.curve.iter().map(|c| c.total_mw).collect();
    print!(
        "{}",
        render_load_chart(&baseline, &total, "MW", CHART_WIDTH, CHART_HEIGHT)
    );
    println!();
    print!("{}", render_target_list(&targets));

    if let Some(path) = curve_out {
        export_curve(&study.curve, path)?;
        info!(path = %path.display(), "feeder curve written");
    }
    Ok(())
}

#[cfg(feature = "api")]
fn serve(cfg: ScenarioConfig, bind: std::net::SocketAddr) -> Result<()> {
    use std::sync::Arc;

    use grid_stress_sim::api::{AppState, serve};

    let inputs = StudyInputs::load(&cfg)?;
    let state = Arc::new(AppState { config: cfg, inputs });
    let server_err = |source| GridError::Server {
        addr: bind.to_string(),
        source,
    };
    let rt = tokio::runtime::Runtime::new().map_err(server_err)?;
    rt.block_on(serve(state, bind)).map_err(server_err)
}

fn run(opts: CliOptions) -> Result<()> {
    if opts.command == Command::Help {
        cli::print_usage();
        return Ok(());
    }

    let cfg = load_config(&opts)?;
    let mut errors = cfg.validate().into_iter();
    if let Some(first) = errors.next() {
        for e in errors {
            error!("{e}");
        }
        return Err(first.into());
    }

    match opts.command {
        Command::Ingest { raw, state, out } => {
            let summary = runner::run_ingest(&cfg, &raw, state.as_deref(), out.as_deref())?;
            println!(
                "Ingested {} of {} rows ({} columns)",
                summary.rows_written,
                summary.rows_read,
                summary.columns.len()
            );
            Ok(())
        }
        Command::AnalyzeHome { window_out } => analyze_home(&cfg, window_out.as_deref()),
        Command::Simulate {
            county,
            adoption,
            curve_out,
        } => simulate(&cfg, county.as_deref(), adoption, curve_out.as_deref()),
        #[cfg(feature = "api")]
        Command::Serve { bind } => serve(cfg, bind),
        Command::Help => Ok(()),
    }
}

fn main() {
    init_tracing();

    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(opts) {
        error!("{e}");
        process::exit(1);
    }
}
