//! Command-line parsing for the `grid-stress` binary.

use std::env;
#[cfg(feature = "api")]
use std::net::SocketAddr;
use std::path::PathBuf;

/// Preset used when neither `--config` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "cold_snap";

#[cfg(feature = "api")]
const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// The subcommand to run.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Normalize a raw metadata export.
    Ingest {
        raw: PathBuf,
        state: Option<String>,
        out: Option<PathBuf>,
    },
    /// Electrify the target home and write the archetype profile.
    AnalyzeHome { window_out: Option<PathBuf> },
    /// Scale the archetype across a county feeder.
    Simulate {
        county: Option<String>,
        adoption: Option<u32>,
        curve_out: Option<PathBuf>,
    },
    /// Serve the API.
    #[cfg(feature = "api")]
    Serve { bind: SocketAddr },
    Help,
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub command: Command,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

/// Parses arguments (without the program name).
///
/// Global options may appear before or after the subcommand.
pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut config = None;
    let mut preset = None;
    let mut name: Option<String> = None;
    let mut rest: Vec<String> = Vec::new();

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let p = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(p.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                return Ok(CliOptions {
                    config,
                    preset,
                    command: Command::Help,
                });
            }
            other if name.is_none() && !other.starts_with('-') => {
                name = Some(other.to_string());
            }
            other => {
                if name.is_none() {
                    return Err(format!("unknown argument: {other}"));
                }
                rest.push(other.to_string());
                // Every command flag takes exactly one value.
                if let Some(v) = args.get(i + 1) {
                    i += 1;
                    rest.push(v.clone());
                }
            }
        }
        i += 1;
    }

    if config.is_some() && preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if config.is_none() && preset.is_none() {
        preset = Some(DEFAULT_PRESET.to_string());
    }

    let name = name.ok_or_else(|| "missing command".to_string())?;
    let command = parse_command(&name, &rest)?;

    Ok(CliOptions {
        config,
        preset,
        command,
    })
}

fn parse_command(name: &str, args: &[String]) -> Result<Command, String> {
    let pairs = flag_pairs(args)?;
    let take = |flag: &str| -> Result<Option<String>, String> {
        let mut found = None;
        for (f, v) in pairs.iter().filter(|(f, _)| f == flag) {
            if found.replace(v.clone()).is_some() {
                return Err(format!("{f} provided more than once"));
            }
        }
        Ok(found)
    };

    let command = match name {
        "ingest" => {
            let raw = take("--raw")?
                .ok_or_else(|| "ingest requires --raw <path>".to_string())?;
            Command::Ingest {
                raw: PathBuf::from(raw),
                state: take("--state")?,
                out: take("--out")?.map(PathBuf::from),
            }
        }
        "analyze-home" => Command::AnalyzeHome {
            window_out: take("--window-out")?.map(PathBuf::from),
        },
        "simulate" => {
            let adoption = take("--adoption")?
                .map(|v| {
                    v.parse::<u32>()
                        .map_err(|_| format!("--adoption value \"{v}\" is not a whole percent"))
                })
                .transpose()?;
            if let Some(pct) = adoption {
                if pct > 100 {
                    return Err(format!("--adoption must be within 0..=100, got {pct}"));
                }
            }
            Command::Simulate {
                county: take("--county")?,
                adoption,
                curve_out: take("--curve-out")?.map(PathBuf::from),
            }
        }
        #[cfg(feature = "api")]
        "serve" => {
            let bind = take("--bind")?.unwrap_or_else(|| DEFAULT_BIND.to_string());
            let bind = bind
                .parse::<SocketAddr>()
                .map_err(|_| format!("--bind value \"{bind}\" is not a socket address"))?;
            Command::Serve { bind }
        }
        other => return Err(format!("unknown command: {other}")),
    };

    let allowed = allowed_flags(name);
    if let Some((flag, _)) = pairs.iter().find(|(f, _)| !allowed.contains(&f.as_str())) {
        return Err(format!("unknown argument for {name}: {flag}"));
    }
    Ok(command)
}

fn allowed_flags(name: &str) -> &'static [&'static str] {
    match name {
        "ingest" => &["--raw", "--state", "--out"],
        "analyze-home" => &["--window-out"],
        "simulate" => &["--county", "--adoption", "--curve-out"],
        "serve" => &["--bind"],
        _ => &[],
    }
}

fn flag_pairs(args: &[String]) -> Result<Vec<(String, String)>, String> {
    let mut pairs = Vec::new();
    let mut i = 0usize;
    while i < args.len() {
        let flag = &args[i];
        if !flag.starts_with("--") {
            return Err(format!("unexpected argument: {flag}"));
        }
        i += 1;
        let value = args.next_or_err(i, &format!("missing value for {flag}"))?;
        pairs.push((flag.clone(), value.to_string()));
        i += 1;
    }
    Ok(pairs)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("grid-stress: heat-pump electrification grid stress simulator");
    eprintln!();
    eprintln!("Usage: grid-stress [--config <path> | --preset <name>] <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  ingest --raw <path> [--state <S>] [--out <path>]");
    eprintln!("  analyze-home [--window-out <path>]");
    eprintln!("  simulate [--county <name>] [--adoption <0-100>] [--curve-out <path>]");
    #[cfg(feature = "api")]
    eprintln!("  serve [--bind <addr>]          (default {DEFAULT_BIND})");
    eprintln!();
    eprintln!("If no --config or --preset is given, the {DEFAULT_PRESET} preset is used.");
}
