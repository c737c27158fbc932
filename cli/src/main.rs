mod config;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use solar_tabulate_core::{Report, build_table};
use solar_tabulate_parser::{read_report_file, resolve_input};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::{OutputFormat, TabulateConfig};

#[derive(Debug, Parser)]
#[command(name = "tabulate-solar")]
#[command(about = "Tabulate SOLAR polygenic.out results into one wide TSV table")]
struct Cli {
    /// One or more SOLAR polygenic.out files or directories containing
    /// polygenic.out files.
    #[arg(value_name = "PATH", required = true)]
    files: Vec<PathBuf>,
    /// Value used for missing values [default: NA].
    #[arg(long, value_name = "STR")]
    na_value: Option<String>,
    /// Skip failed SOLAR runs.
    #[arg(long)]
    skip_failures: bool,
    /// Output format [default: tsv].
    #[arg(long)]
    format: Option<OutputFormat>,
    /// YAML file with default settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let config = resolve_config(&cli)?;
    let reports = collect_reports(&cli.files, &config)?;
    info!(files = cli.files.len(), reports = reports.len(), "Parsed reports");

    let output = match config.format {
        OutputFormat::Tsv => {
            let table =
                build_table(&reports).map_err(|err| format!("Failed to build table: {err}"))?;
            debug!(columns = table.header.len(), rows = table.rows.len(), "Built table");
            table.to_tsv(&config.na_value)
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&reports)
                .map_err(|err| format!("JSON serialization failed: {err}"))?;
            json.push('\n');
            json
        }
    };

    let mut stdout = BufWriter::new(io::stdout().lock());
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| format!("Failed to write output: {err}"))
}

fn resolve_config(cli: &Cli) -> Result<TabulateConfig, String> {
    let mut config = match &cli.config {
        Some(path) => TabulateConfig::load(path)?,
        None => TabulateConfig::default(),
    };

    if let Some(na_value) = &cli.na_value {
        config.na_value = na_value.clone();
    }
    if cli.skip_failures {
        config.skip_failures = true;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    Ok(config)
}

/// Reads every input in order. The first unskipped failure aborts.
fn collect_reports(files: &[PathBuf], config: &TabulateConfig) -> Result<Vec<Report>, String> {
    let mut reports = Vec::with_capacity(files.len());

    for file in files {
        let path = resolve_input(file);
        match read_report_file(&path) {
            Ok(report) => reports.push(report),
            Err(err) => {
                let action = if err.is_access_error() {
                    "Could not access"
                } else {
                    "Failed to read"
                };
                let message = format!("{action} '{}': {err}", path.display());
                if !config.skips(&err) {
                    return Err(message);
                }
                debug!(path = %path.display(), error = %err, "Skipping report");
                eprintln!("WARNING: {message}");
            }
        }
    }

    Ok(reports)
}
