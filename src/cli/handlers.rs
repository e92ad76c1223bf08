//! Command handlers returning process exit codes

use super::commands::CliArgs;
use crate::config::ExtractorConfig;
use crate::extract::{ExtractError, ExtractionReport, FeatureControlExtractor};
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use tracing::{debug, error, info};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
/// Bad invocations exit with 0; existing callers rely on it
pub const EXIT_USAGE: i32 = 0;

/// Message printed to stdout after an argument error
pub const USAGE_HINT: &str = "featurectl: Pass valid arguments";

/// Reports an argument parsing failure and returns the exit code.
///
/// `--help` and `--version` are printed as usual. Every other error prints
/// clap's message on stderr and the usage hint on stdout.
pub fn handle_usage_error(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            EXIT_SUCCESS
        }
        _ => {
            eprint!("{}", err.render());
            println!("{}", USAGE_HINT);
            EXIT_USAGE
        }
    }
}

/// Runs one extraction with `config`, the settings already resolved from the
/// environment and `args`, and maps the outcome to an exit code
pub fn handle_extract(args: &CliArgs, config: ExtractorConfig) -> i32 {
    match run_extract(args, config) {
        Ok(report) => {
            info!(
                features = report.features_seen,
                config_lines = report.config_lines_written,
                whitelists = report.whitelists_written,
                "Extraction complete"
            );
            if let Ok(json) = serde_json::to_string(&report) {
                debug!(report = %json, "Extraction report");
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<ExtractError>() {
                Some(extract_err) => error!("{}", extract_err.help_message()),
                None => error!("{:#}", e),
            }
            EXIT_FAILURE
        }
    }
}

fn run_extract(args: &CliArgs, config: ExtractorConfig) -> Result<ExtractionReport> {
    config.validate().context("Invalid configuration")?;
    debug!("{}", config);

    let telemetry = config.telemetry_sink();
    let extractor = FeatureControlExtractor::new(config).with_telemetry(telemetry);
    let report = extractor.run(&args.input)?;
    Ok(report)
}
