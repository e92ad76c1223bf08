use crate::config::ExtractorConfig;
use clap::Parser;
use std::path::PathBuf;

/// Extracts RFC feature-control settings into flat key-value files
#[derive(Parser, Debug)]
#[command(
    name = "featurectl",
    about = "Extracts RFC feature-control settings into flat key-value files",
    version,
    long_about = "featurectl reads a feature-control JSON response and writes every \
                  tr181.* parameter to the config-data file as key#~value#~flag lines. \
                  An SSHWhitelist feature additionally has its host list written to the \
                  SSH allow-list file.\n\n\
                  Examples:\n  \
                  featurectl /tmp/rfc_response.json\n  \
                  featurectl --config-output ./out.txt response.json"
)]
pub struct CliArgs {
    #[arg(value_name = "INPUT", help = "Path to the feature-control JSON response")]
    pub input: PathBuf,

    #[arg(
        long,
        value_name = "FILE",
        help = "Config-data output file [env: FEATURECTL_CONFIG_OUTPUT]"
    )]
    pub config_output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "SSH allow-list output file [env: FEATURECTL_WHITELIST_OUTPUT]"
    )]
    pub whitelist_output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PROGRAM",
        help = "Telemetry sender invoked on parse failure [env: FEATURECTL_TELEMETRY_CMD]"
    )]
    pub telemetry_cmd: Option<String>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Applies command-line overrides on top of `base`
    pub fn apply_to(&self, mut base: ExtractorConfig) -> ExtractorConfig {
        if let Some(path) = &self.config_output {
            base.config_output = path.clone();
        }
        if let Some(path) = &self.whitelist_output {
            base.whitelist_output = path.clone();
        }
        if let Some(cmd) = &self.telemetry_cmd {
            base.telemetry_command = Some(cmd.clone());
        }
        if let Some(level) = &self.log_level {
            base.log_level = level.to_lowercase();
        } else if self.verbose {
            base.log_level = "debug".to_string();
        } else if self.quiet {
            base.log_level = "error".to_string();
        }
        base
    }
}
