//! Configuration management for featurectl
//!
//! Settings are loaded from environment variables with defaults matching the
//! fixed locations other device processes read from. Command-line options
//! override them (see [`crate::cli`]).
//!
//! # Environment Variables
//!
//! - `FEATURECTL_CONFIG_OUTPUT`: config-data output file - default: `/tmp/rfc_configdata.txt`
//! - `FEATURECTL_WHITELIST_OUTPUT`: SSH allow-list file - default: `/tmp/RFC/.RFC_SSHWhiteList.list`
//! - `FEATURECTL_TELEMETRY_CMD`: program invoked as `<cmd> <marker> <value>` on parse failure - default: unset
//! - `FEATURECTL_LOG_LEVEL`: logging level - default: "info"
//!
//! # Example
//!
//! ```no_run
//! use featurectl::ExtractorConfig;
//!
//! let config = ExtractorConfig::default();
//! config.validate().expect("Invalid configuration");
//! println!("{}", config);
//! ```

use crate::telemetry::{CommandSink, LoggingSink, TelemetrySink};
use crate::util::logging;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::Level;

/// Default values for configuration
pub const DEFAULT_CONFIG_OUTPUT: &str = "/tmp/rfc_configdata.txt";
pub const DEFAULT_WHITELIST_OUTPUT: &str = "/tmp/RFC/.RFC_SSHWhiteList.list";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Settings for one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// File receiving `tr181.` parameter lines
    pub config_output: PathBuf,

    /// File receiving the SSH allow-list
    pub whitelist_output: PathBuf,

    /// External telemetry sender, if any
    pub telemetry_command: Option<String>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ExtractorConfig {
    /// Loads FEATURECTL_* environment variables, falling back to the fixed
    /// default paths
    fn default() -> Self {
        let config_output = env::var("FEATURECTL_CONFIG_OUTPUT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_OUTPUT));

        let whitelist_output = env::var("FEATURECTL_WHITELIST_OUTPUT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WHITELIST_OUTPUT));

        let telemetry_command = env::var("FEATURECTL_TELEMETRY_CMD")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let log_level = env::var("FEATURECTL_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            config_output,
            whitelist_output,
            telemetry_command,
            log_level,
        }
    }
}

impl ExtractorConfig {
    /// Built-in defaults, ignoring the environment
    pub fn defaults() -> Self {
        Self {
            config_output: PathBuf::from(DEFAULT_CONFIG_OUTPUT),
            whitelist_output: PathBuf::from(DEFAULT_WHITELIST_OUTPUT),
            telemetry_command: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    pub fn with_config_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_output = path.into();
        self
    }

    pub fn with_whitelist_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.whitelist_output = path.into();
        self
    }

    pub fn with_telemetry_command(mut self, command: impl Into<String>) -> Self {
        self.telemetry_command = Some(command.into());
        self
    }

    /// Validates the configuration
    ///
    /// Both output paths must be set and must differ. The log level is not
    /// checked; see [`ExtractorConfig::level`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.config_output.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Config output path must not be empty".to_string(),
            ));
        }
        if self.whitelist_output.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Whitelist output path must not be empty".to_string(),
            ));
        }
        if self.config_output == self.whitelist_output {
            return Err(ConfigError::ValidationFailed(format!(
                "Config output and whitelist output must differ (both are {})",
                self.config_output.display()
            )));
        }

        Ok(())
    }

    /// Tracing level for `log_level`. Unknown names fall back to INFO.
    pub fn level(&self) -> Level {
        logging::parse_level(&self.log_level)
    }

    /// Builds the telemetry sink for this configuration: the external sender
    /// when one is configured, log output otherwise.
    pub fn telemetry_sink(&self) -> Arc<dyn TelemetrySink> {
        match &self.telemetry_command {
            Some(command) => Arc::new(CommandSink::new(command)),
            None => Arc::new(LoggingSink),
        }
    }
}

impl fmt::Display for ExtractorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "featurectl Configuration:")?;
        writeln!(f, "  Config Output: {}", self.config_output.display())?;
        writeln!(f, "  Whitelist Output: {}", self.whitelist_output.display())?;
        writeln!(
            f,
            "  Telemetry Command: {}",
            self.telemetry_command.as_deref().unwrap_or("(none)")
        )?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
