//! featurectl - extracts RFC feature-control settings into flat files
//!
//! A device receives its remote feature-control configuration as a JSON
//! response. This crate reads that response once and writes the parts other
//! processes consume as plain text:
//!
//! - every `tr181.*` parameter from each feature's `configData`, one
//!   `key#~value#~flag` line each, where `flag` is the feature's
//!   `effectiveImmediate` as `0`/`1`
//! - the host list of an `SSHWhitelist` feature, one entry per line
//!
//! # Example
//!
//! ```no_run
//! use featurectl::{ExtractorConfig, FeatureControlExtractor};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractorConfig::defaults()
//!     .with_config_output("/tmp/out/configdata.txt")
//!     .with_whitelist_output("/tmp/out/ssh.list");
//! let extractor = FeatureControlExtractor::new(config);
//!
//! let report = extractor.run(Path::new("/tmp/rfc_response.json"))?;
//! println!("{} tr181 parameters", report.config_lines_written);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`json`]: positional lookups over parsed JSON
//! - [`document`]: typed, read-only views of the response
//! - [`extract`]: the extraction run and its two output writers
//! - [`telemetry`]: notification port for parse failures
//! - [`config`]: output paths and runtime settings

pub mod cli;
pub mod config;
pub mod document;
pub mod extract;
pub mod json;
pub mod telemetry;
pub mod util;

pub use config::{ConfigError, ExtractorConfig};
pub use document::{FeatureControlDocument, FeatureEntry};
pub use extract::{ExtractError, ExtractionReport, FeatureControlExtractor};
pub use telemetry::{TelemetryEvent, TelemetrySink};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
