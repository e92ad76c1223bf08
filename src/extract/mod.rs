//! Feature-control extraction
//!
//! [`FeatureControlExtractor`] turns one feature-control response into the two
//! flat files read by the rest of the device:
//!
//! 1. Reads the whole input file into memory
//! 2. Opens (and truncates) the config-data output
//! 3. Parses the JSON, reporting a telemetry event if that fails
//! 4. Walks `featureControl.features` once, writing `tr181.` parameters to the
//!    config-data output and the SSH allow-list to its own file
//!
//! Missing or mistyped fields never abort a run; that branch is logged and
//! skipped. Only I/O on the input and the config-data output, and a parse
//! failure, are fatal.
//!
//! # Example
//!
//! ```no_run
//! use featurectl::{ExtractorConfig, FeatureControlExtractor};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = FeatureControlExtractor::new(ExtractorConfig::defaults());
//! let report = extractor.run(Path::new("/tmp/rfc_response.json"))?;
//! println!("{} parameters written", report.config_lines_written);
//! # Ok(())
//! # }
//! ```

pub mod config_data;
pub mod whitelist;

pub use config_data::{collect_config_lines, ConfigDataWriter, ConfigLine};
pub use whitelist::{write_whitelist, WhitelistSummary};

use crate::config::ExtractorConfig;
use crate::document::{DiagnosticField, EffectiveImmediate, FeatureControlDocument};
use crate::json::{find_first_array, JsonNode};
use crate::telemetry::{NoOpSink, TelemetryEvent, TelemetrySink};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that can occur while extracting a feature-control response
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input file could not be opened or read
    #[error("Failed to read input {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON
    #[error("JSON parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// An output file could not be created
    #[error("Failed to open output {path}: {source}")]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the config-data output failed
    #[error("Failed to write output {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Some allow-list entries could not be written
    #[error("{failed} whitelist entries could not be written to {path}")]
    IncompleteWhitelist { path: PathBuf, failed: usize },
}

impl ExtractError {
    fn parse(err: &serde_json::Error) -> Self {
        ExtractError::Parse {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }

    /// Returns an operator-facing message with troubleshooting hints
    pub fn help_message(&self) -> String {
        match self {
            ExtractError::ReadInput { path, .. } => format!(
                "{}\n\nHelp: check that {} exists and is readable.",
                self,
                path.display()
            ),
            ExtractError::Parse { .. } => format!(
                "{}\n\nHelp: the response is not valid JSON. It may have been truncated \
                 during download.",
                self
            ),
            ExtractError::OpenOutput { path, .. } | ExtractError::WriteOutput { path, .. } => {
                let parent = path
                    .parent()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                format!(
                    "{}\n\nHelp: check that the directory {} exists and is writable.",
                    self, parent
                )
            }
            ExtractError::IncompleteWhitelist { .. } => self.to_string(),
        }
    }
}

/// Summary of a completed extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// Whether the response contained a `featureControl` object
    pub feature_control_present: bool,
    /// `configset-id`, when present as a string
    pub configset_id: Option<String>,
    /// `configset-label`, when present as a string
    pub configset_label: Option<String>,
    /// Entries found in `featureControl.features`
    pub features_seen: usize,
    /// Lines written to the config-data output
    pub config_lines_written: usize,
    /// Allow-list files written completely
    pub whitelists_written: usize,
    /// Allow-list writes that failed or were incomplete
    pub whitelist_failures: usize,
}

/// One-shot extractor for feature-control responses
pub struct FeatureControlExtractor {
    config: ExtractorConfig,
    telemetry: Arc<dyn TelemetrySink>,
}

impl FeatureControlExtractor {
    /// Creates an extractor that drops telemetry events
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            telemetry: Arc::new(NoOpSink),
        }
    }

    /// Replaces the telemetry sink
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Runs a full extraction of the response stored at `input`.
    ///
    /// The config-data output is truncated before parsing, so a response that
    /// fails to parse leaves it empty. The allow-list file is only touched
    /// when an SSH whitelist feature with a list is found.
    pub fn run(&self, input: &std::path::Path) -> Result<ExtractionReport, ExtractError> {
        info!(input = %input.display(), "Processing feature-control response");

        let data = fs::read(input).map_err(|source| ExtractError::ReadInput {
            path: input.to_path_buf(),
            source,
        })?;
        debug!(bytes = data.len(), "Read response");

        let output_path = &self.config.config_output;
        let file = File::create(output_path).map_err(|source| ExtractError::OpenOutput {
            path: output_path.clone(),
            source,
        })?;
        let mut writer = ConfigDataWriter::new(BufWriter::new(file), output_path.clone());

        let root = match JsonNode::parse(&data) {
            Ok(root) => root,
            Err(e) => {
                let err = ExtractError::parse(&e);
                error!(error = %err, "JSON parse failed");
                self.telemetry.notify(&TelemetryEvent::JsonParseFailed);
                return Err(err);
            }
        };
        drop(data);
        info!("JSON parse success");

        let mut report = self.extract_document(&root, &mut writer)?;
        report.config_lines_written = writer.finish()?;

        info!(
            config_output = %output_path.display(),
            lines = report.config_lines_written,
            "Config data written"
        );
        Ok(report)
    }

    /// Walks a parsed response, appending config lines to `out` and writing
    /// the allow-list file when one is found.
    ///
    /// The tree is only read. Features are handled in document order and
    /// independently of each other.
    pub fn extract_document<W: Write>(
        &self,
        root: &JsonNode,
        out: &mut ConfigDataWriter<W>,
    ) -> Result<ExtractionReport, ExtractError> {
        let mut report = ExtractionReport::default();
        let lines_before = out.lines_written();

        let Some(document) = FeatureControlDocument::from_root(root) else {
            warn!("featureControl object is not present");
            return Ok(report);
        };
        report.feature_control_present = true;

        log_diagnostic("configset-id", document.configset_id());
        log_diagnostic("configset-label", document.configset_label());
        report.configset_id = document.configset_id().as_str().map(str::to_string);
        report.configset_label = document.configset_label().as_str().map(str::to_string);

        let Some(features) = document.features() else {
            warn!("featureControl.features array is not present");
            return Ok(report);
        };
        debug!(count = document.feature_count().unwrap_or(0), "Features array");

        for (index, feature) in features.enumerate() {
            report.features_seen += 1;
            let name = feature.name().unwrap_or("<unnamed>");

            if feature.is_ssh_whitelist() {
                info!(index, feature = name, "SSH whitelist feature found");
                match find_first_array(feature.raw()) {
                    Some(array) => match write_whitelist(array, &self.config.whitelist_output) {
                        Ok(_) => report.whitelists_written += 1,
                        Err(e) => {
                            warn!(index, error = %e, "SSH whitelist not fully written");
                            report.whitelist_failures += 1;
                        }
                    },
                    None => debug!(index, "SSH whitelist feature has no list"),
                }
            }

            if feature.effective_immediate() == EffectiveImmediate::Invalid {
                warn!(index, feature = name, "effectiveImmediate is not a flag, writing 0");
            }
            if feature.has_malformed_config_data() {
                warn!(index, feature = name, "configData is not an object, skipping");
            }

            for line in collect_config_lines(&feature) {
                out.append(&line)?;
            }
        }

        report.config_lines_written = out.lines_written() - lines_before;
        Ok(report)
    }
}

fn log_diagnostic(field: &str, value: DiagnosticField<'_>) {
    match value {
        DiagnosticField::Value(v) => info!(field, value = v, "Diagnostic field"),
        DiagnosticField::Null => info!(field, "Diagnostic field value is null"),
        DiagnosticField::Missing => info!(field, "Diagnostic field not received in response"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingSink {
        count: Arc<AtomicUsize>,
    }

    impl TelemetrySink for CountingSink {
        fn notify(&self, _event: &TelemetryEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn extractor_in(dir: &TempDir) -> FeatureControlExtractor {
        FeatureControlExtractor::new(
            ExtractorConfig::defaults()
                .with_config_output(dir.path().join("configdata.txt"))
                .with_whitelist_output(dir.path().join("whitelist.list")),
        )
    }

    fn extract(extractor: &FeatureControlExtractor, root: &Value) -> (ExtractionReport, String) {
        let root: JsonNode = serde_json::from_value(root.clone()).unwrap();
        let mut writer = ConfigDataWriter::new(Vec::new(), "memory");
        let report = extractor.extract_document(&root, &mut writer).unwrap();
        (report, String::from_utf8(writer.into_inner()).unwrap())
    }

    #[test]
    fn test_missing_feature_control_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let extractor = extractor_in(&dir);

        let (report, output) = extract(&extractor, &json!({"something": "else"}));

        assert!(!report.feature_control_present);
        assert_eq!(output, "");
        assert!(!dir.path().join("whitelist.list").exists());
    }

    #[test]
    fn test_missing_features_array() {
        let dir = TempDir::new().unwrap();
        let extractor = extractor_in(&dir);

        let (report, output) = extract(
            &extractor,
            &json!({"featureControl": {"configset-id": "id-1"}}),
        );

        assert!(report.feature_control_present);
        assert_eq!(report.configset_id.as_deref(), Some("id-1"));
        assert_eq!(report.features_seen, 0);
        assert_eq!(output, "");
    }

    #[test]
    fn test_features_processed_independently() {
        let dir = TempDir::new().unwrap();
        let extractor = extractor_in(&dir);
        let root = json!({"featureControl": {"features": [
            {"name": "A", "effectiveImmediate": true, "configData": {"tr181.A": "1"}},
            {"name": "Broken", "configData": "not-an-object"},
            "not-a-feature",
            {"name": "C", "configData": {"tr181.C": "3", "other": "x"}}
        ]}});

        let (report, output) = extract(&extractor, &root);

        assert_eq!(report.features_seen, 4);
        assert_eq!(report.config_lines_written, 2);
        assert_eq!(output, "tr181.A#~1#~1\ntr181.C#~3#~0\n");
    }

    #[test]
    fn test_ssh_whitelist_without_list_is_skipped() {
        let dir = TempDir::new().unwrap();
        let extractor = extractor_in(&dir);
        let root = json!({"featureControl": {"features": [
            {"name": "sshwhitelist", "listType": "IPv4", "configData": {"tr181.X": "y"}}
        ]}});

        let (report, output) = extract(&extractor, &root);

        assert_eq!(report.whitelists_written, 0);
        assert_eq!(report.whitelist_failures, 0);
        assert!(!dir.path().join("whitelist.list").exists());
        assert_eq!(output, "tr181.X#~y#~0\n");
    }

    #[test]
    fn test_whitelist_failure_does_not_stop_config_lines() {
        let dir = TempDir::new().unwrap();
        let extractor = FeatureControlExtractor::new(
            ExtractorConfig::defaults()
                .with_whitelist_output(dir.path().join("missing").join("whitelist.list")),
        );
        let root = json!({"featureControl": {"features": [
            {"name": "SSHWhitelist", "listType": "IPv4", "hosts": ["a"],
             "configData": {"tr181.After": "still-written"}}
        ]}});

        let (report, output) = extract(&extractor, &root);

        assert_eq!(report.whitelist_failures, 1);
        assert_eq!(output, "tr181.After#~still-written#~0\n");
    }

    #[test]
    fn test_run_parse_failure_notifies_telemetry_once() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("response.json");
        fs::write(&input, r#"{"featureControl": {"features": ["#).unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let extractor = extractor_in(&dir).with_telemetry(Arc::new(CountingSink {
            count: count.clone(),
        }));

        let err = extractor.run(&input).unwrap_err();

        assert!(matches!(err, ExtractError::Parse { .. }));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("configdata.txt")).unwrap(),
            ""
        );
    }

    #[test]
    fn test_run_success_does_not_notify_telemetry() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("response.json");
        fs::write(&input, r#"{"featureControl": {"features": []}}"#).unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let extractor = extractor_in(&dir).with_telemetry(Arc::new(CountingSink {
            count: count.clone(),
        }));

        extractor.run(&input).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_run_writes_repeated_tr181_keys_in_document_order() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("response.json");
        fs::write(
            &input,
            r#"{"featureControl": {"features": [{"name": "Dup", "configData":
                {"tr181.A": "1", "tr181.B": "2", "tr181.A": "3"}}]}}"#,
        )
        .unwrap();

        let report = extractor_in(&dir).run(&input).unwrap();

        assert_eq!(report.config_lines_written, 3);
        assert_eq!(
            fs::read_to_string(dir.path().join("configdata.txt")).unwrap(),
            "tr181.A#~1#~0\ntr181.B#~2#~0\ntr181.A#~3#~0\n"
        );
    }

    #[test]
    fn test_run_missing_input_leaves_output_untouched() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("configdata.txt");
        fs::write(&output, "previous\n").unwrap();
        let extractor = extractor_in(&dir);

        let err = extractor.run(&dir.path().join("absent.json")).unwrap_err();

        assert!(matches!(err, ExtractError::ReadInput { .. }));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
    }

    #[test]
    fn test_help_message_mentions_path() {
        let err = ExtractError::OpenOutput {
            path: PathBuf::from("/tmp/RFC/out.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let help = err.help_message();
        assert!(help.contains("/tmp/RFC/out.txt"));
        assert!(help.contains("/tmp/RFC"));
    }
}
