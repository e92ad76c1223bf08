//! `tr181.` parameter lines for the config-data output

use super::ExtractError;
use crate::document::FeatureEntry;
use crate::json::JsonNode;
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Separator between the fields of a config-data line
pub const FIELD_DELIMITER: &str = "#~";

/// Only `configData` keys with this prefix are persisted
pub const TR181_PREFIX: &str = "tr181.";

/// A single `key#~value#~flag` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLine {
    pub key: String,
    pub value: String,
    pub flag: u8,
}

impl fmt::Display for ConfigLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.key, FIELD_DELIMITER, self.value, FIELD_DELIMITER, self.flag
        )
    }
}

/// Builds the lines a feature contributes, in `configData` order.
///
/// Keys without the `tr181.` prefix are ignored. Prefixed keys whose value is
/// not a string are skipped with a warning. A key that appears more than once
/// yields one line per occurrence.
pub fn collect_config_lines(entry: &FeatureEntry<'_>) -> Vec<ConfigLine> {
    let Some(config_data) = entry.config_data() else {
        return Vec::new();
    };
    let flag = entry.effective_immediate().as_flag();
    let mut seen = HashSet::new();

    config_data
        .iter()
        .filter_map(|(key, value)| {
            debug!(key = %key, value = %value, "configData entry");
            if !key.starts_with(TR181_PREFIX) {
                return None;
            }
            if !seen.insert(key.as_str()) {
                warn!(key = %key, "Repeated tr181 parameter");
            }
            match value {
                JsonNode::String(value) => Some(ConfigLine {
                    key: key.clone(),
                    value: value.clone(),
                    flag,
                }),
                other => {
                    warn!(key = %key, value = %other, "Skipping tr181 parameter with non-string value");
                    None
                }
            }
        })
        .collect()
}

/// Sink for config-data lines, opened once per run
pub struct ConfigDataWriter<W: Write> {
    inner: W,
    path: PathBuf,
    lines: usize,
}

impl<W: Write> ConfigDataWriter<W> {
    /// Wraps `inner`; `path` is only used in error messages
    pub fn new(inner: W, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
            lines: 0,
        }
    }

    pub fn append(&mut self, line: &ConfigLine) -> Result<(), ExtractError> {
        debug!(line = %line, "Writing config line");
        writeln!(self.inner, "{}", line).map_err(|source| ExtractError::WriteOutput {
            path: self.path.clone(),
            source,
        })?;
        self.lines += 1;
        Ok(())
    }

    /// Lines appended so far
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Returns the wrapped sink without flushing it
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Flushes the sink and returns the number of lines written
    pub fn finish(mut self) -> Result<usize, ExtractError> {
        self.inner
            .flush()
            .map_err(|source| ExtractError::WriteOutput {
                path: self.path.clone(),
                source,
            })?;
        Ok(self.lines)
    }
}
