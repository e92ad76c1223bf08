//! SSH allow-list output

use super::ExtractError;
use crate::json::JsonNode;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Counts from a completed allow-list write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhitelistSummary {
    /// Entries written to the file
    pub written: usize,
    /// Elements skipped because they were not strings
    pub skipped: usize,
}

/// Truncates `path` and writes each string element of `array`, one per line.
///
/// Non-string elements are skipped with a warning. A failed write is logged and
/// the remaining elements are still attempted; the call then returns
/// [`ExtractError::IncompleteWhitelist`]. If the file cannot be opened nothing
/// is written. A node that is not an array is treated as an empty list.
pub fn write_whitelist(array: &JsonNode, path: &Path) -> Result<WhitelistSummary, ExtractError> {
    debug!(path = %path.display(), "Writing SSH whitelist");

    let file = File::create(path).map_err(|source| ExtractError::OpenOutput {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);

    let elements = array.as_array().unwrap_or_default();
    let mut summary = WhitelistSummary::default();
    let mut failed = 0usize;

    for (index, element) in elements.iter().enumerate() {
        let Some(entry) = element.as_str() else {
            warn!(index, element = %element, "Skipping non-string whitelist element");
            summary.skipped += 1;
            continue;
        };

        match writeln!(out, "{}", entry) {
            Ok(()) => summary.written += 1,
            Err(e) => {
                warn!(index, path = %path.display(), error = %e, "Failed to write whitelist entry");
                failed += 1;
            }
        }
    }

    if let Err(e) = out.flush() {
        warn!(path = %path.display(), error = %e, "Failed to flush whitelist file");
        failed = failed.max(1);
    }

    if failed > 0 {
        return Err(ExtractError::IncompleteWhitelist {
            path: path.to_path_buf(),
            failed,
        });
    }

    info!(
        path = %path.display(),
        written = summary.written,
        skipped = summary.skipped,
        "SSH whitelist processed"
    );
    Ok(summary)
}
