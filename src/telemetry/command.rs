//! Telemetry sink that hands events to an external sender program

use super::{TelemetryEvent, TelemetrySink};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Spawns `<program> <marker> <value>` for each event.
///
/// The child is not waited on and its output is discarded. Spawn failures are
/// logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: PathBuf,
}

impl CommandSink {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl TelemetrySink for CommandSink {
    fn notify(&self, event: &TelemetryEvent) {
        let spawned = Command::new(&self.program)
            .arg(event.marker())
            .arg(event.value().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => debug!(
                program = %self.program.display(),
                marker = event.marker(),
                pid = child.id(),
                "Telemetry event sent"
            ),
            Err(e) => warn!(
                program = %self.program.display(),
                marker = event.marker(),
                error = %e,
                "Failed to launch telemetry sender"
            ),
        }
    }
}
