//! Logging-based telemetry sink

use super::{TelemetryEvent, TelemetrySink};
use tracing::warn;

/// Sink that records events through tracing only
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

impl TelemetrySink for LoggingSink {
    fn notify(&self, event: &TelemetryEvent) {
        warn!(
            marker = event.marker(),
            value = event.value(),
            "Telemetry event (no sender configured)"
        );
    }
}
