//! Fire-and-forget telemetry notifications
//!
//! The extractor reports a small set of events through [`TelemetrySink`]. The
//! sink never returns anything to the caller, so a broken telemetry path can
//! not change how a run ends.

pub mod command;
pub mod logging;

pub use command::CommandSink;
pub use logging::LoggingSink;

/// Events reported by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryEvent {
    /// The input could not be parsed as JSON
    JsonParseFailed,
}

impl TelemetryEvent {
    /// Marker name understood by the device telemetry service
    pub fn marker(&self) -> &'static str {
        match self {
            TelemetryEvent::JsonParseFailed => "SYST_ERR_RFC_JSON_PARSE",
        }
    }

    /// Counter increment sent with the marker
    pub fn value(&self) -> u32 {
        match self {
            TelemetryEvent::JsonParseFailed => 1,
        }
    }
}

/// Receiver for telemetry events
pub trait TelemetrySink: Send + Sync {
    /// Called when an event occurs
    fn notify(&self, event: &TelemetryEvent);
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl TelemetrySink for NoOpSink {
    fn notify(&self, _event: &TelemetryEvent) {}
}
