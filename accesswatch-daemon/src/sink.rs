//! Event sink backed by the tracing subscriber.
//!
//! Formatted access records and alerts are emitted as structured log
//! events under dedicated targets so downstream collectors can route
//! them separately from daemon diagnostics. Self-identifying markers
//! in the monitor configuration keep these lines from feeding back
//! into the detection loop when the daemon watches its own host.

use accesswatch_core::error::SinkError;
use accesswatch_core::pipeline::EventSink;

/// Sink that forwards emissions to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing-backed sink.
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn on_line(&self, line: &str) -> Result<(), SinkError> {
        tracing::info!(target: "accesswatch::access", record = line);
        Ok(())
    }

    fn on_alert(&self, title: &str, message: &str) -> Result<(), SinkError> {
        tracing::warn!(target: "accesswatch::alert", title, message);
        Ok(())
    }
}
