//! reviewpulse Telemetry
//!
//! Best-effort, at-most-once records of session actions, plus counters.
//!
//! Provides:
//! - [`TelemetryEvent`] records (timestamp, event kind, outcome, bounded review preview)
//! - The [`TelemetrySink`] seam and sinks: no-op, tracing, in-memory, HTTP beacon
//! - [`MetricsCollector`] for analysis counts and inference latency
//!
//! Emitting never blocks and never fails from the caller's point of view.

pub mod beacon;
pub mod event;
pub mod metrics;
pub mod sink;

pub use beacon::BeaconSink;
pub use event::{preview, EventKind, TelemetryEvent, PREVIEW_CHARS};
pub use metrics::{describe_metrics, MetricsCollector, MetricsSnapshot};
pub use sink::{FanoutSink, MemorySink, NoopSink, TelemetrySink, TracingSink};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::event::{EventKind, TelemetryEvent};
    pub use crate::metrics::MetricsCollector;
    pub use crate::sink::TelemetrySink;
}
