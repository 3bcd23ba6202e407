//! Telemetry sinks

use crate::event::{EventKind, TelemetryEvent};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Receives telemetry records.
///
/// Implementations must not block and must swallow their own failures:
/// telemetry never affects the action that produced it.
pub trait TelemetrySink: Send + Sync {
    /// Hand over a record; delivery is best-effort
    fn emit(&self, event: TelemetryEvent);
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Arc<T> {
    fn emit(&self, event: TelemetryEvent) {
        (**self).emit(event)
    }
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn emit(&self, _event: TelemetryEvent) {}
}

/// Writes records as structured `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn emit(&self, event: TelemetryEvent) {
        info!(
            target: "reviewpulse::telemetry",
            event = event.event.as_str(),
            sentiment = event.sentiment.as_deref(),
            confidence = event.confidence,
            bucket = event.bucket.map(|b| b.as_str()),
            "{}",
            event.message
        );
    }
}

/// Keeps records in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records so far
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().clone()
    }

    /// Kinds of all records so far
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().iter().map(|e| e.event).collect()
    }

    /// Records of one kind
    pub fn of_kind(&self, kind: EventKind) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.event == kind)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl TelemetrySink for MemorySink {
    fn emit(&self, event: TelemetryEvent) {
        self.events.lock().push(event);
    }
}

/// Forwards every record to several sinks
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink
    pub fn with(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TelemetrySink for FanoutSink {
    fn emit(&self, event: TelemetryEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.emit(TelemetryEvent::new(EventKind::AppStart, "App initialized"));
        sink.emit(TelemetryEvent::new(EventKind::AnalyzeClick, "clicked"));

        assert_eq!(sink.kinds(), vec![EventKind::AppStart, EventKind::AnalyzeClick]);
        assert_eq!(sink.of_kind(EventKind::AnalyzeClick).len(), 1);

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let first = Arc::new(MemorySink::new());
        let second = Arc::new(MemorySink::new());
        let fanout = FanoutSink::new()
            .with(first.clone())
            .with(second.clone())
            .with(Arc::new(NoopSink));

        fanout.emit(TelemetryEvent::new(EventKind::AppStart, "App initialized"));

        assert_eq!(fanout.len(), 3);
        assert_eq!(first.events().len(), 1);
        assert_eq!(second.events().len(), 1);
    }
}
