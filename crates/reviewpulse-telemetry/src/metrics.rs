//! Session metrics
//!
//! Counters are kept locally for status reporting and mirrored to the
//! `metrics` facade, which is a no-op unless a recorder is installed.

use reviewpulse_core::Bucket;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Register metric descriptions with the installed recorder
pub fn describe_metrics() {
    ::metrics::describe_counter!(
        "reviewpulse_analyses_total",
        "Total number of analyze requests"
    );
    ::metrics::describe_counter!(
        "reviewpulse_analyses_blocked_total",
        "Analyze requests rejected before inference, by reason"
    );
    ::metrics::describe_counter!(
        "reviewpulse_classifications_total",
        "Completed classifications by bucket"
    );
    ::metrics::describe_counter!(
        "reviewpulse_errors_total",
        "Failed inferences and loads by error kind"
    );
    ::metrics::describe_histogram!(
        "reviewpulse_inference_latency_us",
        ::metrics::Unit::Microseconds,
        "Inference latency in microseconds"
    );
}

/// Metrics collector for a reviewpulse session
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    analyses: AtomicU64,
    blocked: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    positive: AtomicU64,
    negative: AtomicU64,
    neutral: AtomicU64,
    inference_latency_us: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an analyze request
    pub fn record_analysis_started(&self) {
        self.inner.analyses.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("reviewpulse_analyses_total").increment(1);
    }

    /// Record an analyze request rejected before inference
    pub fn record_blocked(&self, reason: &'static str) {
        self.inner.blocked.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("reviewpulse_analyses_blocked_total", "reason" => reason).increment(1);
    }

    /// Record a completed classification
    pub fn record_success(&self, bucket: Bucket, latency_us: u64) {
        self.inner.successes.fetch_add(1, Ordering::Relaxed);
        self.inner
            .inference_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);

        let counter = match bucket {
            Bucket::Positive => &self.inner.positive,
            Bucket::Negative => &self.inner.negative,
            Bucket::Neutral => &self.inner.neutral,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        ::metrics::counter!("reviewpulse_classifications_total", "bucket" => bucket.as_str())
            .increment(1);
        ::metrics::histogram!("reviewpulse_inference_latency_us").record(latency_us as f64);
    }

    /// Record a failure of the given error kind
    pub fn record_failure(&self, kind: &'static str) {
        self.inner.failures.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("reviewpulse_errors_total", "kind" => kind).increment(1);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            analyses: self.inner.analyses.load(Ordering::Relaxed),
            blocked: self.inner.blocked.load(Ordering::Relaxed),
            successes: self.inner.successes.load(Ordering::Relaxed),
            failures: self.inner.failures.load(Ordering::Relaxed),
            positive: self.inner.positive.load(Ordering::Relaxed),
            negative: self.inner.negative.load(Ordering::Relaxed),
            neutral: self.inner.neutral.load(Ordering::Relaxed),
            inference_latency_us: self.inner.inference_latency_us.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub analyses: u64,
    pub blocked: u64,
    pub successes: u64,
    pub failures: u64,
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    pub inference_latency_us: u64,
}

impl MetricsSnapshot {
    /// Average latency of successful inferences
    pub fn avg_latency_us(&self) -> u64 {
        if self.successes == 0 {
            0
        } else {
            self.inference_latency_us / self.successes
        }
    }

    /// Count for one bucket
    pub fn bucket_count(&self, bucket: Bucket) -> u64 {
        match bucket {
            Bucket::Positive => self.positive,
            Bucket::Negative => self.negative,
            Bucket::Neutral => self.neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let metrics = MetricsCollector::new();

        metrics.record_analysis_started();
        metrics.record_success(Bucket::Positive, 4000);
        metrics.record_analysis_started();
        metrics.record_success(Bucket::Neutral, 6000);
        metrics.record_analysis_started();
        metrics.record_failure("inference");
        metrics.record_blocked("no_corpus");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.analyses, 3);
        assert_eq!(snapshot.successes, 2);
        assert_eq!(snapshot.failures, 1);
        assert_eq!(snapshot.blocked, 1);
        assert_eq!(snapshot.bucket_count(Bucket::Positive), 1);
        assert_eq!(snapshot.bucket_count(Bucket::Neutral), 1);
        assert_eq!(snapshot.bucket_count(Bucket::Negative), 0);
        assert_eq!(snapshot.avg_latency_us(), 5000);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = MetricsCollector::new();
        let other = metrics.clone();

        other.record_analysis_started();

        assert_eq!(metrics.snapshot().analyses, 1);
        assert_eq!(MetricsSnapshot::default().avg_latency_us(), 0);
    }
}
