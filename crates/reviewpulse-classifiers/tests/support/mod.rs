//! Mock providers and loaders for testing
//!
//! Configurable implementations of `SentimentProvider` and `ProviderLoader`
//! for exercising the adapter lifecycle, timeouts and error paths.

#![allow(dead_code)]

use async_trait::async_trait;
use reviewpulse_classifiers::{ProviderLoader, SentimentProvider};
use reviewpulse_core::{Error, RawOutput, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A provider answering with a fixed raw output
pub struct MockProvider {
    output: RawOutput,
    simulated_latency: Option<Duration>,
    call_count: AtomicU32,
}

impl MockProvider {
    /// Answer with a single ranked entry
    pub fn new(label: &str, score: f64) -> Self {
        Self::with_output(RawOutput::ranked([(label, score)]))
    }

    /// Answer with an arbitrary raw output
    pub fn with_output(output: RawOutput) -> Self {
        Self {
            output,
            simulated_latency: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Set simulated latency for every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    /// Get the number of times predict was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SentimentProvider for MockProvider {
    async fn predict(&self, _text: &str) -> Result<RawOutput> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }

        Ok(self.output.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A provider that always fails - for testing error paths
pub struct FailingProvider {
    error_message: String,
}

impl FailingProvider {
    pub fn new(message: &str) -> Self {
        Self {
            error_message: message.to_string(),
        }
    }
}

#[async_trait]
impl SentimentProvider for FailingProvider {
    async fn predict(&self, _text: &str) -> Result<RawOutput> {
        Err(Error::internal(self.error_message.clone()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// A loader handing out a prepared provider
pub struct MockLoader {
    provider: Arc<dyn SentimentProvider>,
    load_delay: Option<Duration>,
    failures_left: AtomicU32,
    load_count: AtomicU32,
}

impl MockLoader {
    pub fn new(provider: Arc<dyn SentimentProvider>) -> Self {
        Self {
            provider,
            load_delay: None,
            failures_left: AtomicU32::new(0),
            load_count: AtomicU32::new(0),
        }
    }

    /// Sleep before every load
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Fail the first `count` loads
    pub fn failing_first(self, count: u32) -> Self {
        self.failures_left.store(count, Ordering::Relaxed);
        self
    }

    /// Make every following load fail
    pub fn fail_from_now(&self) {
        self.failures_left.store(u32::MAX, Ordering::Relaxed);
    }

    /// Get the number of load attempts
    pub fn load_count(&self) -> u32 {
        self.load_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ProviderLoader for MockLoader {
    async fn load(&self) -> Result<Arc<dyn SentimentProvider>> {
        self.load_count.fetch_add(1, Ordering::Relaxed);

        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(Error::model_load("simulated download failure"));
        }

        Ok(Arc::clone(&self.provider))
    }

    fn describe(&self) -> String {
        "mock-loader".to_string()
    }
}
