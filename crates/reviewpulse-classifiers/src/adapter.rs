//! Classifier adapter
//!
//! Owns the single shared sentiment model. The model is loaded once by
//! [`ClassifierAdapter::initialize`], bounded by a timeout, and then used
//! read-only by every [`ClassifierAdapter::classify`] call until an explicit
//! [`ClassifierAdapter::reload`].

use crate::provider::{ProviderLoader, SentimentProvider};
use parking_lot::RwLock;
use reviewpulse_core::{normalize, ClassificationResult, ComponentState, Error, RawOutput, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Timeouts applied by the adapter
#[derive(Debug, Clone, Copy)]
pub struct AdapterConfig {
    /// Upper bound on model loading and warm-up
    pub init_timeout: Duration,

    /// Upper bound on a single inference call (`None` = unbounded)
    pub inference_timeout: Option<Duration>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            init_timeout: Duration::from_secs(120),
            inference_timeout: Some(Duration::from_secs(30)),
        }
    }
}

pub struct ClassifierAdapter {
    loader: Arc<dyn ProviderLoader>,
    config: AdapterConfig,
    inner: RwLock<AdapterInner>,
    /// Serializes initialization attempts
    init_lock: Mutex<()>,
}

#[derive(Default)]
struct AdapterInner {
    state: ComponentState,
    provider: Option<Arc<dyn SentimentProvider>>,
}

impl ClassifierAdapter {
    /// Create an adapter with default timeouts
    pub fn new(loader: Arc<dyn ProviderLoader>) -> Self {
        Self::with_config(loader, AdapterConfig::default())
    }

    pub fn with_config(loader: Arc<dyn ProviderLoader>, config: AdapterConfig) -> Self {
        Self {
            loader,
            config,
            inner: RwLock::new(AdapterInner::default()),
            init_lock: Mutex::new(()),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ComponentState {
        self.inner.read().state
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// Name of the loaded provider, if any
    pub fn provider_name(&self) -> Option<String> {
        self.inner
            .read()
            .provider
            .as_ref()
            .map(|provider| provider.name().to_string())
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Load the model unless it is already loaded.
    ///
    /// Calling again after a failure repeats the attempt. Overlapping calls
    /// wait for the attempt in flight and then return its outcome.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.init_lock.lock().await;

        if self.is_ready() {
            debug!("Classifier already initialized");
            return Ok(());
        }

        self.run_initialization().await
    }

    /// Drop the current model and load a fresh one
    pub async fn reload(&self) -> Result<()> {
        let _guard = self.init_lock.lock().await;
        self.run_initialization().await
    }

    async fn run_initialization(&self) -> Result<()> {
        {
            let mut inner = self.inner.write();
            inner.state = ComponentState::Pending;
            inner.provider = None;
        }

        let timeout = self.config.init_timeout;
        info!(loader = %self.loader.describe(), ?timeout, "Initializing sentiment classifier");
        let start = Instant::now();

        let outcome = match tokio::time::timeout(timeout, self.loader.load()).await {
            Ok(Ok(provider)) => Ok(provider),
            Ok(Err(e @ (Error::ModelLoad(_) | Error::InitializationTimeout(_)))) => Err(e),
            Ok(Err(e)) => Err(Error::model_load(e.to_string())),
            Err(_) => Err(Error::InitializationTimeout(timeout)),
        };

        let mut inner = self.inner.write();
        match outcome {
            Ok(provider) => {
                info!(
                    provider = provider.name(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Sentiment classifier ready"
                );
                inner.provider = Some(provider);
                inner.state = ComponentState::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, kind = e.kind(), "Sentiment classifier failed to load");
                inner.provider = None;
                inner.state = ComponentState::Failed;
                Err(e)
            }
        }
    }

    /// Run the model and return its raw, unnormalized output
    pub async fn infer(&self, text: &str) -> Result<RawOutput> {
        let provider = self.inner.read().provider.clone().ok_or(Error::NotReady)?;

        if text.trim().is_empty() {
            return Err(Error::inference("input text is empty"));
        }

        let call = provider.predict(text);
        let outcome = match self.config.inference_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| Error::inference(format!("model call timed out after {limit:?}")))?,
            None => call.await,
        };

        outcome.map_err(|e| match e {
            Error::Inference(_) => e,
            other => Error::inference(other.to_string()),
        })
    }

    /// Classify one text.
    ///
    /// Output that cannot be normalized counts as a failed inference.
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let raw = self.infer(text).await?;
        normalize(&raw).map_err(|e| Error::inference(e.to_string()))
    }
}
