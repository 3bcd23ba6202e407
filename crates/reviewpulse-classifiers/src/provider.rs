//! Provider traits for the opaque classification model

use async_trait::async_trait;
use reviewpulse_core::{RawOutput, Result};
use std::sync::Arc;

/// A loaded sentiment model.
///
/// Given input text, answers with a list of `{label, score}` entries ranked
/// best-first. Nothing else about the model is assumed.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Run the model on the given text
    async fn predict(&self, text: &str) -> Result<RawOutput>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Acquires a [`SentimentProvider`].
///
/// Loading may be slow (downloads, warm-up); the adapter bounds it with a
/// timeout and calls it again only on an explicit reload.
#[async_trait]
pub trait ProviderLoader: Send + Sync {
    /// Load the model and return a shareable handle
    async fn load(&self) -> Result<Arc<dyn SentimentProvider>>;

    /// Short description of what this loader loads, for logs
    fn describe(&self) -> String;
}
