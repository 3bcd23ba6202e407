//! reviewpulse Classifiers
//!
//! Owns the sentiment classification resource and its lifecycle.
//!
//! The statistical model is opaque: a [`ProviderLoader`] produces a
//! [`SentimentProvider`] once, and the [`ClassifierAdapter`] holds it for the
//! rest of the session. Callers only see the adapter's `classify` method.
//!
//! Providers:
//! - [`LexiconProvider`]: keyword matching, no downloads, instant to load
//! - `DistilBertProvider` (feature `ml-models`): DistilBERT fine-tuned on
//!   SST-2, fetched from the Hugging Face Hub and run with Candle

pub mod adapter;
pub mod config;
#[cfg(feature = "ml-models")]
pub mod distilbert;
pub mod lexicon;
pub mod provider;

pub use adapter::{AdapterConfig, ClassifierAdapter};
pub use config::{ClassifierConfig, ProviderKind};
#[cfg(feature = "ml-models")]
pub use distilbert::{DistilBertLoader, DistilBertOptions, DistilBertProvider};
pub use lexicon::{LexiconLoader, LexiconProvider};
pub use provider::{ProviderLoader, SentimentProvider};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::adapter::{AdapterConfig, ClassifierAdapter};
    pub use crate::lexicon::LexiconProvider;
    pub use crate::provider::{ProviderLoader, SentimentProvider};
}
