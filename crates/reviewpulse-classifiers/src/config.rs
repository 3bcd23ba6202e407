//! Configuration for the sentiment classifier

use crate::adapter::AdapterConfig;
use crate::lexicon::LexiconLoader;
use crate::provider::ProviderLoader;
use reviewpulse_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Which model backs the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Keyword lexicon, no downloads
    #[cfg_attr(not(feature = "ml-models"), default)]
    Lexicon,
    /// DistilBERT fine-tuned on SST-2 (requires the `ml-models` feature)
    #[cfg_attr(feature = "ml-models", default)]
    Distilbert,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexicon" => Ok(Self::Lexicon),
            "distilbert" => Ok(Self::Distilbert),
            other => Err(format!(
                "unknown provider '{other}' (expected 'lexicon' or 'distilbert')"
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexicon => f.write_str("lexicon"),
            Self::Distilbert => f.write_str("distilbert"),
        }
    }
}

/// Classifier configuration (YAML `classifier:` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Model provider
    #[serde(default)]
    pub provider: ProviderKind,

    /// Hugging Face repository for the DistilBERT provider
    #[serde(default = "default_model_repo")]
    pub model_repo: String,

    /// Repository revision
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Inference device (`cpu`, `cuda`, `metal`)
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum tokens per input
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Initialization time budget in seconds
    #[serde(default = "default_init_timeout_secs")]
    pub init_timeout_secs: u64,

    /// Per-call inference time budget in seconds (0 disables the limit)
    #[serde(default = "default_inference_timeout_secs")]
    pub inference_timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model_repo: default_model_repo(),
            revision: default_revision(),
            device: default_device(),
            max_length: default_max_length(),
            init_timeout_secs: default_init_timeout_secs(),
            inference_timeout_secs: default_inference_timeout_secs(),
        }
    }
}

impl ClassifierConfig {
    /// Timeouts for the adapter
    pub fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig {
            init_timeout: Duration::from_secs(self.init_timeout_secs),
            inference_timeout: (self.inference_timeout_secs > 0)
                .then(|| Duration::from_secs(self.inference_timeout_secs)),
        }
    }

    /// Build the loader for the configured provider
    pub fn build_loader(&self) -> Result<Arc<dyn ProviderLoader>> {
        if self.init_timeout_secs == 0 {
            return Err(Error::config("init_timeout_secs must be greater than zero"));
        }

        match self.provider {
            ProviderKind::Lexicon => Ok(Arc::new(LexiconLoader)),
            ProviderKind::Distilbert => self.distilbert_loader(),
        }
    }

    #[cfg(feature = "ml-models")]
    fn distilbert_loader(&self) -> Result<Arc<dyn ProviderLoader>> {
        use crate::distilbert::{DistilBertLoader, DistilBertOptions};

        Ok(Arc::new(DistilBertLoader::new(DistilBertOptions {
            repo: self.model_repo.clone(),
            revision: self.revision.clone(),
            device: self.device.clone(),
            max_length: self.max_length,
        })))
    }

    #[cfg(not(feature = "ml-models"))]
    fn distilbert_loader(&self) -> Result<Arc<dyn ProviderLoader>> {
        Err(Error::config(
            "the distilbert provider requires the `ml-models` feature",
        ))
    }
}

fn default_model_repo() -> String {
    "distilbert-base-uncased-finetuned-sst-2-english".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    512
}

fn default_init_timeout_secs() -> u64 {
    120
}

fn default_inference_timeout_secs() -> u64 {
    30
}
