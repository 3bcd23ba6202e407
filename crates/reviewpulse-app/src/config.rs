//! Application configuration
//!
//! Read from an optional YAML file; every field has a default, and command
//! line flags override the file.

use crate::cli::Cli;
use reviewpulse_classifiers::ClassifierConfig;
use reviewpulse_core::{Error, Result};
use reviewpulse_corpus::{CorpusSource, DEFAULT_TEXT_COLUMN};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Location of the tab-separated review file (URL or path)
    #[serde(default = "default_source")]
    pub source: String,

    /// Column holding the review text
    #[serde(default = "default_text_column")]
    pub text_column: String,

    /// Time budget for fetching a remote source, in seconds (0 disables it)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Seed for review sampling
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Telemetry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Master switch; when off no records are produced anywhere
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Collection endpoint for the HTTP beacon
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Also write records to the log
    #[serde(default = "default_true")]
    pub log_events: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            log_events: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            text_column: default_text_column(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            classifier: ClassifierConfig::default(),
            telemetry: TelemetryConfig::default(),
            seed: None,
        }
    }
}

impl AppConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::config(format!("invalid config: {}", e)))
    }

    /// Read the config file when it exists, then apply command line overrides.
    ///
    /// A missing file is only an error when it was named explicitly.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    debug!("No config file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_overrides(cli);
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_yaml(&text)
    }

    /// Apply command line overrides
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(source) = &cli.source {
            self.source = source.clone();
        }
        if let Some(provider) = cli.provider {
            self.classifier.provider = provider;
        }
        if let Some(endpoint) = &cli.endpoint {
            self.telemetry.endpoint = Some(endpoint.clone());
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if cli.no_telemetry {
            self.telemetry.enabled = false;
        }
    }

    pub fn corpus_source(&self) -> CorpusSource {
        CorpusSource::parse(&self.source)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_secs > 0).then(|| Duration::from_secs(self.fetch_timeout_secs))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(Error::config("source must not be empty"));
        }
        if self.text_column.trim().is_empty() {
            return Err(Error::config("text_column must not be empty"));
        }
        if let Some(endpoint) = &self.telemetry.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(Error::config(format!(
                    "telemetry endpoint must be an http(s) URL, got {}",
                    endpoint
                )));
            }
        }
        Ok(())
    }
}

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "reviewpulse.yaml";

fn default_source() -> String {
    "reviews_test.tsv".to_string()
}

fn default_text_column() -> String {
    DEFAULT_TEXT_COLUMN.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}
