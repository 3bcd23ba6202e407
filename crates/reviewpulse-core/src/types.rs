//! Core types for reviewpulse

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Raw output of a classification provider.
///
/// Providers are opaque: the only contract is that they answer with an
/// ordered list of `{label, score}` objects ranked best-first. The value is
/// kept untyped until [`crate::decision::normalize`] validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOutput(pub Value);

impl RawOutput {
    /// Wrap an arbitrary JSON value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Build a well-formed output from ranked `(label, score)` pairs
    pub fn ranked<L: AsRef<str>>(entries: impl IntoIterator<Item = (L, f64)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(label, score)| json!({ "label": label.as_ref(), "score": score }))
            .collect();
        Self(Value::Array(entries))
    }

    /// Access the underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for RawOutput {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Normalized result of a single classification call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Sentiment label, upper-cased (e.g. `POSITIVE`)
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f64,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Confidence as a percentage with one decimal, e.g. `97.3`
    pub fn percent(&self) -> f64 {
        (self.score * 1000.0).round() / 10.0
    }
}

/// Three-valued sentiment outcome shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Positive,
    Negative,
    Neutral,
}

impl Bucket {
    /// Lowercase name used in telemetry and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
