//! Telemetry records

use chrono::{DateTime, Utc};
use reviewpulse_core::{Bucket, ClassificationResult, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Longest review excerpt carried by a record, in characters
pub const PREVIEW_CHARS: usize = 240;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    AppStart,
    TsvLoadStart,
    TsvLoadSuccess,
    TsvLoadFail,
    ModelLoadStart,
    ModelLoadSuccess,
    ModelLoadFail,
    AnalyzeClick,
    AnalyzeBlocked,
    InferenceStart,
    InferenceSuccess,
    InferenceFail,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppStart => "app_start",
            Self::TsvLoadStart => "tsv_load_start",
            Self::TsvLoadSuccess => "tsv_load_success",
            Self::TsvLoadFail => "tsv_load_fail",
            Self::ModelLoadStart => "model_load_start",
            Self::ModelLoadSuccess => "model_load_success",
            Self::ModelLoadFail => "model_load_fail",
            Self::AnalyzeClick => "analyze_click",
            Self::AnalyzeBlocked => "analyze_blocked",
            Self::InferenceStart => "inference_start",
            Self::InferenceSuccess => "inference_success",
            Self::InferenceFail => "inference_fail",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::TsvLoadFail | Self::ModelLoadFail | Self::InferenceFail
        )
    }
}

/// A single best-effort telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// When the record was created, written as an RFC 3339 `ts_iso` key
    #[serde(rename = "ts_iso")]
    pub ts: DateTime<Utc>,

    /// Event kind
    pub event: EventKind,

    /// Short human-readable description
    pub message: String,

    /// Session that produced the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Model label on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,

    /// Model confidence on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Decided bucket on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,

    /// Beginning of the review text, at most [`PREVIEW_CHARS`] characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_preview: Option<String>,

    /// Additional key-value pairs
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

impl TelemetryEvent {
    /// Create a new record stamped with the current time
    pub fn new(event: EventKind, message: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            event,
            message: message.into(),
            session_id: None,
            sentiment: None,
            confidence: None,
            bucket: None,
            review_preview: None,
            meta: Map::new(),
        }
    }

    /// Set the session id
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Attach a bounded preview of the review text
    pub fn with_review(mut self, review: &str) -> Self {
        self.review_preview = Some(preview(review));
        self
    }

    /// Attach the classification outcome
    pub fn with_outcome(mut self, result: &ClassificationResult, bucket: Bucket) -> Self {
        self.sentiment = Some(result.label.clone());
        self.confidence = Some(result.score);
        self.bucket = Some(bucket);
        self
    }

    /// Attach an error description and its kind
    pub fn with_error(self, error: &Error) -> Self {
        self.with_meta("error", error.to_string())
            .with_meta("error_kind", error.kind())
    }

    /// Attach an arbitrary metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

/// First [`PREVIEW_CHARS`] characters of a text
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
