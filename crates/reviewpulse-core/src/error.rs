//! Error types for reviewpulse

use std::time::Duration;

/// Result type alias using reviewpulse's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for reviewpulse operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tabular source could not be fetched or returned a non-success status
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The tabular parser reported a fatal condition
    #[error("parse error: {0}")]
    Parse(String),

    /// Parsing succeeded but no row carried a usable value
    #[error("no valid review texts found in the \"{column}\" column")]
    EmptyCorpus { column: String },

    /// Classifier initialization exceeded its time budget
    #[error("classifier initialization timed out after {0:?}")]
    InitializationTimeout(Duration),

    /// The model provider failed to load
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// Classification was requested before the classifier was ready
    #[error("classifier is not ready")]
    NotReady,

    /// A single inference call failed
    #[error("inference error: {0}")]
    Inference(String),

    /// The provider output could not be normalized
    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new source-unavailable error
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Create a new parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new empty-corpus error for the given column
    pub fn empty_corpus(column: impl Into<String>) -> Self {
        Self::EmptyCorpus {
            column: column.into(),
        }
    }

    /// Create a new model load error
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new malformed-output error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedOutput(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable identifier used in telemetry records and metric labels
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnavailable(_) => "source_unavailable",
            Self::Parse(_) => "parse_error",
            Self::EmptyCorpus { .. } => "empty_corpus",
            Self::InitializationTimeout(_) => "initialization_timeout",
            Self::ModelLoad(_) => "model_load",
            Self::NotReady => "not_ready",
            Self::Inference(_) => "inference_error",
            Self::MalformedOutput(_) => "malformed_output",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether a fresh attempt of the failed operation may succeed.
    ///
    /// Configuration and internal errors need operator action; everything
    /// else is cleared by reloading or retrying the action.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::Internal(_))
    }

    /// Whether this error belongs to the corpus loading family
    pub fn is_corpus_failure(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable(_) | Self::Parse(_) | Self::EmptyCorpus { .. }
        )
    }
}
