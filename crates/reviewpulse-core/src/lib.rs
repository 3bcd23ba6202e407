//! reviewpulse Core
//!
//! Core types, decision rules, and utilities shared across reviewpulse components.
//!
//! This crate provides:
//! - The error taxonomy shared by the corpus loader, classifier adapter and session
//! - Classification types (raw provider output, normalized result, sentiment bucket)
//! - The decision engine: output normalization, threshold bucketing, readiness
//! - Session state types from which readiness and status are derived

pub mod decision;
pub mod error;
pub mod state;
pub mod types;

pub use decision::{bucketize, compute_readiness, normalize, DECISION_THRESHOLD};
pub use error::{Error, Result};
pub use state::{ComponentState, SessionState, SessionStatus};
pub use types::{Bucket, ClassificationResult, RawOutput};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::decision::{bucketize, compute_readiness, normalize};
    pub use crate::error::{Error, Result};
    pub use crate::state::{ComponentState, SessionState, SessionStatus};
    pub use crate::types::{Bucket, ClassificationResult, RawOutput};
}
