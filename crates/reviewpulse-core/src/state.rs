//! Session state machine
//!
//! The session is never stored as a derived flag. Components report their own
//! [`ComponentState`], a [`SessionState`] record is assembled from those on
//! every read, and readiness and status are computed from the record.

use crate::decision::compute_readiness;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one independently loaded component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    /// No load attempt has started yet
    #[default]
    Idle,
    /// A load attempt is in flight
    Pending,
    /// The last attempt settled successfully
    Ready,
    /// The last attempt settled with a failure
    Failed,
}

impl ComponentState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Whether the component reached a terminal outcome
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

/// Snapshot of everything readiness depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Corpus loader state
    pub corpus: ComponentState,

    /// Classifier adapter state
    pub classifier: ComponentState,

    /// Number of items in the current corpus
    pub corpus_size: usize,

    /// Whether an analyze action is in flight
    pub busy: bool,
}

impl SessionState {
    /// Readiness predicate gating the analyze action
    pub fn is_ready(&self) -> bool {
        compute_readiness(
            self.corpus.is_ready(),
            self.classifier.is_ready(),
            self.corpus_size,
        )
    }

    /// Whether both loads reached a terminal outcome
    pub fn is_settled(&self) -> bool {
        self.corpus.is_settled() && self.classifier.is_settled()
    }

    /// Overall session status derived from the component states
    pub fn status(&self) -> SessionStatus {
        use ComponentState::*;

        match (self.corpus, self.classifier) {
            (Idle, Idle) => SessionStatus::Initializing,
            (Pending, _) | (_, Pending) | (Idle, _) | (_, Idle) => SessionStatus::Loading,
            (Failed, Failed) => SessionStatus::Unavailable,
            (Ready, Ready) if self.corpus_size > 0 => SessionStatus::Ready,
            _ => SessionStatus::Degraded,
        }
    }
}

/// Overall session status observed by the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Nothing started yet
    Initializing,
    /// At least one component is still loading
    Loading,
    /// Both components ready and the corpus is non-empty
    Ready,
    /// Exactly one component failed
    Degraded,
    /// Both components failed
    Unavailable,
}

impl SessionStatus {
    /// Human-readable status line for a settled or in-flight session
    pub fn message(&self, state: &SessionState) -> String {
        match self {
            Self::Initializing => "Initializing…".to_string(),
            Self::Loading => "Loading reviews and sentiment model…".to_string(),
            Self::Ready => format!(
                "Ready: {} reviews loaded. Analyze a random review.",
                state.corpus_size
            ),
            Self::Unavailable => "Not ready: model and reviews failed to load.".to_string(),
            Self::Degraded => {
                if state.classifier.is_failed() {
                    "Not ready: model failed to load.".to_string()
                } else {
                    "Not ready: reviews failed to load.".to_string()
                }
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Degraded | Self::Unavailable)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Degraded => "degraded",
            Self::Unavailable => "unavailable",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComponentState::*;

    fn state(corpus: ComponentState, classifier: ComponentState, size: usize) -> SessionState {
        SessionState {
            corpus,
            classifier,
            corpus_size: size,
            busy: false,
        }
    }

    #[test]
    fn test_status_transitions() {
        assert_eq!(state(Idle, Idle, 0).status(), SessionStatus::Initializing);
        assert_eq!(state(Pending, Pending, 0).status(), SessionStatus::Loading);
        assert_eq!(state(Ready, Pending, 3).status(), SessionStatus::Loading);
        assert_eq!(state(Ready, Ready, 3).status(), SessionStatus::Ready);
        assert_eq!(state(Ready, Failed, 3).status(), SessionStatus::Degraded);
        assert_eq!(state(Failed, Ready, 0).status(), SessionStatus::Degraded);
        assert_eq!(state(Failed, Failed, 0).status(), SessionStatus::Unavailable);
    }

    #[test]
    fn test_ready_requires_non_empty_corpus() {
        let empty = state(Ready, Ready, 0);
        assert!(!empty.is_ready());
        assert_ne!(empty.status(), SessionStatus::Ready);
        assert!(state(Ready, Ready, 1).is_ready());
    }

    #[test]
    fn test_settled_only_after_terminal_outcomes() {
        assert!(!state(Ready, Pending, 1).is_settled());
        assert!(state(Ready, Failed, 1).is_settled());
        assert!(state(Failed, Failed, 0).is_settled());
    }

    #[test]
    fn test_degraded_message_names_failed_component() {
        let model_failed = state(Ready, Failed, 2);
        assert_eq!(
            model_failed.status().message(&model_failed),
            "Not ready: model failed to load."
        );

        let corpus_failed = state(Failed, Ready, 0);
        assert_eq!(
            corpus_failed.status().message(&corpus_failed),
            "Not ready: reviews failed to load."
        );
    }
}
