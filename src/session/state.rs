use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of one recording session
///
/// `Idle -> Requesting -> Recording -> Stopping -> Processing -> Complete`,
/// with `Failed` reachable from any state between `Requesting` and
/// `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Requesting,
    Recording,
    Stopping,
    Processing,
    Complete,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Whether the session still holds (or is acquiring) the pipeline
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::Requesting | Self::Recording | Self::Stopping | Self::Processing
        )
    }

    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        match (self, next) {
            (Idle, Requesting)
            | (Requesting, Recording)
            | (Recording, Stopping)
            | (Stopping, Processing)
            | (Processing, Complete) => true,
            (from, Failed) => from.is_active(),
            _ => false,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid session transition {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: SessionState,
    pub to: SessionState,
}
