use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::events::StopReason;
use crate::analysis::EmotionResult;
use crate::error::{CaptureError, CaptureResult};

/// Result of one completed session
///
/// Not `Clone`: [`CaptureController::save_result`](super::CaptureController::save_result)
/// consumes it, so a result is saved at most once.
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub session_id: Uuid,
    pub result: EmotionResult,
    pub duration: Duration,
    pub practice_minutes: u32,
    pub stop_reason: StopReason,
    pub fragment_count: usize,
    pub artifact_bytes: usize,
    pub completed_at: DateTime<Utc>,
}

/// Whole practice minutes for a recording, rounded half away from zero
pub fn practice_minutes(duration: Duration) -> u32 {
    (duration.as_secs_f64() / 60.0).round() as u32
}

/// Completion handle returned by `request_start`
#[derive(Debug)]
pub struct PendingAnalysis {
    session_id: Uuid,
    outcome: oneshot::Receiver<CaptureResult<Analysis>>,
}

impl PendingAnalysis {
    pub(crate) fn new(
        session_id: Uuid,
        outcome: oneshot::Receiver<CaptureResult<Analysis>>,
    ) -> Self {
        Self {
            session_id,
            outcome,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Wait for the session to produce its result or fail
    pub async fn outcome(self) -> CaptureResult<Analysis> {
        match self.outcome.await {
            Ok(outcome) => outcome,
            Err(_) => Err(CaptureError::Acquisition(
                "session ended without a result".to_string(),
            )),
        }
    }
}
