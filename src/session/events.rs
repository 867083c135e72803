use serde::Serialize;
use uuid::Uuid;

use crate::analysis::EmotionResult;
use crate::error::CaptureError;

/// Why a recording stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// `request_stop` was called
    Manual,
    /// The recording hit its time limit
    TimeLimit,
}

/// Lifecycle notifications published by the capture controller
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Started {
        session_id: Uuid,
    },
    Tick {
        session_id: Uuid,
        elapsed_secs: u32,
        remaining_secs: u32,
    },
    Stopped {
        session_id: Uuid,
        reason: StopReason,
        duration_secs: f64,
    },
    ResultReady {
        session_id: Uuid,
        result: EmotionResult,
    },
    Saved {
        session_id: Uuid,
        result: EmotionResult,
    },
    /// `session_id` is `None` when no session was created
    Failed {
        session_id: Option<Uuid>,
        error: CaptureError,
    },
}
