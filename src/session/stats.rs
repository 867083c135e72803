use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::SessionState;

/// Snapshot of a recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub session_id: Uuid,

    pub state: SessionState,

    /// When recording actually started (after the device was granted)
    pub started_at: Option<DateTime<Utc>>,

    /// Whole seconds counted by the recording tick
    pub elapsed_secs: u32,

    /// Non-empty fragments received from the device
    pub fragments_count: usize,

    /// Total bytes received from the device
    pub bytes_collected: usize,

    /// Measured start-to-stop duration, once stopped
    pub duration_secs: Option<f64>,
}
