use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::audio::CaptureConstraints;

/// Hard ceiling on any recording, in seconds
pub const MAX_RECORDING_SECS: u32 = 30;

/// Granularity of the recording counter
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for recording sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Auto-stop after this many seconds (never above 30)
    pub max_duration_secs: u32,

    /// Options passed to the microphone on acquisition
    pub constraints: CaptureConstraints,
}

impl SessionConfig {
    pub fn new(max_duration_secs: u32, constraints: CaptureConstraints) -> Self {
        let clamped = max_duration_secs.clamp(1, MAX_RECORDING_SECS);
        if clamped != max_duration_secs {
            warn!(
                "Recording limit {}s out of range, using {}s",
                max_duration_secs, clamped
            );
        }

        Self {
            max_duration_secs: clamped,
            constraints,
        }
    }

    /// Number of ticks after which the recording stops itself
    pub fn max_ticks(&self) -> u32 {
        self.max_duration_secs.clamp(1, MAX_RECORDING_SECS)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: MAX_RECORDING_SECS,
            constraints: CaptureConstraints::default(),
        }
    }
}
