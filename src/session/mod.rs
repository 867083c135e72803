//! Recording session management
//!
//! This module provides:
//! - `RecordingSession`: the synchronous state machine for one attempt
//! - `CaptureController`: runs sessions against a microphone, enforces the
//!   time limit and hands finished recordings to the classifier
//! - Lifecycle events, statistics and the completion contract

mod config;
mod controller;
mod driver;
mod events;
mod outcome;
mod session;
mod state;
mod stats;

pub use config::{SessionConfig, MAX_RECORDING_SECS, TICK_INTERVAL};
pub use controller::CaptureController;
pub use events::{PipelineEvent, StopReason};
pub use outcome::{practice_minutes, Analysis, PendingAnalysis};
pub use session::RecordingSession;
pub use state::{SessionState, TransitionError};
pub use stats::SessionStats;
