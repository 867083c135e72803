use thiserror::Error;

use crate::audio::DeviceError;
use crate::session::TransitionError;

/// Result type alias for capture pipeline operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Errors surfaced by the recording and result pipeline.
///
/// None of these are fatal to the host application; the caller decides how
/// to present them and whether to start a new session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("audio capture is not supported in this environment")]
    UnsupportedCapability,

    #[error("microphone permission denied")]
    PermissionDenied,

    #[error("no microphone found")]
    DeviceNotFound,

    #[error("microphone is in use by another application")]
    DeviceBusy,

    #[error("audio device failure: {0}")]
    Acquisition(String),

    #[error("no audio data recorded")]
    EmptyRecording,

    #[error("a recording session is already active")]
    SessionAlreadyActive,

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl CaptureError {
    /// Message suitable for showing to the person practicing
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnsupportedCapability => "Audio recording is not supported in this browser",
            Self::PermissionDenied => {
                "Microphone permission denied. Please allow microphone access and try again."
            }
            Self::DeviceNotFound => {
                "No microphone found. Please connect a microphone and try again."
            }
            Self::DeviceBusy => "Microphone is being used by another application.",
            Self::Acquisition(_) => "Recording error occurred",
            Self::EmptyRecording => "No audio data recorded",
            Self::SessionAlreadyActive => "A recording is already in progress",
            Self::Transition(_) => "Could not start recording",
        }
    }
}

impl From<DeviceError> for CaptureError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::PermissionDenied => Self::PermissionDenied,
            DeviceError::NotFound => Self::DeviceNotFound,
            DeviceError::Busy => Self::DeviceBusy,
            DeviceError::Other(msg) => Self::Acquisition(msg),
        }
    }
}
