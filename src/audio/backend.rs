use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Constraints passed to the device when requesting microphone access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    /// Requested sample rate in Hz
    pub sample_rate: u32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            sample_rate: 44100,
        }
    }
}

/// Something the device delivers while capturing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// An encoded audio fragment (may be empty; empty fragments are dropped)
    Data(Vec<u8>),
    /// The device failed mid-capture
    Error(String),
}

/// Reasons a device refuses to start capturing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not found")]
    NotFound,

    #[error("device busy")]
    Busy,

    #[error("{0}")]
    Other(String),
}

/// Microphone capture backend
///
/// Implementations:
/// - `SimulatedMicrophone`: synthetic fragments on a fixed period
/// - `WavFileMicrophone`: replays a WAV file in real time
#[async_trait::async_trait]
pub trait MicrophoneDevice: Send + Sync {
    /// Whether this environment can capture audio at all
    fn is_supported(&self) -> bool;

    /// Request access to the microphone and start capturing
    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, DeviceError>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// A live capture returned by [`MicrophoneDevice::acquire`]
#[async_trait::async_trait]
pub trait CaptureStream: Send {
    /// Next event from the device, `None` once the stream has ended.
    ///
    /// Must be cancel safe: it is polled inside `tokio::select!`.
    async fn next_event(&mut self) -> Option<DeviceEvent>;

    /// Stop all underlying tracks. Calling it more than once is a no-op.
    fn stop_tracks(&mut self);

    /// Whether the tracks are still live
    fn is_live(&self) -> bool;
}

/// Capture stream fed by a producer task over a channel
///
/// The producer receives the stop signal through the paired oneshot and
/// should exit when it fires (or when the sender is dropped).
pub struct ChannelStream {
    events: mpsc::Receiver<DeviceEvent>,
    stop: Option<oneshot::Sender<()>>,
    live: Arc<AtomicBool>,
}

impl ChannelStream {
    pub fn new(
        events: mpsc::Receiver<DeviceEvent>,
        stop: oneshot::Sender<()>,
        live: Arc<AtomicBool>,
    ) -> Self {
        live.store(true, Ordering::SeqCst);
        Self {
            events,
            stop: Some(stop),
            live,
        }
    }
}

#[async_trait::async_trait]
impl CaptureStream for ChannelStream {
    async fn next_event(&mut self) -> Option<DeviceEvent> {
        self.events.recv().await
    }

    fn stop_tracks(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
            self.events.close();
            self.live.store(false, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        self.stop.is_some()
    }
}

impl Drop for ChannelStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}

/// Owns a capture stream and stops its tracks when dropped
pub struct DeviceGuard {
    stream: Box<dyn CaptureStream>,
}

impl DeviceGuard {
    pub fn new(stream: Box<dyn CaptureStream>) -> Self {
        Self { stream }
    }

    pub async fn next_event(&mut self) -> Option<DeviceEvent> {
        self.stream.next_event().await
    }

    pub fn release(&mut self) {
        if self.stream.is_live() {
            debug!("Releasing microphone");
            self.stream.stop_tracks();
        }
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_live()
    }
}

impl Drop for DeviceGuard {
    fn drop(&mut self) {
        self.release();
    }
}
