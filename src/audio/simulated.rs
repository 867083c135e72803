// Simulated microphone for demos and tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::info;

use super::backend::{
    CaptureConstraints, CaptureStream, ChannelStream, DeviceError, DeviceEvent, MicrophoneDevice,
};

/// How the simulated device answers an access request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Grant,
    Deny,
    NoDevice,
    Busy,
}

/// Microphone that emits synthetic fragments on a fixed period
///
/// Fragment `n` is `fragment_bytes` bytes all equal to `n` (wrapping), which
/// makes concatenation order easy to check.
pub struct SimulatedMicrophone {
    supported: bool,
    access: AccessOutcome,
    fragment_interval: Duration,
    fragment_bytes: usize,
    fail_after: Option<Duration>,
    live: Arc<AtomicBool>,
    grants: AtomicUsize,
}

impl SimulatedMicrophone {
    pub fn new(fragment_interval: Duration) -> Self {
        Self {
            supported: true,
            access: AccessOutcome::Grant,
            fragment_interval,
            fragment_bytes: 512,
            fail_after: None,
            live: Arc::new(AtomicBool::new(false)),
            grants: AtomicUsize::new(0),
        }
    }

    /// An environment without any capture capability
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new(Duration::from_millis(250))
        }
    }

    pub fn with_access(mut self, access: AccessOutcome) -> Self {
        self.access = access;
        self
    }

    pub fn with_fragment_bytes(mut self, fragment_bytes: usize) -> Self {
        self.fragment_bytes = fragment_bytes;
        self
    }

    /// Report a device error this long after capture starts
    pub fn failing_after(mut self, delay: Duration) -> Self {
        self.fail_after = Some(delay);
        self
    }

    /// Whether a capture is currently holding the microphone
    pub fn is_capturing(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Number of successful acquisitions so far
    pub fn grants(&self) -> usize {
        self.grants.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MicrophoneDevice for SimulatedMicrophone {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, DeviceError> {
        match self.access {
            AccessOutcome::Grant => {}
            AccessOutcome::Deny => return Err(DeviceError::PermissionDenied),
            AccessOutcome::NoDevice => return Err(DeviceError::NotFound),
            AccessOutcome::Busy => return Err(DeviceError::Busy),
        }

        if self.is_capturing() {
            return Err(DeviceError::Busy);
        }

        info!(
            "Simulated microphone granted ({}Hz, echo_cancellation={}, noise_suppression={})",
            constraints.sample_rate, constraints.echo_cancellation, constraints.noise_suppression
        );

        let (tx, rx) = mpsc::channel(64);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let period = self.fragment_interval;
        let fragment_bytes = self.fragment_bytes;
        let fail_after = self.fail_after;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            let fault = async move {
                match fail_after {
                    Some(delay) => time::sleep(delay).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::pin!(fault);
            let mut sequence: u8 = 0;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = &mut fault => {
                        let _ = tx
                            .send(DeviceEvent::Error("simulated device fault".to_string()))
                            .await;
                        break;
                    }
                    _ = ticker.tick() => {
                        let fragment = vec![sequence; fragment_bytes];
                        if tx.send(DeviceEvent::Data(fragment)).await.is_err() {
                            break;
                        }
                        sequence = sequence.wrapping_add(1);
                    }
                }
            }
        });

        self.grants.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(ChannelStream::new(
            rx,
            stop_tx,
            Arc::clone(&self.live),
        )))
    }

    fn name(&self) -> &str {
        "simulated microphone"
    }
}
