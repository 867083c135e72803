use hound::WavReader;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{info, warn};

use super::backend::{
    CaptureConstraints, CaptureStream, ChannelStream, DeviceError, DeviceEvent, MicrophoneDevice,
};

/// Microphone that replays a WAV file in real time
///
/// Fragments are little-endian 16-bit PCM. Once the file is exhausted the
/// stream stays open but silent until it is released.
pub struct WavFileMicrophone {
    path: PathBuf,
    fragment_duration: Duration,
    live: Arc<AtomicBool>,
}

impl WavFileMicrophone {
    pub fn new(path: impl Into<PathBuf>, fragment_duration: Duration) -> Self {
        Self {
            path: path.into(),
            fragment_duration,
            live: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn load_fragments(&self) -> Result<(u32, Vec<Vec<u8>>), DeviceError> {
        let reader = WavReader::open(&self.path).map_err(|e| match e {
            hound::Error::IoError(io) if io.kind() == io::ErrorKind::NotFound => {
                DeviceError::NotFound
            }
            other => DeviceError::Other(format!(
                "failed to open {}: {}",
                self.path.display(),
                other
            )),
        })?;

        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DeviceError::Other(format!("failed to read samples: {}", e)))?;

        let per_fragment = (spec.sample_rate as u128
            * spec.channels as u128
            * self.fragment_duration.as_millis()
            / 1000)
            .max(1) as usize;

        let fragments = samples
            .chunks(per_fragment)
            .map(|chunk| chunk.iter().flat_map(|s| s.to_le_bytes()).collect())
            .collect();

        info!(
            "WAV microphone loaded {}: {}Hz, {} channels, {} samples",
            self.path.display(),
            spec.sample_rate,
            spec.channels,
            samples.len()
        );

        Ok((spec.sample_rate, fragments))
    }
}

#[async_trait::async_trait]
impl MicrophoneDevice for WavFileMicrophone {
    fn is_supported(&self) -> bool {
        true
    }

    async fn acquire(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, DeviceError> {
        if self.is_capturing() {
            return Err(DeviceError::Busy);
        }

        let (sample_rate, fragments) = self.load_fragments()?;
        if sample_rate != constraints.sample_rate {
            warn!(
                "WAV file is {}Hz but {}Hz was requested; replaying without resampling",
                sample_rate, constraints.sample_rate
            );
        }

        let (tx, rx) = mpsc::channel(64);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let period = self.fragment_duration;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            let mut fragments = fragments.into_iter();

            loop {
                tokio::select! {
                    _ = &mut stop_rx => return,
                    _ = ticker.tick() => match fragments.next() {
                        Some(fragment) => {
                            if tx.send(DeviceEvent::Data(fragment)).await.is_err() {
                                return;
                            }
                        }
                        None => break,
                    },
                }
            }

            // Keep the sender alive until the capture is released
            let _ = stop_rx.await;
            drop(tx);
        });

        Ok(Box::new(ChannelStream::new(
            rx,
            stop_tx,
            Arc::clone(&self.live),
        )))
    }

    fn name(&self) -> &str {
        "WAV file microphone"
    }
}
