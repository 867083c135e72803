use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time;
use tracing::{debug, error, info, warn};

use super::config::{SessionConfig, TICK_INTERVAL};
use super::events::{PipelineEvent, StopReason};
use super::outcome::{practice_minutes, Analysis};
use super::session::RecordingSession;
use super::stats::SessionStats;
use crate::analysis::EmotionClassifier;
use crate::audio::{DeviceEvent, DeviceGuard};
use crate::clock::Clock;
use crate::error::{CaptureError, CaptureResult};
use crate::progress::ProgressNotifier;

pub(crate) enum Command {
    /// Stop recording; acknowledged once the tick is cancelled and the
    /// device released
    Stop(oneshot::Sender<()>),
}

/// Owns one session from Recording until it completes or fails.
///
/// Every transition after the device is granted happens on this task.
pub(crate) struct SessionDriver {
    pub(crate) session: RecordingSession,
    pub(crate) config: SessionConfig,
    pub(crate) classifier: Arc<dyn EmotionClassifier>,
    pub(crate) notifier: Arc<dyn ProgressNotifier>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) events: broadcast::Sender<PipelineEvent>,
    pub(crate) stats: watch::Sender<SessionStats>,
}

impl SessionDriver {
    pub(crate) async fn run(
        mut self,
        mut device: DeviceGuard,
        mut commands: mpsc::Receiver<Command>,
        outcome: oneshot::Sender<CaptureResult<Analysis>>,
    ) {
        let id = self.session.id();
        let limit = self.config.max_ticks();
        let started = self
            .session
            .started_at()
            .unwrap_or_else(|| self.clock.now());

        let max_duration = Duration::from_secs(limit.into());

        // Missed ticks burst so a stalled runtime catches up to the limit
        let mut ticker = time::interval_at(started + TICK_INTERVAL, TICK_INTERVAL);

        let stop = loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(Command::Stop(ack)) => break Ok((StopReason::Manual, Some(ack))),
                    // Controller dropped: wind the session down normally
                    None => break Ok((StopReason::Manual, None)),
                },

                _ = ticker.tick() => {
                    if let Some(elapsed) = self.session.tick() {
                        self.publish();
                        self.emit(PipelineEvent::Tick {
                            session_id: id,
                            elapsed_secs: elapsed,
                            remaining_secs: limit.saturating_sub(elapsed),
                        });

                        let overdue =
                            self.clock.now().saturating_duration_since(started) >= max_duration;
                        if elapsed >= limit || overdue {
                            info!("Session {} reached the {}s limit", id, limit);
                            break Ok((StopReason::TimeLimit, None));
                        }
                    }
                }

                event = device.next_event() => match event {
                    Some(DeviceEvent::Data(fragment)) => {
                        if self.session.on_data_available(fragment) {
                            self.publish();
                        }
                    }
                    Some(DeviceEvent::Error(msg)) => break Err(CaptureError::Acquisition(msg)),
                    None => {
                        break Err(CaptureError::Acquisition("capture stream ended".to_string()))
                    }
                },
            }
        };

        drop(ticker);
        drop(commands);

        let (reason, ack) = match stop {
            Ok(stop) => stop,
            Err(err) => {
                device.release();
                self.fail(err, outcome);
                return;
            }
        };

        let duration = match self.session.begin_stop(self.clock.now()) {
            Ok(duration) => duration,
            Err(e) => {
                device.release();
                self.fail(e.into(), outcome);
                return;
            }
        };
        device.release();
        drop(device);
        self.publish();

        info!(
            "Session {} stopped ({:?}) after {:.1}s",
            id,
            reason,
            duration.as_secs_f64()
        );
        self.emit(PipelineEvent::Stopped {
            session_id: id,
            reason,
            duration_secs: duration.as_secs_f64(),
        });

        if let Some(ack) = ack {
            let _ = ack.send(());
        }

        let artifact = match self.session.begin_processing() {
            Ok(artifact) => artifact,
            Err(err) => {
                self.fail(err, outcome);
                return;
            }
        };
        self.publish();

        let result = self.classifier.classify(&artifact).await;

        if let Err(e) = self.session.complete() {
            self.fail(e.into(), outcome);
            return;
        }
        self.publish();

        let minutes = practice_minutes(artifact.duration());
        self.notifier.notify_practice_time(minutes);

        info!("Session {} complete: {}", id, result);
        self.emit(PipelineEvent::ResultReady {
            session_id: id,
            result,
        });

        let analysis = Analysis {
            session_id: id,
            result,
            duration: artifact.duration(),
            practice_minutes: minutes,
            stop_reason: reason,
            fragment_count: artifact.fragment_count(),
            artifact_bytes: artifact.len(),
            completed_at: Utc::now(),
        };

        if outcome.send(Ok(analysis)).is_err() {
            debug!("Nobody is waiting for the result of session {}", id);
        }
    }

    fn fail(&mut self, err: CaptureError, outcome: oneshot::Sender<CaptureResult<Analysis>>) {
        let id = self.session.id();

        if let Err(e) = self.session.fail() {
            error!("Session {}: {}", id, e);
        }
        self.publish();

        warn!("Session {} failed: {}", id, err);
        self.emit(PipelineEvent::Failed {
            session_id: Some(id),
            error: err.clone(),
        });

        let _ = outcome.send(Err(err));
    }

    fn publish(&self) {
        self.stats.send_replace(self.session.stats());
    }

    fn emit(&self, event: PipelineEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
