use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::config::SessionConfig;
use super::driver::{Command, SessionDriver};
use super::events::PipelineEvent;
use super::outcome::{Analysis, PendingAnalysis};
use super::session::RecordingSession;
use super::state::SessionState;
use super::stats::SessionStats;
use crate::analysis::{EmotionClassifier, EmotionResult};
use crate::audio::{DeviceGuard, MicrophoneDevice};
use crate::clock::{Clock, SystemClock};
use crate::error::{CaptureError, CaptureResult};
use crate::progress::ProgressNotifier;

const EVENT_CAPACITY: usize = 64;

/// The most recent session, running or finished
struct CurrentSession {
    stats: watch::Receiver<SessionStats>,
    commands: Option<mpsc::Sender<Command>>,
}

impl CurrentSession {
    fn state(&self) -> SessionState {
        self.stats.borrow().state
    }
}

/// Runs recording sessions one at a time: microphone acquisition, the
/// one-second tick with its hard time limit, fragment collection, and
/// hand-off to the classifier.
///
/// Lifecycle events go out on a broadcast channel (see [`subscribe`]); each
/// session's result comes back through the [`PendingAnalysis`] returned by
/// [`request_start`].
///
/// [`subscribe`]: CaptureController::subscribe
/// [`request_start`]: CaptureController::request_start
pub struct CaptureController {
    config: SessionConfig,
    device: Arc<dyn MicrophoneDevice>,
    classifier: Arc<dyn EmotionClassifier>,
    notifier: Arc<dyn ProgressNotifier>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<PipelineEvent>,
    current: Mutex<Option<CurrentSession>>,
}

impl CaptureController {
    pub fn new(
        config: SessionConfig,
        device: Arc<dyn MicrophoneDevice>,
        classifier: Arc<dyn EmotionClassifier>,
        notifier: Arc<dyn ProgressNotifier>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            config,
            device,
            classifier,
            notifier,
            clock: Arc::new(SystemClock),
            events,
            current: Mutex::new(None),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.events.subscribe()
    }

    /// Whether the device can capture audio at all
    pub fn is_supported(&self) -> bool {
        self.device.is_supported()
    }

    /// Snapshot of the most recent session, if any
    pub fn stats(&self) -> Option<SessionStats> {
        self.current().as_ref().map(|s| s.stats.borrow().clone())
    }

    pub fn state(&self) -> Option<SessionState> {
        self.current().as_ref().map(CurrentSession::state)
    }

    /// Start a new session.
    ///
    /// Fails with `SessionAlreadyActive` while another session has not yet
    /// completed or failed, with `UnsupportedCapability` before any device
    /// request, or with the device's refusal.
    pub async fn request_start(&self) -> CaptureResult<PendingAnalysis> {
        let (mut session, stats_tx) = {
            let mut current = self.current();

            if let Some(state) = current.as_ref().map(CurrentSession::state) {
                if state.is_active() {
                    warn!("Rejecting start: a session is already {:?}", state);
                    return Err(CaptureError::SessionAlreadyActive);
                }
            }

            if !self.device.is_supported() {
                warn!("Audio capture is not supported by {}", self.device.name());
                let err = CaptureError::UnsupportedCapability;
                self.emit(PipelineEvent::Failed {
                    session_id: None,
                    error: err.clone(),
                });
                return Err(err);
            }

            let mut session = RecordingSession::new();
            session.begin_request()?;
            let (stats_tx, stats_rx) = watch::channel(session.stats());
            *current = Some(CurrentSession {
                stats: stats_rx,
                commands: None,
            });

            (session, stats_tx)
        };

        let id = session.id();
        info!(
            "Requesting microphone for session {} via {}",
            id,
            self.device.name()
        );

        let acquired = {
            let mut abandoned = AbandonOnDrop::new(&mut session, &stats_tx);
            let acquired = self.device.acquire(&self.config.constraints).await;
            abandoned.disarm();
            acquired
        };

        let device = match acquired {
            Ok(stream) => DeviceGuard::new(stream),
            Err(e) => {
                let err = CaptureError::from(e);
                warn!("Microphone request for session {} failed: {}", id, err);
                session.fail()?;
                stats_tx.send_replace(session.stats());
                self.emit(PipelineEvent::Failed {
                    session_id: Some(id),
                    error: err.clone(),
                });
                return Err(err);
            }
        };

        let (command_tx, command_rx) = mpsc::channel(4);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        if let Some(current) = self.current().as_mut() {
            current.commands = Some(command_tx);
        }

        session.begin_recording(self.clock.now())?;
        stats_tx.send_replace(session.stats());

        info!("Recording session {} started", id);
        self.emit(PipelineEvent::Started { session_id: id });

        let driver = SessionDriver {
            session,
            config: self.config.clone(),
            classifier: Arc::clone(&self.classifier),
            notifier: Arc::clone(&self.notifier),
            clock: Arc::clone(&self.clock),
            events: self.events.clone(),
            stats: stats_tx,
        };
        tokio::spawn(driver.run(device, command_rx, outcome_tx));

        Ok(PendingAnalysis::new(id, outcome_rx))
    }

    /// Stop the current recording.
    ///
    /// Returns once the tick is cancelled and the microphone released.
    /// Returns `false` without doing anything if no session is recording,
    /// including when the time limit already stopped it.
    pub async fn request_stop(&self) -> bool {
        let commands = {
            let current = self.current();
            match current.as_ref() {
                Some(session) if session.state() == SessionState::Recording => {
                    session.commands.clone()
                }
                _ => None,
            }
        };

        let Some(commands) = commands else {
            debug!("Stop requested with no recording in progress");
            return false;
        };

        let (ack_tx, ack_rx) = oneshot::channel();
        if commands.send(Command::Stop(ack_tx)).await.is_err() {
            return false;
        }

        ack_rx.await.is_ok()
    }

    /// Keep a produced result: forwards it to the progress notifier.
    pub fn save_result(&self, analysis: Analysis) -> EmotionResult {
        let result = analysis.result;
        self.notifier
            .notify_emotion_saved(result.label, result.confidence);

        info!("Saved result of session {}: {}", analysis.session_id, result);
        self.emit(PipelineEvent::Saved {
            session_id: analysis.session_id,
            result,
        });

        result
    }

    fn current(&self) -> MutexGuard<'_, Option<CurrentSession>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: PipelineEvent) {
        let _ = self.events.send(event);
    }
}

/// Fails a session left in Requesting when `request_start` is dropped while
/// waiting on the device, so the slot does not stay active forever
struct AbandonOnDrop<'a> {
    session: &'a mut RecordingSession,
    stats: &'a watch::Sender<SessionStats>,
    armed: bool,
}

impl<'a> AbandonOnDrop<'a> {
    fn new(session: &'a mut RecordingSession, stats: &'a watch::Sender<SessionStats>) -> Self {
        Self {
            session,
            stats,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        if !self.armed || self.session.state() != SessionState::Requesting {
            return;
        }

        warn!(
            "Start of session {} cancelled while waiting for the microphone",
            self.session.id()
        );
        if self.session.fail().is_ok() {
            self.stats.send_replace(self.session.stats());
        }
    }
}
