use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use super::state::{SessionState, TransitionError};
use super::stats::SessionStats;
use crate::audio::{AudioArtifact, ChunkCollector};
use crate::error::CaptureResult;

/// State of one recording attempt, from the start request to its result.
///
/// This type is synchronous and owns no device or timer; the controller's
/// driver task feeds it events one at a time.
#[derive(Debug)]
pub struct RecordingSession {
    id: Uuid,
    state: SessionState,
    started_at: Option<Instant>,
    started_wall: Option<DateTime<Utc>>,
    elapsed_secs: u32,
    duration: Option<Duration>,
    collector: ChunkCollector,
    fragments_received: usize,
    bytes_received: usize,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            started_at: None,
            started_wall: None,
            elapsed_secs: 0,
            duration: None,
            collector: ChunkCollector::new(),
            fragments_received: 0,
            bytes_received: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Fragments currently waiting to be finalized
    pub fn pending_chunks(&self) -> usize {
        self.collector.chunk_count()
    }

    pub fn begin_request(&mut self) -> Result<(), TransitionError> {
        self.advance(SessionState::Requesting)
    }

    pub fn begin_recording(&mut self, now: Instant) -> Result<(), TransitionError> {
        self.advance(SessionState::Recording)?;
        self.started_at = Some(now);
        self.started_wall = Some(Utc::now());
        Ok(())
    }

    /// Append a fragment from the device. Returns whether it was kept.
    pub fn on_data_available(&mut self, fragment: Vec<u8>) -> bool {
        if self.state != SessionState::Recording {
            debug!("Dropping fragment received while {:?}", self.state);
            return false;
        }
        if fragment.is_empty() {
            return false;
        }

        self.fragments_received += 1;
        self.bytes_received += fragment.len();
        self.collector.append(fragment);
        true
    }

    /// Advance the one-second counter; `None` unless recording
    pub fn tick(&mut self) -> Option<u32> {
        if self.state != SessionState::Recording {
            return None;
        }
        self.elapsed_secs += 1;
        Some(self.elapsed_secs)
    }

    /// Recording -> Stopping. Returns the recorded duration.
    pub fn begin_stop(&mut self, now: Instant) -> Result<Duration, TransitionError> {
        self.advance(SessionState::Stopping)?;
        let duration = self
            .started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default();
        self.duration = Some(duration);
        Ok(duration)
    }

    /// Stopping -> Processing, finalizing the collected fragments.
    ///
    /// An `EmptyRecording` error leaves the session in Processing; the caller
    /// is expected to fail it.
    pub fn begin_processing(&mut self) -> CaptureResult<AudioArtifact> {
        self.advance(SessionState::Processing)?;
        let duration = self.duration.unwrap_or_default();
        self.collector.finalize(duration)
    }

    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.advance(SessionState::Complete)
    }

    pub fn fail(&mut self) -> Result<(), TransitionError> {
        self.advance(SessionState::Failed)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            session_id: self.id,
            state: self.state,
            started_at: self.started_wall,
            elapsed_secs: self.elapsed_secs,
            fragments_count: self.fragments_received,
            bytes_collected: self.bytes_received,
            duration_secs: self.duration.map(|d| d.as_secs_f64()),
        }
    }

    fn advance(&mut self, to: SessionState) -> Result<(), TransitionError> {
        if !self.state.can_transition_to(to) {
            return Err(TransitionError {
                from: self.state,
                to,
            });
        }
        debug!("Session {}: {:?} -> {:?}", self.id, self.state, to);
        self.state = to;
        Ok(())
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}
