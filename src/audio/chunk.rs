use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{CaptureError, CaptureResult};

/// Finalized recording: every fragment concatenated in receipt order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioArtifact {
    bytes: Vec<u8>,
    duration: Duration,
    fragment_count: usize,
}

impl AudioArtifact {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Time between recording start and stop
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Number of fragments that went into this artifact
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Accumulates fragments for one recording
#[derive(Debug, Default)]
pub struct ChunkCollector {
    chunks: Vec<Vec<u8>>,
    total_bytes: usize,
}

impl ChunkCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, fragment: Vec<u8>) {
        self.total_bytes += fragment.len();
        self.chunks.push(fragment);
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Concatenate everything collected so far and clear the collector.
    ///
    /// Fails with `EmptyRecording` when nothing was collected; the collector
    /// is left empty either way.
    pub fn finalize(&mut self, duration: Duration) -> CaptureResult<AudioArtifact> {
        if self.chunks.is_empty() {
            return Err(CaptureError::EmptyRecording);
        }

        let chunks = std::mem::take(&mut self.chunks);
        let fragment_count = chunks.len();
        let mut bytes = Vec::with_capacity(self.total_bytes);
        for chunk in chunks {
            bytes.extend_from_slice(&chunk);
        }
        self.total_bytes = 0;

        debug!(
            "Finalized {} fragments into {} bytes ({:.1}s)",
            fragment_count,
            bytes.len(),
            duration.as_secs_f64()
        );

        Ok(AudioArtifact {
            bytes,
            duration,
            fragment_count,
        })
    }
}
