// Shared helpers for integration tests
#![allow(dead_code)]

use emotion_practice::analysis::{EmotionLabel, FixedRandom, SimulatedClassifier};
use emotion_practice::audio::{MicrophoneDevice, SimulatedMicrophone};
use emotion_practice::progress::ProgressNotifier;
use emotion_practice::{CaptureController, PipelineEvent, SessionConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

/// Notifier that remembers every call
#[derive(Default)]
pub struct RecordingNotifier {
    practice: Mutex<Vec<u32>>,
    saved: Mutex<Vec<(EmotionLabel, u8)>>,
}

impl RecordingNotifier {
    pub fn practice_calls(&self) -> Vec<u32> {
        self.practice.lock().unwrap().clone()
    }

    pub fn saved(&self) -> Vec<(EmotionLabel, u8)> {
        self.saved.lock().unwrap().clone()
    }
}

impl ProgressNotifier for RecordingNotifier {
    fn notify_practice_time(&self, minutes: u32) {
        self.practice.lock().unwrap().push(minutes);
    }

    fn notify_emotion_saved(&self, label: EmotionLabel, confidence: u8) {
        self.saved.lock().unwrap().push((label, confidence));
    }
}

pub const ANALYSIS_LATENCY: Duration = Duration::from_millis(1500);

/// Controller whose classifier always picks `EmotionLabel::ALL[pick]`
pub fn controller(
    mic: Arc<SimulatedMicrophone>,
    pick: usize,
) -> (CaptureController, Arc<RecordingNotifier>) {
    controller_with_device(mic, pick)
}

pub fn controller_with_device(
    device: Arc<dyn MicrophoneDevice>,
    pick: usize,
) -> (CaptureController, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let classifier = Arc::new(SimulatedClassifier::with_random(
        ANALYSIS_LATENCY,
        FixedRandom(pick),
    ));
    let controller = CaptureController::new(
        SessionConfig::default(),
        device,
        classifier,
        notifier.clone(),
    );
    (controller, notifier)
}

/// Everything currently buffered on an event receiver
pub fn drain(events: &mut broadcast::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}
