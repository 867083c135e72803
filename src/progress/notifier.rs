use crate::analysis::EmotionLabel;

/// Receives progress events from the capture pipeline.
///
/// Calls are fire-and-forget: implementations handle their own failures and
/// never call back into the pipeline.
pub trait ProgressNotifier: Send + Sync {
    /// A session completed with this much practice (whole minutes)
    fn notify_practice_time(&self, minutes: u32);

    /// The user chose to keep a produced result
    fn notify_emotion_saved(&self, label: EmotionLabel, confidence: u8);
}
