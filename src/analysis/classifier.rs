use std::time::Duration;
use tracing::{debug, info};

use super::emotion::{EmotionLabel, EmotionResult};
use super::random::{RandomSource, ThreadRandom};
use crate::audio::AudioArtifact;

/// Produces an emotion for a finalized recording.
///
/// A real model can replace [`SimulatedClassifier`] without touching the
/// capture pipeline.
#[async_trait::async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, artifact: &AudioArtifact) -> EmotionResult;

    /// Get classifier name for logging
    fn name(&self) -> &str;
}

/// Stand-in classifier: waits a visible moment, then picks one of the six
/// labels at random with that label's fixed confidence.
///
/// The artifact content is ignored.
pub struct SimulatedClassifier {
    random: Box<dyn RandomSource>,
    latency: Duration,
}

impl SimulatedClassifier {
    pub fn new(latency: Duration) -> Self {
        Self::with_random(latency, ThreadRandom)
    }

    pub fn with_random(latency: Duration, random: impl RandomSource + 'static) -> Self {
        Self {
            random: Box::new(random),
            latency,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedClassifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait::async_trait]
impl EmotionClassifier for SimulatedClassifier {
    async fn classify(&self, artifact: &AudioArtifact) -> EmotionResult {
        debug!(
            "Analyzing {} bytes ({:.1}s of audio)",
            artifact.len(),
            artifact.duration().as_secs_f64()
        );

        tokio::time::sleep(self.latency).await;

        let labels = EmotionLabel::ALL;
        let label = labels[self.random.index(labels.len()) % labels.len()];
        let result = EmotionResult::new(label, label.simulated_confidence());

        info!("Detected emotion: {}", result);

        result
    }

    fn name(&self) -> &str {
        "simulated classifier"
    }
}
