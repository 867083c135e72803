//! Emotion classification
//!
//! The pipeline only depends on the [`EmotionClassifier`] trait. The shipped
//! implementation is a simulation with injectable randomness.

mod classifier;
mod emotion;
mod random;

pub use classifier::{EmotionClassifier, SimulatedClassifier};
pub use emotion::{EmotionLabel, EmotionResult};
pub use random::{FixedRandom, RandomSource, SequenceRandom, ThreadRandom};
