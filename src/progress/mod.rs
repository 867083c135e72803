//! Daily practice progress
//!
//! The capture pipeline reports to a [`ProgressNotifier`]; [`ProgressTracker`]
//! is the implementation that keeps a per-day record and the practice
//! companion's mood in a key-value store.

mod companion;
mod daily;
mod notifier;
mod store;
mod tracker;

pub use companion::{Companion, PetMood, HAPPINESS_FLOOR, INITIAL_HAPPINESS, SAD_BELOW, SAVE_BOOST};
pub use daily::DailyProgress;
pub use notifier::ProgressNotifier;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use tracker::{
    spawn_companion_decay, ProgressTracker, SavedEmotion, COMPANION_DECAY_INTERVAL, COMPANION_KEY,
    HISTORY_LIMIT, PROGRESS_KEY,
};
