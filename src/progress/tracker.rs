use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use super::companion::Companion;
use super::daily::DailyProgress;
use super::notifier::ProgressNotifier;
use super::store::KeyValueStore;
use crate::analysis::EmotionLabel;
use crate::clock::Clock;

/// Key the daily record is stored under
pub const PROGRESS_KEY: &str = "dailyProgress";

/// Key the companion record is stored under
pub const COMPANION_KEY: &str = "petCompanion";

/// Number of saved results kept in the recent history
pub const HISTORY_LIMIT: usize = 5;

/// How often the companion loses one point of happiness
pub const COMPANION_DECAY_INTERVAL: Duration = Duration::from_secs(30);

/// A result the user chose to keep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedEmotion {
    pub label: EmotionLabel,
    pub confidence: u8,
    pub saved_at: DateTime<Utc>,
}

/// Daily progress bookkeeping on top of a key-value store
///
/// Each update reads the whole record, resets it if it belongs to another
/// day, applies the change and writes the whole record back.
pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
    recent: Mutex<VecDeque<SavedEmotion>>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Mutex::new(()),
            recent: Mutex::new(VecDeque::with_capacity(HISTORY_LIMIT)),
        }
    }

    /// Today's record, initializing or resetting the stored one if needed
    pub fn load(&self) -> Result<DailyProgress> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let (progress, stale) = self.read_current()?;
        if stale {
            info!("Starting daily progress for {}", self.clock.today());
            self.write(&progress)?;
        }
        Ok(progress)
    }

    pub fn record_emotions(&self, count: u32) -> Result<DailyProgress> {
        self.update(|p| p.emotions_identified = p.emotions_identified.saturating_add(count))
    }

    pub fn add_practice_minutes(&self, minutes: u32) -> Result<DailyProgress> {
        self.update(|p| p.practice_time_minutes = p.practice_time_minutes.saturating_add(minutes))
    }

    /// Replace today's accuracy (clamped to 100)
    pub fn set_accuracy(&self, percent: u8) -> Result<DailyProgress> {
        self.update(|p| p.accuracy_percent = percent.min(100))
    }

    /// Most recently saved results, newest first
    pub fn recent_emotions(&self) -> Vec<SavedEmotion> {
        let recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        recent.iter().cloned().collect()
    }

    /// The companion as last stored (a new one if none is stored yet)
    pub fn companion(&self) -> Result<Companion> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_companion()
    }

    pub fn raise_happiness(&self, amount: u8) -> Result<Companion> {
        self.update_companion(|c| c.raise(amount))
    }

    pub fn decay_companion(&self) -> Result<Companion> {
        self.update_companion(Companion::decay)
    }

    fn update_companion(&self, apply: impl FnOnce(&mut Companion)) -> Result<Companion> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut companion = self.read_companion()?;
        apply(&mut companion);
        let raw = serde_json::to_string(&companion)?;
        self.store
            .set(COMPANION_KEY, &raw)
            .context("Failed to persist companion")?;
        Ok(companion)
    }

    fn read_companion(&self) -> Result<Companion> {
        match self.store.get(COMPANION_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(companion) => Ok(companion),
                Err(e) => {
                    warn!("Discarding unreadable companion: {}", e);
                    Ok(Companion::default())
                }
            },
            None => Ok(Companion::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut DailyProgress)) -> Result<DailyProgress> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let (mut progress, _) = self.read_current()?;
        apply(&mut progress);
        self.write(&progress)?;
        Ok(progress)
    }

    fn read_current(&self) -> Result<(DailyProgress, bool)> {
        let today = self.clock.today();

        let stored = match self.store.get(PROGRESS_KEY)? {
            Some(raw) => match serde_json::from_str::<DailyProgress>(&raw) {
                Ok(progress) => Some(progress),
                Err(e) => {
                    warn!("Discarding unreadable daily progress: {}", e);
                    None
                }
            },
            None => None,
        };

        match stored {
            Some(progress) if progress.is_for(today) => Ok((progress, false)),
            _ => Ok((DailyProgress::fresh(today), true)),
        }
    }

    fn write(&self, progress: &DailyProgress) -> Result<()> {
        let raw = serde_json::to_string(progress)?;
        self.store
            .set(PROGRESS_KEY, &raw)
            .context("Failed to persist daily progress")
    }
}

impl ProgressNotifier for ProgressTracker {
    fn notify_practice_time(&self, minutes: u32) {
        match self.add_practice_minutes(minutes) {
            Ok(progress) => info!(
                "Practice time today: {} min",
                progress.practice_time_minutes
            ),
            Err(e) => warn!("Failed to record practice time: {:#}", e),
        }
    }

    fn notify_emotion_saved(&self, label: EmotionLabel, confidence: u8) {
        {
            let mut recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
            recent.push_front(SavedEmotion {
                label,
                confidence,
                saved_at: Utc::now(),
            });
            recent.truncate(HISTORY_LIMIT);
        }

        match self.record_emotions(1) {
            Ok(progress) => info!(
                "Saved {} ({}%), {} identified today",
                label, confidence, progress.emotions_identified
            ),
            Err(e) => warn!("Failed to record saved emotion: {:#}", e),
        }

        match self.update_companion(|c| c.on_result_saved(label)) {
            Ok(companion) => debug!(
                "Companion is {} ({}% happy)",
                companion.mood, companion.happiness
            ),
            Err(e) => warn!("Failed to update companion: {:#}", e),
        }
    }
}

/// Decay the companion's happiness every `period` until the task is aborted
pub fn spawn_companion_decay(tracker: Arc<ProgressTracker>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        loop {
            ticker.tick().await;
            match tracker.decay_companion() {
                Ok(companion) => debug!(
                    "Companion decayed to {}% ({})",
                    companion.happiness, companion.mood
                ),
                Err(e) => warn!("Failed to decay companion: {:#}", e),
            }
        }
    })
}
