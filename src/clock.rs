//! Time sources used by the pipeline and the progress tracker.
//!
//! Monotonic instants come from `tokio::time`, so a paused test runtime
//! controls both the session ticks and the measured recording duration.

use chrono::{Local, NaiveDate};
use std::sync::Mutex;
use tokio::time::Instant;

pub trait Clock: Send + Sync {
    /// Monotonic "now" used for recording start/stop timestamps
    fn now(&self) -> Instant {
        Instant::now()
    }

    /// Calendar day used as the daily progress key
    fn today(&self) -> NaiveDate;
}

/// Local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a settable calendar day
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set_today(&self, today: NaiveDate) {
        let mut guard = self.today.lock().unwrap_or_else(|e| e.into_inner());
        *guard = today;
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(|e| e.into_inner())
    }
}
