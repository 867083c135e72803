use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of the index used to pick a simulated result
pub trait RandomSource: Send + Sync {
    /// Uniformly distributed index in `0..len`; `len` is never zero
    fn index(&self, len: usize) -> usize;
}

/// Thread-local RNG from `rand`
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always returns the same index (wrapped into range)
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn index(&self, len: usize) -> usize {
        self.0 % len
    }
}

/// Walks through a fixed list of indices, repeating the last one
#[derive(Debug)]
pub struct SequenceRandom {
    picks: Vec<usize>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    pub fn new(picks: Vec<usize>) -> Self {
        Self {
            picks,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for SequenceRandom {
    fn index(&self, len: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }
        let at = self
            .cursor
            .fetch_add(1, Ordering::SeqCst)
            .min(self.picks.len() - 1);
        self.picks[at] % len
    }
}
