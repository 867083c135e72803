use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::EmotionLabel;

/// Happiness a new companion starts with
pub const INITIAL_HAPPINESS: u8 = 75;

/// Happiness gained when a result is saved
pub const SAVE_BOOST: u8 = 2;

/// Decay never takes happiness below this
pub const HAPPINESS_FLOOR: u8 = 20;

/// Below this level a decay leaves the companion sad
pub const SAD_BELOW: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetMood {
    Excited,
    Happy,
    Neutral,
    Sad,
}

impl PetMood {
    /// Mood shown after happiness goes up
    pub fn for_happiness(happiness: u8) -> Self {
        if happiness >= 80 {
            Self::Excited
        } else if happiness >= 50 {
            Self::Happy
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for PetMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Excited => "excited",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Sad => "sad",
        };
        f.write_str(name)
    }
}

/// The practice companion's happiness (0-100) and current mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Companion {
    pub happiness: u8,
    pub mood: PetMood,
}

impl Default for Companion {
    fn default() -> Self {
        Self {
            happiness: INITIAL_HAPPINESS,
            mood: PetMood::Happy,
        }
    }
}

impl Companion {
    /// Raise happiness (capped at 100) and pick the mood for the new level
    pub fn raise(&mut self, amount: u8) {
        self.happiness = self.happiness.saturating_add(amount).min(100);
        self.mood = PetMood::for_happiness(self.happiness);
    }

    /// One step of decay. The mood only changes once the companion turns sad.
    pub fn decay(&mut self) {
        self.happiness = self.happiness.saturating_sub(1).max(HAPPINESS_FLOOR);
        if self.happiness < SAD_BELOW {
            self.mood = PetMood::Sad;
        }
    }

    /// A result was saved: happier, and mirroring an excited result
    pub fn on_result_saved(&mut self, label: EmotionLabel) {
        self.raise(SAVE_BOOST);
        self.mood = match label {
            EmotionLabel::Excited => PetMood::Excited,
            _ => PetMood::Happy,
        };
    }
}
