use serde::{Deserialize, Serialize};
use std::fmt;

/// The emotions the practice app can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionLabel {
    Happy,
    Excited,
    Calm,
    Sad,
    Angry,
    Surprised,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 6] = [
        Self::Happy,
        Self::Excited,
        Self::Calm,
        Self::Sad,
        Self::Angry,
        Self::Surprised,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Excited => "Excited",
            Self::Calm => "Calm",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
            Self::Surprised => "Surprised",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Excited => "🤩",
            Self::Calm => "😌",
            Self::Sad => "😢",
            Self::Angry => "😠",
            Self::Surprised => "😲",
        }
    }

    /// Confidence the simulated classifier reports for this label
    pub fn simulated_confidence(self) -> u8 {
        match self {
            Self::Happy => 92,
            Self::Excited => 88,
            Self::Calm => 85,
            Self::Sad => 78,
            Self::Angry => 82,
            Self::Surprised => 90,
        }
    }

    /// Vocal cues that characterize this emotion
    pub fn description(self) -> &'static str {
        match self {
            Self::Happy => "Happy emotions in voice often include higher pitch, faster tempo, and bright tones. Great job recognizing positivity!",
            Self::Excited => "Excitement shows through energetic speech patterns, variable pitch, and animated delivery. You caught the enthusiasm!",
            Self::Calm => "Calm voices are steady and even-paced with controlled breathing. Perfect identification of this peaceful state!",
            Self::Sad => "Sadness typically has lower pitch, slower pace, and softer volume. You recognized these subtle cues well!",
            Self::Angry => "Anger often presents with louder volume, sharper tones, and faster pace. Good catch on these intensity markers!",
            Self::Surprised => "Surprise shows through sudden pitch changes and irregular rhythm. Excellent detection of this quick emotion!",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionResult {
    pub label: EmotionLabel,
    /// Percentage in `0..=100`
    pub confidence: u8,
}

impl EmotionResult {
    /// Confidence is clamped to 100
    pub fn new(label: EmotionLabel, confidence: u8) -> Self {
        Self {
            label,
            confidence: confidence.min(100),
        }
    }
}

impl fmt::Display for EmotionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}% confident)",
            self.label.emoji(),
            self.label,
            self.confidence
        )
    }
}
