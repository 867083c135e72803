use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Today's practice counters, stored as one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    /// Emotions identified (saved) today
    #[serde(rename = "emotions", default)]
    pub emotions_identified: u32,

    /// Minutes of recorded practice today
    #[serde(rename = "practiceTime", default)]
    pub practice_time_minutes: u32,

    /// Latest quiz accuracy, 0-100
    #[serde(rename = "accuracy", default)]
    pub accuracy_percent: u8,

    /// Day these counters belong to
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl DailyProgress {
    /// Zeroed counters for `today`
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            emotions_identified: 0,
            practice_time_minutes: 0,
            accuracy_percent: 0,
            date: Some(today),
        }
    }

    pub fn is_for(&self, day: NaiveDate) -> bool {
        self.date == Some(day)
    }
}
