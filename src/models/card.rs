//! A stored flashcard together with its scheduling state.
use super::{Flashcard, SchedulingState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type CardId = u64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub deck_name: String,
    pub flashcard: Flashcard,
    pub schedule: SchedulingState,
    /// Stamped by the store when a review is submitted.
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl Card {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.schedule.is_due(now)
    }
}
