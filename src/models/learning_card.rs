//! Wrapper for cards that tracks progress within a single review session.
use super::{CardId, Flashcard};
use chrono::{DateTime, Utc};

#[derive(Clone, Debug)]
pub struct LearningCard {
    pub card_id: CardId,
    pub flashcard: Flashcard,
    pub is_learned: bool,
    pub last_learned_at: Option<DateTime<Utc>>,
}

impl LearningCard {
    pub fn new(card_id: CardId, flashcard: Flashcard) -> Self {
        Self {
            card_id,
            flashcard,
            is_learned: false,
            last_learned_at: None,
        }
    }

    pub fn mark_as_learned(&mut self, now: DateTime<Utc>) {
        self.is_learned = true;
        self.last_learned_at = Some(now);
    }
}
