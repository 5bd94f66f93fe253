//! Review session management for spaced repetition practice.
//! Handles multi-round flashcard review with SM-2 algorithm integration.

use super::LearningCard;
use crate::error::StoreError;
use crate::models::{Quality, SchedulingState};
use crate::store::DeckStore;
use chrono::{DateTime, Utc};

/// Manages a review session with multiple rounds.
/// Cards that aren't mastered (grade < 3) are repeated in subsequent rounds.
#[derive(Debug)]
pub struct ReviewSession {
    pub deck_name: String,
    pub all_cards: Vec<LearningCard>,
    pub current_round_cards: Vec<usize>,
    pub current_index: usize,
    pub show_definition: bool,
    pub round_number: usize,
}

impl ReviewSession {
    /// Creates a new session from the deck's cards that are due at `now`.
    pub fn start(store: &DeckStore, deck_name: &str, now: DateTime<Utc>) -> Result<Self, StoreError> {
        let all_cards: Vec<LearningCard> = store
            .due_cards(deck_name, now)?
            .into_iter()
            .map(|card| LearningCard::new(card.id, card.flashcard.clone()))
            .collect();

        log::debug!(
            "Starting session for '{}' with {} due cards",
            deck_name,
            all_cards.len()
        );

        Ok(Self {
            deck_name: deck_name.to_string(),
            current_round_cards: (0..all_cards.len()).collect(),
            all_cards,
            current_index: 0,
            show_definition: false,
            round_number: 1,
        })
    }

    pub fn current_card(&self) -> Option<&LearningCard> {
        self.current_round_cards
            .get(self.current_index)
            .and_then(|&idx| self.all_cards.get(idx))
    }

    pub fn toggle_definition(&mut self) {
        self.show_definition = !self.show_definition;
    }

    pub fn next_card(&mut self) {
        if self.current_index + 1 < self.current_round_cards.len() {
            self.current_index += 1;
            self.show_definition = false;
        } else {
            self.start_next_round();
        }
    }

    /// Starts a new round with cards that weren't mastered (grade < 3).
    /// If no cards remain, the session is complete.
    fn start_next_round(&mut self) {
        let failed_indices: Vec<usize> = self
            .current_round_cards
            .iter()
            .copied()
            .filter(|&idx| self.all_cards.get(idx).is_some_and(|card| !card.is_learned))
            .collect();

        if !failed_indices.is_empty() {
            self.current_round_cards = failed_indices;
            self.current_index = 0;
            self.show_definition = false;
            self.round_number += 1;
        }
    }

    /// Grades the current card and stores its new SM-2 schedule.
    /// Cards with grade >= 3 are marked as learned for this session.
    /// Returns `Ok(None)` when there is no current card.
    pub fn grade_current_card(
        &mut self,
        store: &mut DeckStore,
        quality: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<SchedulingState>, StoreError> {
        let quality = Quality::new(quality)?;
        let Some(&idx) = self.current_round_cards.get(self.current_index) else {
            return Ok(None);
        };
        let Some(card) = self.all_cards.get_mut(idx) else {
            return Ok(None);
        };

        let next = store.submit_review(card.card_id, i64::from(quality.value()), now)?;

        if quality.is_passing() {
            card.mark_as_learned(now);
        } else {
            card.is_learned = false;
        }
        Ok(Some(next))
    }

    pub fn learned_count(&self) -> usize {
        self.current_round_cards
            .iter()
            .filter(|&&idx| self.all_cards.get(idx).is_some_and(|card| card.is_learned))
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.current_round_cards.len()
    }

    pub fn remaining_count(&self) -> usize {
        self.total_count() - self.learned_count()
    }

    /// Returns true when the current round is empty or fully learned.
    pub fn is_completed(&self) -> bool {
        self.current_round_cards.is_empty() || self.learned_count() == self.total_count()
    }

    pub fn phase_message(&self) -> String {
        if self.round_number == 1 {
            format!("Round {}: {} cards", self.round_number, self.total_count())
        } else {
            format!(
                "Round {} (Review): {} cards to retry",
                self.round_number,
                self.total_count()
            )
        }
    }
}
