//! In-memory repository of decks and cards
//!
//! Handles deck and card CRUD, due-card selection, and applying reviews
//! through the SM-2 scheduler. Callers hold the store and pass it by
//! reference; every mutation takes `&mut self`, so a card's schedule has a
//! single writer at a time.

use crate::error::StoreError;
use crate::models::sm2::Scheduler;
use crate::models::{Card, CardId, Deck, Flashcard, SchedulingState};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Default)]
pub struct DeckStore {
    scheduler: Scheduler,
    decks: Vec<Deck>,
    cards: HashMap<CardId, Card>,
    next_id: CardId,
}

impl DeckStore {
    pub fn new(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            ..Self::default()
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Creates a new, empty deck
    pub fn new_deck(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StoreError::EmptyField("deck name"));
        }
        if self.deck(name).is_some() {
            return Err(StoreError::DeckAlreadyExists(name.to_string()));
        }

        self.decks.push(Deck::new(name));
        log::info!("Deck '{}' created", name);
        Ok(())
    }

    /// Removes a deck with all of its cards. Returns the number of cards removed.
    pub fn remove_deck(&mut self, name: &str) -> Result<usize> {
        let index = self
            .decks
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| StoreError::DeckNotFound(name.to_string()))?;

        let deck = self.decks.remove(index);
        for id in &deck.card_ids {
            self.cards.remove(id);
        }

        let removed = deck.card_ids.len();
        log::info!("Deck '{}' removed with {} cards", name, removed);
        Ok(removed)
    }

    pub fn deck(&self, name: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.name == name)
    }

    /// Deck names in creation order
    pub fn deck_names(&self) -> Vec<&str> {
        self.decks.iter().map(|d| d.name.as_str()).collect()
    }

    /// Adds a flashcard to a deck and initializes its SM-2 state
    ///
    /// A new card is due immediately. If the deck already has a card with
    /// the same term, that card's id is returned and nothing changes.
    pub fn add_flashcard(
        &mut self,
        deck_name: &str,
        term: &str,
        definition: &str,
        now: DateTime<Utc>,
    ) -> Result<CardId> {
        if term.trim().is_empty() {
            return Err(StoreError::EmptyField("term"));
        }
        if definition.trim().is_empty() {
            return Err(StoreError::EmptyField("definition"));
        }

        let deck_index = self
            .decks
            .iter()
            .position(|d| d.name == deck_name)
            .ok_or_else(|| StoreError::DeckNotFound(deck_name.to_string()))?;

        let existing = self.decks[deck_index]
            .card_ids
            .iter()
            .copied()
            .find(|id| self.cards.get(id).is_some_and(|c| c.flashcard.term == term));
        if let Some(id) = existing {
            log::warn!("Term '{}' already exists in deck '{}', ignoring", term, deck_name);
            return Ok(id);
        }

        self.next_id += 1;
        let id = self.next_id;
        let card = Card {
            id,
            deck_name: deck_name.to_string(),
            flashcard: Flashcard::new(term, definition),
            schedule: self.scheduler.initial_state(now),
            last_reviewed_at: None,
        };

        self.cards.insert(id, card);
        self.decks[deck_index].card_ids.push(id);
        Ok(id)
    }

    pub fn remove_card(&mut self, id: CardId) -> Result<Card> {
        let card = self.cards.remove(&id).ok_or(StoreError::CardNotFound(id))?;
        if let Some(deck) = self.decks.iter_mut().find(|d| d.name == card.deck_name) {
            deck.card_ids.retain(|&c| c != id);
        }
        Ok(card)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// All cards of a deck, in insertion order
    pub fn cards_for_deck(&self, deck_name: &str) -> Result<Vec<&Card>> {
        let deck = self
            .deck(deck_name)
            .ok_or_else(|| StoreError::DeckNotFound(deck_name.to_string()))?;

        Ok(deck
            .card_ids
            .iter()
            .filter_map(|id| self.cards.get(id))
            .collect())
    }

    /// Cards due for review in a deck
    ///
    /// Returns cards whose next review is at or before `now`,
    /// ordered by next review (oldest first).
    pub fn due_cards(&self, deck_name: &str, now: DateTime<Utc>) -> Result<Vec<&Card>> {
        let mut due: Vec<&Card> = self
            .cards_for_deck(deck_name)?
            .into_iter()
            .filter(|c| c.is_due(now))
            .collect();

        due.sort_by_key(|c| (c.schedule.next_review_at, c.id));
        Ok(due)
    }

    pub fn due_count(&self, deck_name: &str, now: DateTime<Utc>) -> Result<usize> {
        Ok(self.due_cards(deck_name, now)?.len())
    }

    /// Applies one review to a card and stores the new schedule
    pub fn submit_review(
        &mut self,
        id: CardId,
        quality: i64,
        now: DateTime<Utc>,
    ) -> Result<SchedulingState> {
        let card = self.cards.get_mut(&id).ok_or(StoreError::CardNotFound(id))?;
        let next = self.scheduler.review(&card.schedule, quality, now)?;

        log::debug!(
            "Card {} graded {}: reps {} -> {}, EF {:.2} -> {:.2}, interval {} -> {} days",
            id,
            quality,
            card.schedule.repetitions,
            next.repetitions,
            card.schedule.easiness_factor,
            next.easiness_factor,
            card.schedule.interval_days,
            next.interval_days
        );

        card.schedule = next.clone();
        card.last_reviewed_at = Some(now);
        Ok(next)
    }
}
