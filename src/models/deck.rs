//! Deck is a named, ordered set of cards
use super::CardId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck {
    pub name: String,
    pub card_ids: Vec<CardId>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            card_ids: Vec::new(),
        }
    }
}
