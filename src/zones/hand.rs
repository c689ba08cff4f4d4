//! A player's hand.

use serde::Serialize;

use crate::cards::Card;
use crate::core::{EntityId, PlayerId};
use crate::undo::{UndoAction, Undoable};

/// Bounded, ordered sequence of cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hand {
    owner: PlayerId,
    capacity: usize,
    cards: Vec<Card>,
}

impl Hand {
    pub fn new(owner: PlayerId, capacity: usize) -> Self {
        Self {
            owner,
            capacity,
            cards: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cards.len() >= self.capacity
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.cards.iter().position(|c| c.id() == id)
    }

    /// Add a card to the right end. A full hand hands the card back.
    pub fn add(&mut self, card: Card) -> Result<UndoAction, Card> {
        if self.is_full() {
            return Err(card);
        }
        let id = card.id();
        self.cards.push(card);
        Ok(UndoAction::RemoveFromHand {
            player: self.owner,
            card: id,
        })
    }

    /// Take a card out of the hand.
    pub fn remove(&mut self, id: EntityId) -> Option<Undoable<Card>> {
        let index = self.index_of(id)?;
        let card = self.cards.remove(index);
        let undo = UndoAction::InsertIntoHand {
            player: self.owner,
            index,
            card: Box::new(card.clone()),
        };
        Some(Undoable::new(card, undo))
    }

    /// Change a card's cost modifier.
    pub fn set_cost_modifier(&mut self, id: EntityId, modifier: i32) -> UndoAction {
        let Some(card) = self.cards.iter_mut().find(|c| c.id() == id) else {
            return UndoAction::Nothing;
        };
        let previous = card.cost_modifier();
        if previous == modifier {
            return UndoAction::Nothing;
        }
        card.set_cost_modifier(modifier);
        UndoAction::RestoreCardCost {
            player: self.owner,
            card: id,
            cost_modifier: previous,
        }
    }

    // === Inverse application ===

    pub(crate) fn take(&mut self, id: EntityId) -> Option<Card> {
        let index = self.index_of(id)?;
        Some(self.cards.remove(index))
    }

    pub(crate) fn insert_at(&mut self, index: usize, card: Card) {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
    }
}
