//! A player's draw pile. The top of the deck is the end of the vector.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{GameRng, PlayerId};
use crate::undo::{UndoAction, Undoable};

/// Position for inserting a card into the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Next card to be drawn.
    Top,
    /// Last card to be drawn.
    Bottom,
    /// Insert at a specific index (0 = bottom).
    Index(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Deck {
    owner: PlayerId,
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(owner: PlayerId) -> Self {
        Self {
            owner,
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

    /// Cards from bottom to top.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Pop the top card, or `None` when the deck is empty.
    pub fn draw(&mut self) -> Option<Undoable<Card>> {
        let card = self.cards.pop()?;
        let undo = UndoAction::ReturnToDeck {
            player: self.owner,
            card: Box::new(card.clone()),
        };
        Some(Undoable::new(card, undo))
    }

    /// Put a card on top, to be drawn next.
    pub fn put_top(&mut self, card: Card) -> UndoAction {
        self.cards.push(card);
        UndoAction::PopDeck { player: self.owner }
    }

    /// Setup: place a card at a position.
    pub fn put(&mut self, card: Card, position: ZonePosition) {
        match position {
            ZonePosition::Top => self.cards.push(card),
            ZonePosition::Bottom => self.cards.insert(0, card),
            ZonePosition::Index(i) => {
                let idx = i.min(self.cards.len());
                self.cards.insert(idx, card);
            }
        }
    }

    /// Setup: shuffle with the world RNG.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }
}
