//! Engine error taxonomy.
//!
//! Only two families of failure are errors: bad arguments and illegal
//! state. Both are detected before anything is mutated. Unsatisfiable
//! targets, full boards, empty decks and vetoes are ordinary outcomes and
//! surface as (possibly trivial) undo actions instead.

use thiserror::Error;

use crate::cards::CardId;
use crate::core::{EntityId, PlayerId};

/// Errors returned by fallible engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    // === Invalid argument ===
    /// No entity with this id is in a zone the operation can see.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    /// The catalog has no card with this id.
    #[error("unknown card definition {0}")]
    UnknownCard(CardId),

    /// The card is not in the player's hand.
    #[error("{card} is not in the hand of {player}")]
    CardNotInHand { player: PlayerId, card: EntityId },

    /// Any other out-of-range or malformed argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // === Illegal state ===
    /// The player cannot pay for the card.
    #[error("insufficient mana: {required} required, {available} available")]
    InsufficientMana { required: i32, available: i32 },

    /// The operation is not allowed in the current game state.
    #[error("illegal state: {0}")]
    IllegalState(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Shorthand for [`EngineError::IllegalState`].
    pub fn illegal(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    /// True for the invalid-argument family.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::UnknownEntity(_)
                | Self::UnknownCard(_)
                | Self::CardNotInHand { .. }
                | Self::InvalidArgument(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type EngineResult<T> = Result<T, EngineError>;
