//! Player-facing game actions and their history records.
//!
//! A `GameAction` is the verb a caller asked for ("play card X at Y",
//! "attack Y with X", "end turn"). The world appends an `ActionRecord`
//! for every accepted action and pops it again when that action is
//! undone, so the history always matches the visible state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::EntityId;
use super::player::PlayerId;

/// A top-level action a player can take.
///
/// ```
/// use ccg_rules::core::{EntityId, GameAction};
///
/// let attack = GameAction::Attack { attacker: EntityId(4), defender: EntityId(1) };
/// assert_eq!(attack.pointers().as_slice(), &[EntityId(4), EntityId(1)]);
/// assert!(GameAction::EndTurn.pointers().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Play a card from hand, optionally at a target.
    PlayCard {
        card: EntityId,
        target: Option<EntityId>,
    },
    /// Attack a character with one of your characters.
    Attack {
        attacker: EntityId,
        defender: EntityId,
    },
    /// End the active player's turn.
    EndTurn,
}

impl GameAction {
    /// Entities this action refers to, in argument order.
    #[must_use]
    pub fn pointers(&self) -> SmallVec<[EntityId; 3]> {
        let mut out = SmallVec::new();
        match self {
            GameAction::PlayCard { card, target } => {
                out.push(*card);
                out.extend(target.iter().copied());
            }
            GameAction::Attack { attacker, defender } => {
                out.push(*attacker);
                out.push(*defender);
            }
            GameAction::EndTurn => {}
        }
        out
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: GameAction,

    /// Turn number when action was taken.
    pub turn: u32,

    /// Sequence number within the match (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: GameAction, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
