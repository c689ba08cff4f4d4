//! Reversible actions.
//!
//! Every operation that mutates a [`World`](crate::world::World) returns an
//! [`UndoAction`]: a plain value describing how to put back exactly what
//! the operation changed. Inverses are data rather than closures, so they
//! can be logged, inspected, cloned and serialized.
//!
//! ## Design Philosophy
//!
//! - **Capture only what is needed**: each variant stores the minimum
//!   state to reverse one primitive mutation (a mana snapshot, a removed
//!   card, a registration id), never a copy of the world.
//! - **Compose in reverse**: [`UndoBuilder`] collects inverses in
//!   application order; [`UndoAction::Batch`] undoes them last-first.
//! - **Nothing is cheap**: [`UndoAction::Nothing`] is the identity inverse
//!   returned by every no-op (a full board, an empty selector, a veto).
//!
//! ```
//! use ccg_rules::undo::{UndoAction, UndoBuilder};
//!
//! let mut builder = UndoBuilder::new();
//! builder.add(UndoAction::Nothing);
//! assert!(builder.build().is_nothing());
//! ```

mod apply;

use serde::Serialize;

use crate::cards::Card;
use crate::core::{EntityId, PlayerId};
use crate::events::{EventKind, Registration, RegistrationId};
use crate::world::{Hero, ManaResource, Minion, Secret, Weapon};

/// The inverse of a world mutation.
#[must_use = "dropping an undo action makes the mutation irreversible"]
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub enum UndoAction {
    /// The identity inverse.
    #[default]
    Nothing,

    /// Inverses undone last-first.
    Batch(Vec<UndoAction>),

    // === Player state ===
    RestoreCounters {
        player: PlayerId,
        cards_played: u32,
        minions_played: u32,
    },
    RestoreFatigue {
        player: PlayerId,
        fatigue: i32,
    },
    RestoreMana {
        player: PlayerId,
        mana: ManaResource,
    },
    RestoreHero {
        player: PlayerId,
        hero: Box<Hero>,
    },
    RestoreSpellPower {
        player: PlayerId,
        spell_power: i32,
    },
    PopPlayedCard {
        player: PlayerId,
    },

    // === Board ===
    /// Put back a minion's previous stats; located by id on its owner's board.
    RestoreMinion {
        minion: Box<Minion>,
    },
    ReleaseReservation {
        player: PlayerId,
    },
    Reserve {
        player: PlayerId,
    },
    /// Take a committed minion back out and re-open its reservation.
    Uncommit {
        player: PlayerId,
        minion: EntityId,
    },
    InsertMinion {
        player: PlayerId,
        index: usize,
        minion: Box<Minion>,
    },
    PopGraveyard {
        player: PlayerId,
    },

    // === Hand and deck ===
    RemoveFromHand {
        player: PlayerId,
        card: EntityId,
    },
    InsertIntoHand {
        player: PlayerId,
        index: usize,
        card: Box<Card>,
    },
    RestoreCardCost {
        player: PlayerId,
        card: EntityId,
        cost_modifier: i32,
    },
    ReturnToDeck {
        player: PlayerId,
        card: Box<Card>,
    },
    PopDeck {
        player: PlayerId,
    },

    // === Weapon and secrets ===
    RestoreWeapon {
        player: PlayerId,
        weapon: Option<Box<Weapon>>,
    },
    RemoveSecret {
        player: PlayerId,
        secret: EntityId,
    },
    InsertSecret {
        player: PlayerId,
        index: usize,
        secret: Box<Secret>,
    },

    // === Event registrations ===
    Unregister {
        kind: EventKind,
        id: RegistrationId,
    },
    Reregister {
        registration: Box<Registration>,
    },

    // === Match ===
    RestoreTurn {
        turn: u32,
        active_player: PlayerId,
    },
    PopHistory,
}

impl UndoAction {
    /// True for the identity inverse.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        match self {
            UndoAction::Nothing => true,
            UndoAction::Batch(items) => items.iter().all(UndoAction::is_nothing),
            _ => false,
        }
    }

    /// Number of primitive inverses this action will apply.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        match self {
            UndoAction::Nothing => 0,
            UndoAction::Batch(items) => items.iter().map(UndoAction::primitive_count).sum(),
            _ => 1,
        }
    }
}

/// Accumulates inverses in application order.
#[derive(Debug, Default)]
pub struct UndoBuilder {
    actions: Vec<UndoAction>,
}

impl UndoBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the inverse of the mutation just applied.
    pub fn add(&mut self, action: UndoAction) {
        if !action.is_nothing() {
            self.actions.push(action);
        }
    }

    /// Record an inverse and hand back the mutation's result.
    pub fn take<T>(&mut self, undoable: Undoable<T>) -> T {
        self.add(undoable.undo);
        undoable.value
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Collapse into a single inverse.
    pub fn build(mut self) -> UndoAction {
        match self.actions.len() {
            0 => UndoAction::Nothing,
            1 => self.actions.pop().unwrap_or_default(),
            _ => UndoAction::Batch(self.actions),
        }
    }
}

impl From<UndoBuilder> for UndoAction {
    fn from(builder: UndoBuilder) -> Self {
        builder.build()
    }
}

/// A mutation's result paired with its inverse.
#[must_use]
#[derive(Debug)]
pub struct Undoable<T> {
    pub value: T,
    pub undo: UndoAction,
}

impl<T> Undoable<T> {
    pub fn new(value: T, undo: UndoAction) -> Self {
        Self { value, undo }
    }

    /// A result that changed nothing.
    pub fn unchanged(value: T) -> Self {
        Self {
            value,
            undo: UndoAction::Nothing,
        }
    }
}
