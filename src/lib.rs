//! # ccg-rules
//!
//! The rules core of a two-player collectible card game: entities, card
//! play, combat, summoning, triggered reactions and turn structure.
//!
//! ## Design Principles
//!
//! 1. **Reversible**: Every mutation returns an [`UndoAction`] describing
//!    its exact inverse. Applying it restores a state whose snapshot is
//!    byte-identical to the one before, so search code can explore a move
//!    and roll it back without cloning the world.
//!
//! 2. **Inverses Are Data**: An undo is a tree of plain enum values, not a
//!    closure. It can be inspected, counted, logged and serialized.
//!
//! 3. **Arena Ownership**: The [`World`] owns every entity. Entities refer
//!    to each other by [`EntityId`] and [`PlayerId`], never by reference.
//!
//! ## Architecture
//!
//! - **Priority Event Bus**: Reactions register per event kind with a
//!   priority. Dispatch walks a persistent snapshot of the channel, so
//!   reactions may register and unregister freely while an event resolves.
//!
//! - **Deferred Death**: Damage only marks minions dead. The death sweep at
//!   the end of each public action removes them and runs deathrattles.
//!
//! - **Seeded Randomness**: One ChaCha RNG per match drives every random
//!   choice; two worlds with the same seed and actions stay identical.
//!
//! ## Modules
//!
//! - `core`: Entity ids, players, configuration, RNG, action records
//! - `error`: The error taxonomy
//! - `undo`: Inverse actions and how they are applied
//! - `cards`: Card definitions, the catalog and cards in zones
//! - `zones`: Hand, deck and board
//! - `world`: The world aggregate, players, characters, weapons, auras
//! - `effects`: Selectors, damage resolution and card effects
//! - `events`: The event bus, reaction definitions and their parser
//! - `rules`: Public actions: play, attack, summon, draw, turns
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use ccg_rules::{CardDescr, CardId, CardRegistry, Effect, PlayerId, RulesConfig, Selector, TargetRequest, World};
//!
//! let mut registry = CardRegistry::new();
//! registry
//!     .register(CardDescr::spell(CardId(1), "Bolt", 3).with_on_play(Effect::damage(2, Selector::OwnHero)))
//!     .unwrap();
//! let mut world = World::new(RulesConfig::default(), Arc::new(registry)).unwrap();
//! let _ = world.set_mana(PlayerId::FIRST, 10, 10);
//! let card = world.add_card_to_hand(PlayerId::FIRST, CardId(1)).unwrap().value.unwrap();
//! let before = world.snapshot().unwrap();
//!
//! let undo = world.play_card(PlayerId::FIRST, card, TargetRequest::new()).unwrap();
//! assert_eq!(world.player(PlayerId::FIRST).hero().health(), 28);
//!
//! world.undo(undo);
//! assert_eq!(world.snapshot().unwrap(), before);
//! ```

pub mod core;
pub mod error;
pub mod undo;
pub mod cards;
pub mod zones;
pub mod world;
pub mod effects;
pub mod events;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, EntityId, GameAction, GameRng, PlayerId, PlayerMap, RulesConfig,
};

pub use crate::error::{EngineError, EngineResult};

pub use crate::undo::{UndoAction, UndoBuilder, Undoable};

pub use crate::cards::{
    Card, CardDescr, CardId, CardRegistry, CardType, Keyword, MinionDescr, PlayRequirement,
    WeaponDescr,
};

pub use crate::zones::{Board, Deck, Hand, ZonePosition};

pub use crate::world::{AuraDef, AuraScope, Character, Hero, Minion, Player, Weapon, World};

pub use crate::effects::{Actor, Damage, Effect, EffectContext, Selector, SelfKind, Side};

pub use crate::events::{
    EventBus, EventFilter, EventKind, EventPayload, ReactionAction, ReactionDef, ReactionParser,
};

pub use crate::rules::{GameResult, TargetRequest};
