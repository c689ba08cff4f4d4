//! Event bus for reactive card abilities.
//!
//! Cards react to what happens in a match by registering reactions on the
//! world's [`EventBus`]. The rules fire events at fixed points (a card is
//! about to be played, damage is about to be dealt, a minion is being
//! summoned) and every matching reaction runs, highest priority first.
//!
//! ## Key Components
//!
//! - [`EventKind`] / [`EventPayload`]: the channel and the mutable record a
//!   dispatch carries
//! - [`EventFilter`]: when a reaction applies
//! - [`ReactionAction`] / [`ReactionDef`]: what a reaction does, and the
//!   static definition a card carries
//! - [`EventBus`] / [`Registration`]: priority-ordered channels
//! - [`ReactionParser`]: loads definitions from JSON, type-checked
//!
//! ## Design Philosophy
//!
//! Reactions are data, bound to an owner [`Actor`](crate::effects::Actor)
//! at registration. Registering, unregistering and everything a reaction
//! does return inverses, so a whole dispatch can be undone. Veto is a
//! flag on the payload rather than an early exit: lower-priority reactions
//! still run and can see it.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use ccg_rules::cards::CardRegistry;
//! use ccg_rules::core::{PlayerId, RulesConfig};
//! use ccg_rules::effects::{Actor, Effect, SelfKind};
//! use ccg_rules::events::{EventFilter, EventKind, EventPayload, ReactionAction, ReactionDef};
//! use ccg_rules::world::World;
//!
//! let mut world = World::new(RulesConfig::default(), Arc::new(CardRegistry::new())).unwrap();
//! let hero = world.player(PlayerId::FIRST).hero().id();
//! let owner = Actor::new(PlayerId::FIRST, hero, SelfKind::Hero);
//!
//! // "At the start of your turn, gain 2 armor."
//! let def = ReactionDef::new(
//!     EventKind::TurnStarts,
//!     EventFilter::OwnTurn,
//!     ReactionAction::WithSelf { effect: Effect::GainArmor { amount: 2 } },
//! );
//! let _ = world.register_reaction(owner, &def);
//!
//! let mut payload = EventPayload::Player { player: PlayerId::FIRST };
//! let undo = world.fire(EventKind::TurnStarts, &mut payload);
//! assert_eq!(world.player(PlayerId::FIRST).hero().armor(), 2);
//!
//! world.undo(undo);
//! assert_eq!(world.player(PlayerId::FIRST).hero().armor(), 0);
//! ```

mod condition;
mod dispatch;
mod event;
mod parser;
mod reaction;
mod registry;

pub use condition::EventFilter;
pub use event::{Capabilities, EventKind, EventPayload};
pub use parser::{ParseError, ReactionParser};
pub use reaction::{ReactionAction, ReactionDef};
pub use registry::{EventBus, Priority, Registration, RegistrationId};

pub(crate) use dispatch::Deferred;
