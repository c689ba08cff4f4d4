//! Effect system for card abilities.
//!
//! Effects are the building blocks of card abilities:
//! - `Effect`: what happens (damage, summon, draw, buff, ...)
//! - `Selector` / `EntityFilter`: which characters it happens to
//! - `MultiTargeter`: board-wide damage, atomic or sequential
//! - `Damage`: a signed damage value; every hit goes through the damage
//!   pipeline so reactions can veto or respond to it
//!
//! ## Design Philosophy
//!
//! Effects are plain data interpreted by `World::apply_effect`. They carry
//! no closures, so card definitions can be cloned, compared, serialized and
//! loaded from JSON. Everything an effect does comes back as one composed
//! `UndoAction`.

mod context;
mod damage;
mod effect;
mod multi_target;
mod resolver;
mod targeting;

pub use context::{Actor, EffectContext, SelfKind};
pub use damage::{Damage, DamageSource};
pub use effect::Effect;
pub use multi_target::{CharacterPredicate, MultiTargeter};
pub use targeting::{EntityFilter, Selector, Side, Targets};
