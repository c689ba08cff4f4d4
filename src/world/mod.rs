//! Entity and resource model.
//!
//! ## Key Types
//!
//! - `World`: root aggregate owning both players, the event bus, the RNG
//!   and the action history
//! - `Player`: hero, zones, mana, weapon, secrets and turn counters
//! - `Hero` / `Minion`: the two character kinds, viewed uniformly through
//!   `Character` and the `Ownable` / `Damageable` / `Attacker` traits
//! - `ManaResource`: crystals, spendable mana and overload
//! - `Weapon` / `Secret`: the other permanents
//! - `AuraDef`: continuous stat adjustments recomputed by `apply_auras`

pub mod aura;
pub mod character;
pub mod equipment;
pub mod mana;
pub mod player;
#[allow(clippy::module_inception)]
mod world;

pub use aura::{AuraDef, AuraScope};
pub use character::{Attacker, Character, CharacterRef, Damageable, Hero, Minion, Ownable};
pub use equipment::{Secret, Weapon};
pub use mana::ManaResource;
pub use player::Player;
pub use world::World;
