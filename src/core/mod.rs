//! Core engine types: entities, players, actions, RNG, configuration.
//!
//! These are the leaf building blocks every other module depends on. None
//! of them know about the world or its zones.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;

pub use entity::{EntityAllocator, EntityId};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::RulesConfig;
pub use action::{ActionRecord, GameAction};
