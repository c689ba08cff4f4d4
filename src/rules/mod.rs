//! Public game actions and the turn structure.
//!
//! Every operation here is a method on [`World`](crate::world::World) that
//! returns the inverse of everything it changed. Player actions
//! (`play_card`, `attack`, `end_player_turn`) validate first and fail
//! without side effects; once they start mutating they always complete.
//!
//! ## Key Types
//!
//! - `TargetRequest`: target, choose-one option and board position for a
//!   card play
//! - `GameResult`: whether a match is still running, and who won
//!
//! ## Modules
//!
//! - `play`: playing cards from hand
//! - `combat`: attacks
//! - `summon`: minions entering the board
//! - `permanents`: weapons and secrets
//! - `draw`: drawing and fatigue
//! - `death`: the death sweep run after every action
//! - `turn`: turn start and end
//! - `engine`: match outcome

mod combat;
mod death;
mod draw;
pub mod engine;
mod permanents;
mod play;
mod summon;
mod turn;

pub use engine::GameResult;
pub use play::TargetRequest;
