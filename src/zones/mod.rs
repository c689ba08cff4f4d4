//! Per-player card zones: hand, deck and board.
//!
//! ## Key Types
//!
//! - `Hand`: bounded, ordered cards; a full hand refuses new cards
//! - `Deck`: draw pile, top at the end; `ZonePosition` places cards in it
//! - `Board`: minion slots with two-step reservation (`BoardReservation`)
//!
//! Each zone knows its owner so that its mutators can return inverses
//! addressed to the right player.

pub mod board;
pub mod deck;
pub mod hand;

pub use board::{Board, BoardReservation};
pub use deck::{Deck, ZonePosition};
pub use hand::Hand;
