//! One player's side of the board.
//!
//! Minions enter the board in two steps. A slot is first *reserved*,
//! which counts against capacity immediately, and later either
//! *committed* (the minion is inserted) or *released*. The reservation is a
//! linear token: it cannot be cloned and must be handed back to `commit`
//! or `release`, so no slot is left in limbo once an action completes.

use serde::Serialize;

use crate::core::{EntityId, PlayerId};
use crate::undo::{UndoAction, UndoBuilder, Undoable};
use crate::world::Minion;

/// A reserved board slot.
#[must_use = "a reservation must be committed or released"]
#[derive(Debug, PartialEq, Eq)]
pub struct BoardReservation {
    player: PlayerId,
    location: usize,
}

impl BoardReservation {
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Requested insertion index; clamped to the board length on commit.
    #[must_use]
    pub fn location(&self) -> usize {
        self.location
    }
}

/// Ordered minion slots with a fixed capacity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Board {
    owner: PlayerId,
    capacity: usize,
    minions: Vec<Minion>,
    reserved: usize,
}

impl Board {
    pub fn new(owner: PlayerId, capacity: usize) -> Self {
        Self {
            owner,
            capacity,
            minions: Vec::new(),
            reserved: 0,
        }
    }

    /// Minions on the board, including dead ones awaiting the sweep.
    #[must_use]
    pub fn len(&self) -> usize {
        self.minions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.minions.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots reserved but not yet committed.
    #[must_use]
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// No slot is free, counting reservations.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.minions.len() + self.reserved >= self.capacity
    }

    #[must_use]
    pub fn minions(&self) -> &[Minion] {
        &self.minions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Minion> {
        self.minions.iter()
    }

    /// Living minions, left to right.
    pub fn alive(&self) -> impl Iterator<Item = &Minion> {
        self.minions.iter().filter(|m| !m.is_dead())
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Minion> {
        self.minions.iter().find(|m| m.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Minion> {
        self.minions.iter_mut().find(|m| m.id() == id)
    }

    #[must_use]
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.minions.iter().position(|m| m.id() == id)
    }

    /// Reserve a slot at `location`, or `None` if the board is full.
    pub fn try_reserve(&mut self, location: usize) -> Option<Undoable<BoardReservation>> {
        if self.is_full() {
            return None;
        }
        self.reserved += 1;
        let reservation = BoardReservation {
            player: self.owner,
            location,
        };
        Some(Undoable::new(
            reservation,
            UndoAction::ReleaseReservation { player: self.owner },
        ))
    }

    /// Put a minion into a reserved slot.
    pub fn commit(&mut self, reservation: BoardReservation, minion: Minion) -> UndoAction {
        debug_assert_eq!(reservation.player, self.owner);
        self.reserved = self.reserved.saturating_sub(1);
        let index = reservation.location.min(self.minions.len());
        let id = minion.id();
        self.minions.insert(index, minion);
        UndoAction::Uncommit {
            player: self.owner,
            minion: id,
        }
    }

    /// Give a reserved slot back without using it.
    pub fn release(&mut self, reservation: BoardReservation) -> UndoAction {
        debug_assert_eq!(reservation.player, self.owner);
        self.reserved = self.reserved.saturating_sub(1);
        UndoAction::Reserve { player: self.owner }
    }

    /// Take a minion off the board.
    pub fn remove(&mut self, id: EntityId) -> Option<Undoable<Minion>> {
        let index = self.index_of(id)?;
        let minion = self.minions.remove(index);
        let undo = UndoAction::InsertMinion {
            player: self.owner,
            index,
            minion: Box::new(minion.clone()),
        };
        Some(Undoable::new(minion, undo))
    }

    /// Mutate one minion, recording its previous state.
    pub(crate) fn update<R>(
        &mut self,
        id: EntityId,
        change: impl FnOnce(&mut Minion) -> R,
    ) -> Option<Undoable<R>> {
        let minion = self.get_mut(id)?;
        let before = minion.clone();
        let value = change(minion);
        let undo = if *minion == before {
            UndoAction::Nothing
        } else {
            UndoAction::RestoreMinion {
                minion: Box::new(before),
            }
        };
        Some(Undoable::new(value, undo))
    }

    fn update_all(&mut self, change: impl Fn(&mut Minion)) -> UndoAction {
        let mut result = UndoBuilder::new();
        for minion in &mut self.minions {
            let before = minion.clone();
            change(minion);
            if *minion != before {
                result.add(UndoAction::RestoreMinion {
                    minion: Box::new(before),
                });
            }
        }
        result.build()
    }

    /// Start-of-turn refresh of every minion.
    pub fn refresh(&mut self) -> UndoAction {
        self.update_all(Minion::refresh)
    }

    /// End-of-turn refresh of every minion.
    pub fn refresh_end_of_turn(&mut self) -> UndoAction {
        self.update_all(Minion::refresh_end_of_turn)
    }

    // === Inverse application ===

    pub(crate) fn restore_minion(&mut self, minion: Minion) {
        if let Some(slot) = self.get_mut(minion.id()) {
            *slot = minion;
        }
    }

    pub(crate) fn uncommit(&mut self, id: EntityId) {
        if let Some(index) = self.index_of(id) {
            self.minions.remove(index);
            self.reserved += 1;
        }
    }

    pub(crate) fn insert_at(&mut self, index: usize, minion: Minion) {
        let index = index.min(self.minions.len());
        self.minions.insert(index, minion);
    }

    pub(crate) fn add_reservation(&mut self) {
        self.reserved += 1;
    }

    pub(crate) fn drop_reservation(&mut self) {
        self.reserved = self.reserved.saturating_sub(1);
    }
}
