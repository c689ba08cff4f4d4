//! Summoning minions.
//!
//! A summon fires three events around the minion entering the board:
//!
//! 1. `start-summoning`, before the minion is on the board
//! 2. `on-summon`, once it is in play with its own reactions registered;
//!    those reactions are not fired for their own summon
//! 3. `done-summoning`
//!
//! `on-summon` registrations whose filter failed get a second chance after
//! `done-summoning`, so a reaction can wait for state that the summon
//! itself produces.

use std::sync::Arc;

use crate::cards::CardId;
use crate::core::{EntityId, PlayerId};
use crate::effects::Actor;
use crate::error::{EngineError, EngineResult};
use crate::events::{EventKind, EventPayload};
use crate::undo::{UndoAction, UndoBuilder, Undoable};
use crate::world::{Minion, World};
use crate::zones::BoardReservation;

impl World {
    /// Summon a new minion from the catalog at `location`, then run the
    /// death sweep. A full board makes this a no-op.
    pub fn summon_minion(&mut self, player: PlayerId, card: CardId, location: usize) -> EngineResult<UndoAction> {
        let mut undo = UndoBuilder::new();
        undo.add(self.summon_new(player, card, location)?);
        undo.add(self.end_phase());
        Ok(undo.build())
    }

    /// Summon without the death sweep, for effects in mid-resolution.
    pub fn summon_new(&mut self, player: PlayerId, card: CardId, location: usize) -> EngineResult<UndoAction> {
        self.summon_card_minion(player, card, location).map(|s| s.undo)
    }

    /// Summon and report the new minion's id; `None` when the board is full.
    pub(crate) fn summon_card_minion(
        &mut self,
        player: PlayerId,
        card: CardId,
        location: usize,
    ) -> EngineResult<Undoable<Option<EntityId>>> {
        let descr = Arc::clone(self.catalog().require(card)?);
        let Some(template) = descr.minion.clone() else {
            return Err(EngineError::invalid(format!("{card} is not a minion card")));
        };
        let Some(reserved) = self.player_mut(player).board_mut().try_reserve(location) else {
            tracing::debug!(%player, %card, "board full, summon skipped");
            return Ok(Undoable::unchanged(None));
        };

        let mut undo = UndoBuilder::new();
        let reservation = undo.take(reserved);
        let minion = Minion::new(self.alloc(), player, card, template);
        let id = minion.id();
        undo.add(self.summon_reserved(reservation, minion));
        Ok(Undoable::new(Some(id), undo.build()))
    }

    /// Put a minion into a reserved slot and run the summon events.
    pub(crate) fn summon_reserved(&mut self, reservation: BoardReservation, minion: Minion) -> UndoAction {
        let (owner, id) = (minion.owner(), minion.id());
        let descr = Arc::clone(minion.descr());
        tracing::debug!(%owner, minion = %id, name = %descr.name, "minion summoned");

        let mut undo = UndoBuilder::new();
        let mut payload = EventPayload::Minion { minion: id, owner };
        undo.add(self.fire(EventKind::StartSummoning, &mut payload));

        undo.add(self.player_mut(owner).board_mut().commit(reservation, minion));
        undo.add(self.activate_reactions(Actor::minion(owner, id), &descr.reactions));

        let deferred = undo.take(self.dispatch(EventKind::Summoning, &mut payload));
        undo.add(self.fire(EventKind::DoneSummoning, &mut payload));
        undo.add(self.complete_deferred(deferred, &mut payload));
        undo.add(self.apply_auras());
        undo.build()
    }
}
