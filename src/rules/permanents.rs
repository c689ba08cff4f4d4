//! Weapons and secrets entering and leaving play.

use std::sync::Arc;

use crate::cards::{Card, CardId};
use crate::core::{EntityId, PlayerId};
use crate::effects::{Actor, SelfKind};
use crate::error::{EngineError, EngineResult};
use crate::events::{EventKind, EventPayload};
use crate::undo::{UndoAction, UndoBuilder};
use crate::world::{Secret, Weapon, World};

impl World {
    // === Weapons ===

    /// Equip a new copy of a catalog weapon, replacing the current one.
    pub fn equip_new_weapon(&mut self, player: PlayerId, card: CardId) -> EngineResult<UndoAction> {
        let descr = Arc::clone(self.catalog().require(card)?);
        let id = self.alloc();
        let weapon = Weapon::from_card(id, player, descr)
            .ok_or_else(|| EngineError::invalid(format!("{card} is not a weapon card")))?;
        Ok(self.equip_weapon(weapon))
    }

    /// Equip a weapon. The old weapon's reactions go with it.
    pub(crate) fn equip_weapon(&mut self, weapon: Weapon) -> UndoAction {
        let (player, id) = (weapon.owner(), weapon.id());
        let reactions = weapon.reactions().to_vec();
        tracing::debug!(%player, weapon = %weapon.card_id(), "weapon equipped");

        let mut undo = UndoBuilder::new();
        if let Some(old) = undo.take(self.player_mut(player).replace_weapon(Some(weapon))) {
            undo.add(self.deactivate_reactions(old.id()));
        }
        undo.add(self.activate_reactions(Actor::new(player, id, SelfKind::Weapon), &reactions));
        undo.add(self.apply_auras());
        undo.build()
    }

    /// Remove weapons without durability left.
    pub(crate) fn destroy_broken_weapons(&mut self) -> UndoAction {
        let mut undo = UndoBuilder::new();
        for player in PlayerId::both() {
            if !self.player(player).weapon().is_some_and(|w| w.is_broken()) {
                continue;
            }
            if let Some(broken) = undo.take(self.player_mut(player).replace_weapon(None)) {
                tracing::debug!(%player, weapon = %broken.card_id(), "weapon destroyed");
                undo.add(self.deactivate_reactions(broken.id()));
            }
        }
        undo.build()
    }

    // === Secrets ===

    /// Put a secret card into play. A second copy of a secret already in
    /// play, or one past the secret limit, is dropped.
    pub(crate) fn add_secret(&mut self, player: PlayerId, card: &Card) -> UndoAction {
        let descr = card.descr();
        let secrets = self.player(player).secrets().len();
        if self.player(player).has_secret(descr.id) || secrets >= self.config().max_secrets {
            tracing::debug!(%player, card = %descr.id, "secret not added");
            return UndoAction::Nothing;
        }

        let secret = Secret::new(card.id(), player, Arc::clone(descr));
        let mut undo = UndoBuilder::new();
        undo.add(self.player_mut(player).add_secret(secret));
        undo.add(self.activate_reactions(Actor::new(player, card.id(), SelfKind::Secret), &descr.secret));
        undo.build()
    }

    /// Reveal a secret: fire `secret-revealed`, take the secret out of play
    /// and drop its reactions.
    pub fn reveal_secret(&mut self, player: PlayerId, secret: EntityId) -> UndoAction {
        let Some(card_id) = self
            .player(player)
            .secrets()
            .iter()
            .find(|s| s.id() == secret)
            .map(|s| s.card_id())
        else {
            return UndoAction::Nothing;
        };
        tracing::debug!(%player, card = %card_id, "secret revealed");

        let mut undo = UndoBuilder::new();
        let mut payload = EventPayload::Secret {
            secret,
            card_id,
            owner: player,
        };
        undo.add(self.fire(EventKind::SecretRevealed, &mut payload));
        if let Some(removed) = self.player_mut(player).remove_secret(secret) {
            undo.add(removed.undo);
        }
        undo.add(self.deactivate_reactions(secret));
        undo.build()
    }
}
