//! Damage values and the damage pipeline.
//!
//! All damage and healing to characters flows through
//! [`World::damage_character`]:
//!
//! 1. `prepare-damage` fires with a vetoable request
//! 2. a negative amount heals and fires `character-healed`
//! 3. a positive amount is dealt and fires `damage-dealt`, unless a divine
//!    shield absorbed it

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};
use crate::events::{EventKind, EventPayload};
use crate::undo::{UndoAction, UndoBuilder, Undoable};
use crate::world::{CharacterRef, World};

use super::context::{Actor, SelfKind};

/// Who dealt the damage, for attribution and life steal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSource {
    pub player: PlayerId,
    pub entity: EntityId,
}

/// A signed amount of damage. Negative amounts heal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub source: DamageSource,
    pub amount: i32,
}

impl Damage {
    pub fn new(source: DamageSource, amount: i32) -> Self {
        Self { source, amount }
    }

    #[must_use]
    pub fn is_heal(&self) -> bool {
        self.amount < 0
    }
}

impl From<&Actor> for DamageSource {
    fn from(actor: &Actor) -> Self {
        Self {
            player: actor.player,
            entity: actor.entity,
        }
    }
}

impl World {
    /// Damage dealt by `actor`. Cards add their owner's spell power to
    /// non-negative amounts.
    #[must_use]
    pub fn create_damage(&self, actor: &Actor, amount: i32) -> Damage {
        let bonus = if actor.kind == SelfKind::Card && amount >= 0 {
            self.player(actor.player).spell_power()
        } else {
            0
        };
        Damage::new(DamageSource::from(actor), amount + bonus)
    }

    /// Run one damage or healing instance against a character in play.
    pub fn damage_character(&mut self, damage: Damage, target: EntityId) -> UndoAction {
        let Some(target_owner) = self.locate(target).map(|r| r.owner()) else {
            return UndoAction::Nothing;
        };
        let mut undo = UndoBuilder::new();

        let mut request = EventPayload::DamageRequest {
            damage,
            target,
            target_owner,
            vetoed: false,
        };
        undo.add(self.fire(EventKind::PrepareDamage, &mut request));
        let EventPayload::DamageRequest {
            damage,
            vetoed: false,
            ..
        } = request
        else {
            return undo.build();
        };

        if damage.amount < 0 {
            let healed = undo.take(self.heal_raw(target, -damage.amount));
            if healed > 0 {
                let mut event = EventPayload::Damage {
                    damage: Damage::new(damage.source, healed),
                    target,
                    target_owner,
                };
                undo.add(self.fire(EventKind::CharacterHealed, &mut event));
            }
        } else if damage.amount > 0 {
            let dealt = undo.take(self.take_damage_raw(target, damage.amount));
            if dealt > 0 {
                let mut event = EventPayload::Damage {
                    damage: Damage::new(damage.source, dealt),
                    target,
                    target_owner,
                };
                undo.add(self.fire(EventKind::DamageDealt, &mut event));
            }
        }
        undo.build()
    }

    /// Heal a character through the damage pipeline.
    pub fn heal_character(&mut self, source: DamageSource, amount: i32, target: EntityId) -> UndoAction {
        self.damage_character(Damage::new(source, -amount.abs()), target)
    }

    // === Raw character mutation ===

    pub(crate) fn take_damage_raw(&mut self, target: EntityId, amount: i32) -> Undoable<i32> {
        match self.locate(target) {
            Some(CharacterRef::Hero(owner)) => self
                .player_mut(owner)
                .update_hero(|h| h.take_damage(amount)),
            Some(CharacterRef::Minion { owner, id }) => self
                .player_mut(owner)
                .board_mut()
                .update(id, |m| m.take_damage(amount))
                .unwrap_or_else(|| Undoable::unchanged(0)),
            None => Undoable::unchanged(0),
        }
    }

    pub(crate) fn heal_raw(&mut self, target: EntityId, amount: i32) -> Undoable<i32> {
        match self.locate(target) {
            Some(CharacterRef::Hero(owner)) => self.player_mut(owner).update_hero(|h| h.heal(amount)),
            Some(CharacterRef::Minion { owner, id }) => self
                .player_mut(owner)
                .board_mut()
                .update(id, |m| m.heal(amount))
                .unwrap_or_else(|| Undoable::unchanged(0)),
            None => Undoable::unchanged(0),
        }
    }

    /// Flag a minion for the death sweep. Heroes are not affected.
    pub fn destroy_minion(&mut self, target: EntityId) -> UndoAction {
        match self.locate(target) {
            Some(CharacterRef::Minion { owner, id }) => self
                .player_mut(owner)
                .board_mut()
                .update(id, |m| m.destroy())
                .map(|u| u.undo)
                .unwrap_or_default(),
            _ => UndoAction::Nothing,
        }
    }

    /// Permanent stats for minions; heroes only take the attack, until end
    /// of turn.
    pub(crate) fn buff_character(&mut self, target: EntityId, attack: i32, health: i32) -> UndoAction {
        match self.locate(target) {
            Some(CharacterRef::Hero(owner)) => {
                self.player_mut(owner)
                    .update_hero(|h| h.add_turn_attack(attack))
                    .undo
            }
            Some(CharacterRef::Minion { owner, id }) => self
                .player_mut(owner)
                .board_mut()
                .update(id, |m| m.buff(attack, health))
                .map(|u| u.undo)
                .unwrap_or_default(),
            None => UndoAction::Nothing,
        }
    }
}
