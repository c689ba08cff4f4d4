//! Continuous stat auras.
//!
//! Auras are never applied incrementally. After every resolution step the
//! full set of aura contributions is recomputed from the board and written
//! back, so adding, moving or killing an aura source cannot leave stale
//! buffs behind.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};
use crate::undo::{UndoAction, UndoBuilder};

use super::World;

/// Which characters an aura applies to, relative to its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuraScope {
    OwnMinions,
    OtherOwnMinions,
    AdjacentMinions,
    EnemyMinions,
    AllMinions,
    /// Attack for the owner's hero.
    OwnHero,
}

/// A stat aura carried by a minion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuraDef {
    pub scope: AuraScope,
    pub attack: i32,
    pub health: i32,
}

impl AuraDef {
    pub fn new(scope: AuraScope, attack: i32, health: i32) -> Self {
        Self {
            scope,
            attack,
            health,
        }
    }
}

/// A living aura source, flattened out of the boards.
struct Source {
    owner: PlayerId,
    id: EntityId,
    index: usize,
    aura: AuraDef,
}

impl Source {
    fn covers_minion(&self, owner: PlayerId, id: EntityId, index: usize) -> bool {
        let friendly = owner == self.owner;
        match self.aura.scope {
            AuraScope::OwnMinions => friendly,
            AuraScope::OtherOwnMinions => friendly && id != self.id,
            AuraScope::AdjacentMinions => friendly && index.abs_diff(self.index) == 1,
            AuraScope::EnemyMinions => !friendly,
            AuraScope::AllMinions => true,
            AuraScope::OwnHero => false,
        }
    }
}

impl World {
    /// Recompute every aura-derived value: minion aura stats, hero attack
    /// (weapon plus hero auras) and spell power.
    pub fn apply_auras(&mut self) -> UndoAction {
        let mut sources = Vec::new();
        for (owner, player) in self.players().iter() {
            for (index, minion) in player.board().iter().enumerate() {
                if let (false, Some(aura)) = (minion.is_dead(), minion.descr().aura) {
                    sources.push(Source {
                        owner,
                        id: minion.id(),
                        index,
                        aura,
                    });
                }
            }
        }

        let mut undo = UndoBuilder::new();
        for owner in PlayerId::both() {
            let targets: Vec<(usize, EntityId)> = self
                .player(owner)
                .board()
                .iter()
                .enumerate()
                .filter(|(_, m)| !m.is_dead())
                .map(|(index, m)| (index, m.id()))
                .collect();
            for (index, id) in targets {
                let (attack, health) = sources
                    .iter()
                    .filter(|s| s.covers_minion(owner, id, index))
                    .fold((0, 0), |(a, h), s| (a + s.aura.attack, h + s.aura.health));
                if let Some(change) = self
                    .player_mut(owner)
                    .board_mut()
                    .update(id, |m| m.set_aura(attack, health))
                {
                    undo.add(change.undo);
                }
            }

            let hero_attack = self.player(owner).weapon().map_or(0, |w| w.attack())
                + sources
                    .iter()
                    .filter(|s| s.owner == owner && s.aura.scope == AuraScope::OwnHero)
                    .map(|s| s.aura.attack)
                    .sum::<i32>();
            let spell_power: i32 = self
                .player(owner)
                .board()
                .alive()
                .map(|m| m.spell_power())
                .sum();

            let player = self.player_mut(owner);
            undo.take(player.update_hero(|h| h.set_aura_attack(hero_attack)));
            undo.add(player.set_spell_power(spell_power));
        }
        undo.build()
    }
}
