//! The death sweep.
//!
//! Damage never removes a minion by itself: it only leaves it dead on the
//! board. The sweep at the end of every public action takes dead minions
//! off the board, fires `minion-killed` and runs their deathrattles. A
//! deathrattle can kill more minions, so the sweep repeats until the board
//! is clean.

use std::sync::Arc;

use crate::core::{EntityId, PlayerId};
use crate::effects::{Actor, EffectContext};
use crate::events::{EventKind, EventPayload};
use crate::undo::{UndoAction, UndoBuilder};
use crate::world::World;

impl World {
    /// Run the sweep, then drop broken weapons and recompute auras.
    pub fn end_phase(&mut self) -> UndoAction {
        let mut undo = UndoBuilder::new();
        undo.add(self.resolve_deaths());
        undo.add(self.destroy_broken_weapons());
        undo.add(self.apply_auras());
        undo.build()
    }

    /// Remove dead minions one at a time, first player's board first.
    pub fn resolve_deaths(&mut self) -> UndoAction {
        let mut undo = UndoBuilder::new();
        while let Some((owner, id)) = self.next_dead_minion() {
            undo.add(self.kill_minion(owner, id));
        }
        undo.build()
    }

    fn next_dead_minion(&self) -> Option<(PlayerId, EntityId)> {
        PlayerId::both().into_iter().find_map(|player| {
            self.player(player)
                .board()
                .iter()
                .find(|m| m.is_dead())
                .map(|m| (player, m.id()))
        })
    }

    fn kill_minion(&mut self, owner: PlayerId, id: EntityId) -> UndoAction {
        let mut undo = UndoBuilder::new();
        let Some(removed) = self.player_mut(owner).board_mut().remove(id) else {
            return UndoAction::Nothing;
        };
        let minion = undo.take(removed);
        let descr = Arc::clone(minion.descr());
        tracing::debug!(%owner, minion = %id, name = %descr.name, "minion died");

        undo.add(self.deactivate_reactions(id));
        undo.add(self.player_mut(owner).bury(minion));

        let mut payload = EventPayload::Minion { minion: id, owner };
        undo.add(self.fire(EventKind::MinionKilled, &mut payload));
        if !descr.deathrattle.is_empty() {
            let ctx = EffectContext::new(Actor::minion(owner, id), None);
            undo.add(self.apply_effects(&descr.deathrattle, &ctx));
        }
        undo.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDescr, CardId, CardRegistry, MinionDescr};
    use crate::core::RulesConfig;
    use crate::effects::{Effect, Selector, SelfKind, Side};
    use crate::events::{EventFilter, ReactionAction, ReactionDef};

    fn world() -> World {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDescr::minion(CardId(1), "Wisp", 0, MinionDescr::new("Wisp", 1, 1)))
            .unwrap();
        // "Deathrattle: deal 1 damage to all enemy minions."
        registry
            .register(CardDescr::minion(
                CardId(2),
                "Bomb",
                2,
                MinionDescr::new("Bomb", 1, 1).with_deathrattle(Effect::damage(1, Selector::minions(Side::Enemy))),
            ))
            .unwrap();
        // "Deathrattle: summon a Wisp."
        registry
            .register(CardDescr::minion(
                CardId(3),
                "Egg",
                1,
                MinionDescr::new("Egg", 0, 1).with_deathrattle(Effect::SummonMinion {
                    card: CardId(1),
                    enemy_side: false,
                }),
            ))
            .unwrap();
        World::new(RulesConfig::default(), Arc::new(registry)).unwrap()
    }

    fn summon(world: &mut World, player: PlayerId, card: u32) -> EntityId {
        let _ = world.summon_minion(player, CardId(card), usize::MAX).unwrap();
        world.player(player).board().minions().last().map(|m| m.id()).unwrap()
    }

    #[test]
    fn test_chained_deathrattles_resolve() {
        let mut world = world();
        let bomb = summon(&mut world, PlayerId::FIRST, 2);
        let _ = summon(&mut world, PlayerId::SECOND, 2);
        let _ = summon(&mut world, PlayerId::SECOND, 1);
        let before = world.snapshot().unwrap();

        let mut undo = UndoBuilder::new();
        undo.add(world.destroy_minion(bomb));
        undo.add(world.end_phase());

        // Both enemy minions die to our bomb; their bomb finds nothing left.
        assert!(world.player(PlayerId::FIRST).board().is_empty());
        assert!(world.player(PlayerId::SECOND).board().is_empty());
        assert_eq!(world.player(PlayerId::SECOND).graveyard().len(), 2);

        world.undo(undo.build());
        assert_eq!(world.snapshot().unwrap(), before);
    }

    #[test]
    fn test_deathrattle_summons_replacement() {
        let mut world = world();
        let egg = summon(&mut world, PlayerId::FIRST, 3);
        let _ = world.destroy_minion(egg);
        let _ = world.end_phase();

        let names: Vec<_> = world.player(PlayerId::FIRST).board().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, vec!["Wisp"]);
        assert_eq!(world.player(PlayerId::FIRST).graveyard()[0].id(), egg);
    }

    #[test]
    fn test_minion_killed_fires_once_per_death() {
        let mut world = world();
        let hero = world.player(PlayerId::FIRST).hero().id();
        let def = ReactionDef::new(
            EventKind::MinionKilled,
            EventFilter::Any,
            ReactionAction::WithSelf { effect: Effect::GainArmor { amount: 1 } },
        );
        let _ = world.register_reaction(Actor::new(PlayerId::FIRST, hero, SelfKind::Hero), &def);
        let first = summon(&mut world, PlayerId::FIRST, 1);
        let second = summon(&mut world, PlayerId::SECOND, 1);

        let _ = world.destroy_minion(first);
        let _ = world.destroy_minion(second);
        let _ = world.end_phase();
        assert_eq!(world.player(PlayerId::FIRST).hero().armor(), 2);
        let _ = world.end_phase();
        assert_eq!(world.player(PlayerId::FIRST).hero().armor(), 2);
    }
}
