//! Effect resolution - executing effects on the world.
//!
//! Resolution never fails. An empty selection, a full board or a full hand
//! turns an effect into a no-op that returns [`UndoAction::Nothing`]. Card
//! references are checked when the catalog is validated; one that still
//! fails to resolve here is logged and skipped.

use crate::error::EngineResult;
use crate::undo::{UndoAction, UndoBuilder};
use crate::world::World;

use super::context::EffectContext;
use super::damage::DamageSource;
use super::effect::Effect;
use super::targeting::EntityFilter;

impl World {
    /// Apply one effect on behalf of `ctx.actor`.
    pub fn apply_effect(&mut self, effect: &Effect, ctx: &EffectContext) -> UndoAction {
        let player = ctx.player();
        match effect {
            Effect::Damage { amount, targets } => {
                let damage = self.create_damage(&ctx.actor, *amount);
                let mut undo = UndoBuilder::new();
                for target in targets.select(self, ctx) {
                    undo.add(self.damage_character(damage, target));
                }
                undo.build()
            }
            Effect::Heal { amount, targets } => {
                let source = DamageSource::from(&ctx.actor);
                let mut undo = UndoBuilder::new();
                for target in targets.select(self, ctx) {
                    undo.add(self.heal_character(source, *amount, target));
                }
                undo.build()
            }
            Effect::DamageAll { amount, targeter } => {
                self.deal_multi_damage(targeter, &ctx.actor, *amount)
            }
            Effect::ThrowBombs { count, targets } => {
                let bomb = self.create_damage(&ctx.actor, 1);
                let mut undo = UndoBuilder::new();
                for _ in 0..*count {
                    let candidates = targets.select(self, ctx);
                    let Some(&target) = EntityFilter::Random.apply(self, ctx, candidates).first() else {
                        break;
                    };
                    undo.add(self.damage_character(bomb, target));
                }
                undo.build()
            }
            Effect::Destroy { targets } => {
                let mut undo = UndoBuilder::new();
                for target in targets.select(self, ctx) {
                    undo.add(self.destroy_minion(target));
                }
                undo.build()
            }
            Effect::Buff {
                attack,
                health,
                targets,
            } => {
                let mut undo = UndoBuilder::new();
                for target in targets.select(self, ctx) {
                    undo.add(self.buff_character(target, *attack, *health));
                }
                undo.build()
            }
            Effect::GainArmor { amount } => {
                self.player_mut(player)
                    .update_hero(|h| h.gain_armor(*amount))
                    .undo
            }
            Effect::DrawCards { count } => {
                let mut undo = UndoBuilder::new();
                for _ in 0..*count {
                    undo.add(self.draw_card(player));
                }
                undo.build()
            }
            Effect::AddCardToHand { card } => {
                let added = self.add_card_to_hand(player, *card).map(|u| u.undo);
                skip_on_error(added, "add card to hand")
            }
            Effect::ReduceHandCost { amount } => {
                let cards: Vec<_> = self
                    .player(player)
                    .hand()
                    .iter()
                    .map(|c| (c.id(), c.cost_modifier()))
                    .collect();
                let mut undo = UndoBuilder::new();
                let hand = self.player_mut(player).hand_mut();
                for (id, modifier) in cards {
                    undo.add(hand.set_cost_modifier(id, modifier - amount));
                }
                undo.build()
            }
            Effect::GainMana { amount } => {
                let max_mana = self.config().max_mana;
                let gained = self.player_mut(player).update_mana(|m| {
                    m.gain(*amount, max_mana);
                    Ok(())
                });
                skip_on_error(gained, "gain mana")
            }
            Effect::SummonMinion { card, enemy_side } => {
                let side = if *enemy_side { player.opponent() } else { player };
                let summoned = self.summon_new(side, *card, usize::MAX);
                skip_on_error(summoned, "summon minion")
            }
            Effect::EquipWeapon { card } => {
                let equipped = self.equip_new_weapon(player, *card);
                skip_on_error(equipped, "equip weapon")
            }
            Effect::ForTargets { targets, effect } => {
                let mut undo = UndoBuilder::new();
                for target in targets.select(self, ctx) {
                    undo.add(self.apply_effect(effect, &ctx.retarget(Some(target))));
                }
                undo.build()
            }
            Effect::Batch { effects } => self.apply_effects(effects, ctx),
        }
    }

    /// Apply effects in order.
    pub fn apply_effects(&mut self, effects: &[Effect], ctx: &EffectContext) -> UndoAction {
        let mut undo = UndoBuilder::new();
        for effect in effects {
            undo.add(self.apply_effect(effect, ctx));
        }
        undo.build()
    }
}

fn skip_on_error(result: EngineResult<UndoAction>, what: &str) -> UndoAction {
    result.unwrap_or_else(|error| {
        tracing::warn!(%error, effect = what, "effect skipped");
        UndoAction::Nothing
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDescr, CardId, CardRegistry, MinionDescr, WeaponDescr};
    use crate::core::{EntityId, PlayerId, RulesConfig};
    use crate::effects::{Actor, Selector, SelfKind, Side};
    use std::sync::Arc;

    fn world() -> World {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDescr::minion(CardId(1), "Wisp", 0, MinionDescr::new("Wisp", 1, 1)))
            .unwrap();
        registry
            .register(CardDescr::minion(CardId(2), "Yeti", 4, MinionDescr::new("Yeti", 4, 5)))
            .unwrap();
        registry
            .register(CardDescr::weapon(CardId(3), "Axe", 2, WeaponDescr::new(3, 2)))
            .unwrap();
        registry.register(CardDescr::spell(CardId(4), "Coin", 0)).unwrap();
        registry
            .register(CardDescr::minion(
                CardId(5),
                "Kobold",
                2,
                MinionDescr::new("Kobold", 2, 2).with_spell_power(1),
            ))
            .unwrap();
        World::new(RulesConfig::default().with_seed(3), Arc::new(registry)).unwrap()
    }

    fn hero_ctx(world: &World, target: Option<EntityId>) -> EffectContext {
        let hero = world.player(PlayerId::FIRST).hero().id();
        EffectContext::new(Actor::new(PlayerId::FIRST, hero, SelfKind::Hero), target)
    }

    #[test]
    fn test_batch_undo_restores_snapshot() {
        let mut world = world();
        let _ = world.summon_minion(PlayerId::SECOND, CardId(2), 0).unwrap();
        let before = world.snapshot().unwrap();
        let ctx = hero_ctx(&world, None);

        let effect = Effect::Batch {
            effects: vec![
                Effect::damage(2, Selector::minions(Side::Enemy)),
                Effect::GainArmor { amount: 4 },
                Effect::SummonMinion { card: CardId(1), enemy_side: false },
                Effect::EquipWeapon { card: CardId(3) },
                Effect::AddCardToHand { card: CardId(4) },
                Effect::Buff { attack: 1, health: 1, targets: Selector::minions(Side::Own) },
            ],
        };
        let undo = world.apply_effect(&effect, &ctx);

        let me = world.player(PlayerId::FIRST);
        assert_eq!(me.hero().armor(), 4);
        assert_eq!(me.board().len(), 1);
        assert_eq!(me.board().minions()[0].attack(), 2);
        assert_eq!(me.weapon().map(|w| w.attack()), Some(3));
        assert_eq!(me.hand().len(), 1);
        assert_eq!(world.player(PlayerId::SECOND).board().minions()[0].health(), 3);

        world.undo(undo);
        assert_eq!(world.snapshot().unwrap(), before);
    }

    #[test]
    fn test_throw_bombs_spends_every_bomb() {
        let mut world = world();
        let ctx = hero_ctx(&world, None);
        let _ = world.apply_effect(
            &Effect::ThrowBombs { count: 3, targets: Selector::EnemyHero },
            &ctx,
        );
        assert_eq!(world.player(PlayerId::SECOND).hero().health(), 27);
    }

    #[test]
    fn test_spell_power_boosts_each_bomb() {
        let mut world = world();
        let _ = world.summon_minion(PlayerId::FIRST, CardId(5), 0).unwrap();
        assert_eq!(world.player(PlayerId::FIRST).spell_power(), 1);

        let card = world.add_card_to_hand(PlayerId::FIRST, CardId(4)).unwrap().value.unwrap();
        let ctx = EffectContext::new(Actor::card(PlayerId::FIRST, card), None);
        let _ = world.apply_effect(
            &Effect::ThrowBombs { count: 3, targets: Selector::EnemyHero },
            &ctx,
        );
        assert_eq!(world.player(PlayerId::SECOND).hero().health(), 24);
    }

    #[test]
    fn test_for_targets_retargets() {
        let mut world = world();
        for _ in 0..2 {
            let _ = world.summon_minion(PlayerId::SECOND, CardId(2), 0).unwrap();
        }
        let ctx = hero_ctx(&world, None);
        let _ = world.apply_effect(
            &Effect::ForTargets {
                targets: Selector::minions(Side::Enemy),
                effect: Box::new(Effect::damage(1, Selector::Target)),
            },
            &ctx,
        );
        assert!(world.player(PlayerId::SECOND).board().iter().all(|m| m.health() == 4));
    }

    #[test]
    fn test_reduce_hand_cost_and_gain_mana() {
        let mut world = world();
        let _ = world.add_card_to_hand(PlayerId::FIRST, CardId(2)).unwrap();
        let ctx = hero_ctx(&world, None);

        let _ = world.apply_effect(&Effect::ReduceHandCost { amount: 2 }, &ctx);
        let card = &world.player(PlayerId::FIRST).hand().cards()[0];
        assert_eq!(card.active_mana_cost(&world), 2);

        let _ = world.apply_effect(&Effect::GainMana { amount: 12 }, &ctx);
        assert_eq!(world.player(PlayerId::FIRST).mana().mana(), 10);
    }

    #[test]
    fn test_unknown_card_is_skipped() {
        let mut world = world();
        let ctx = hero_ctx(&world, None);
        let undo = world.apply_effect(&Effect::SummonMinion { card: CardId(77), enemy_side: false }, &ctx);
        assert!(undo.is_nothing());
    }
}
