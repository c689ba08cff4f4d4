//! Character attacks.

use crate::core::{EntityId, GameAction, PlayerId};
use crate::effects::{Damage, DamageSource};
use crate::error::{EngineError, EngineResult};
use crate::events::{EventKind, EventPayload};
use crate::undo::{UndoAction, UndoBuilder};
use crate::world::{Attacker, Character, CharacterRef, Damageable, Hero, World};

impl World {
    /// Attack `defender` with `attacker`.
    ///
    /// The attacker must belong to the active player and be able to attack
    /// (not summoning sick unless it has charge, attacks left this turn).
    /// While the defender's side has a living taunt minion, only taunt
    /// minions can be attacked. `attack-initiated` may redirect the attack
    /// before damage is exchanged; a hero attacking with a weapon uses up
    /// one durability.
    pub fn attack(&mut self, attacker: EntityId, defender: EntityId) -> EngineResult<UndoAction> {
        let action = GameAction::Attack { attacker, defender };
        let (player, defender_owner) = self
            .check_attack(attacker, defender)
            .inspect_err(|error| tracing::warn!(%error, ?action, "attack rejected"))?;
        tracing::debug!(%player, %attacker, %defender, "attack");

        let mut undo = UndoBuilder::new();
        let mut payload = EventPayload::Attack {
            attacker,
            attacker_owner: player,
            defender,
            defender_owner,
        };
        undo.add(self.fire(EventKind::AttackInitiated, &mut payload));
        let target = match payload {
            EventPayload::Attack { defender, .. } => defender,
            _ => defender,
        };

        undo.add(self.resolve_attack(player, attacker, target));
        undo.add(self.record(player, action));
        undo.add(self.end_phase());
        Ok(undo.build())
    }

    fn check_attack(&self, attacker: EntityId, defender: EntityId) -> EngineResult<(PlayerId, PlayerId)> {
        if self.game_result().is_over() {
            return Err(EngineError::illegal("the match is over"));
        }
        let player = self
            .locate(attacker)
            .ok_or(EngineError::UnknownEntity(attacker))?
            .owner();
        let defender_owner = self
            .locate(defender)
            .ok_or(EngineError::UnknownEntity(defender))?
            .owner();
        if player != self.active_player() {
            return Err(EngineError::illegal(format!("it is not the turn of {player}")));
        }
        if defender_owner == player {
            return Err(EngineError::invalid(format!("{attacker} cannot attack a friendly character")));
        }

        let can_attack = self.character(attacker).is_some_and(|c| c.can_attack());
        if !can_attack {
            return Err(EngineError::illegal(format!("{attacker} cannot attack now")));
        }
        let target = self.character(defender).filter(|c| c.is_alive());
        let Some(target) = target else {
            return Err(EngineError::invalid(format!("{defender} is already dead")));
        };
        let taunted = self
            .player(defender_owner)
            .board()
            .alive()
            .any(|m| m.has_taunt());
        if taunted && !target.has_taunt() {
            return Err(EngineError::illegal(format!("{defender} is protected by taunt")));
        }
        Ok((player, defender_owner))
    }

    /// Exchange damage. Skipped when either side died or left play during
    /// the attack event.
    fn resolve_attack(&mut self, player: PlayerId, attacker: EntityId, defender: EntityId) -> UndoAction {
        let attacker_alive = self.character(attacker).is_some_and(|c| c.is_alive());
        let defender_alive =
            self.locate(defender).is_some() && self.character(defender).is_some_and(|c| c.is_alive());
        if !attacker_alive || !defender_alive {
            return UndoAction::Nothing;
        }

        let mut undo = UndoBuilder::new();
        let strike = self.character(attacker).map_or(0, |c| c.attack());
        let counter = match self.character(defender) {
            Some(Character::Minion(m)) => m.attack(),
            _ => 0,
        };

        match self.locate(attacker) {
            Some(CharacterRef::Hero(owner)) => {
                let me = self.player_mut(owner);
                undo.add(me.update_hero(Hero::record_attack).undo);
                undo.add(me.update_weapon(|w| w.lose_durability(1)));
            }
            Some(CharacterRef::Minion { owner, id }) => {
                if let Some(recorded) = self.player_mut(owner).board_mut().update(id, |m| m.record_attack()) {
                    undo.add(recorded.undo);
                }
            }
            None => {}
        }

        let source = DamageSource {
            player,
            entity: attacker,
        };
        undo.add(self.damage_character(Damage::new(source, strike), defender));
        if counter > 0 {
            let source = DamageSource {
                player: player.opponent(),
                entity: defender,
            };
            undo.add(self.damage_character(Damage::new(source, counter), attacker));
        }
        undo.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDescr, CardId, CardRegistry, Keyword, MinionDescr, WeaponDescr};
    use crate::core::RulesConfig;
    use crate::effects::{Actor, Effect, Selector, SelfKind};
    use crate::events::{EventFilter, ReactionAction, ReactionDef};
    use std::sync::Arc;

    fn world() -> World {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDescr::minion(
                CardId(1),
                "Bluegill",
                2,
                MinionDescr::new("Bluegill", 2, 1).with_keyword(Keyword::CHARGE),
            ))
            .unwrap();
        registry
            .register(CardDescr::minion(CardId(2), "Yeti", 4, MinionDescr::new("Yeti", 4, 5)))
            .unwrap();
        registry
            .register(CardDescr::minion(
                CardId(3),
                "Goldshire",
                1,
                MinionDescr::new("Goldshire", 1, 2).with_keyword(Keyword::TAUNT),
            ))
            .unwrap();
        registry
            .register(CardDescr::weapon(CardId(4), "Axe", 2, WeaponDescr::new(3, 1)))
            .unwrap();
        World::new(RulesConfig::default(), Arc::new(registry)).unwrap()
    }

    fn summon(world: &mut World, player: PlayerId, card: u32) -> EntityId {
        let _ = world.summon_minion(player, CardId(card), 7).unwrap();
        world.player(player).board().minions().last().map(|m| m.id()).unwrap()
    }

    #[test]
    fn test_charge_attack_trades() {
        let mut world = world();
        let bluegill = summon(&mut world, PlayerId::FIRST, 1);
        let yeti = summon(&mut world, PlayerId::SECOND, 2);
        let before = world.snapshot().unwrap();

        let undo = world.attack(bluegill, yeti).unwrap();
        assert!(world.player(PlayerId::FIRST).board().is_empty());
        assert_eq!(world.player(PlayerId::FIRST).graveyard().len(), 1);
        assert_eq!(world.player(PlayerId::SECOND).board().minions()[0].health(), 3);
        assert_eq!(world.history().len(), 1);

        world.undo(undo);
        assert_eq!(world.snapshot().unwrap(), before);
    }

    #[test]
    fn test_defender_killed_mid_attack_does_not_strike_back() {
        let mut world = world();
        let bluegill = summon(&mut world, PlayerId::FIRST, 1);
        let yeti = summon(&mut world, PlayerId::SECOND, 2);
        // "When one of your minions attacks, deal 5 damage to its target."
        let hero = world.player(PlayerId::FIRST).hero().id();
        let ambush = ReactionDef::new(
            EventKind::AttackInitiated,
            EventFilter::SourceIsOwn,
            ReactionAction::ForSubject {
                effect: Effect::damage(5, Selector::Target),
            },
        );
        let _ = world.register_reaction(Actor::new(PlayerId::FIRST, hero, SelfKind::Hero), &ambush);

        let _ = world.attack(bluegill, yeti).unwrap();
        assert_eq!(world.player(PlayerId::FIRST).board().minions()[0].health(), 1);
        assert!(world.player(PlayerId::SECOND).board().is_empty());
        assert_eq!(world.player(PlayerId::SECOND).graveyard().len(), 1);
    }

    #[test]
    fn test_summoning_sickness_and_turn() {
        let mut world = world();
        let yeti = summon(&mut world, PlayerId::FIRST, 2);
        let enemy = world.player(PlayerId::SECOND).hero().id();
        assert!(matches!(world.attack(yeti, enemy), Err(EngineError::IllegalState(_))));

        let bluegill = summon(&mut world, PlayerId::SECOND, 1);
        let hero = world.player(PlayerId::FIRST).hero().id();
        assert!(matches!(world.attack(bluegill, hero), Err(EngineError::IllegalState(_))));
        assert!(matches!(
            world.attack(EntityId(999), hero),
            Err(EngineError::UnknownEntity(EntityId(999)))
        ));
    }

    #[test]
    fn test_taunt_blocks_other_targets() {
        let mut world = world();
        let bluegill = summon(&mut world, PlayerId::FIRST, 1);
        let taunt = summon(&mut world, PlayerId::SECOND, 3);
        let hero = world.player(PlayerId::SECOND).hero().id();
        let before = world.snapshot().unwrap();

        assert!(matches!(world.attack(bluegill, hero), Err(EngineError::IllegalState(_))));
        assert_eq!(world.snapshot().unwrap(), before);
        assert!(world.attack(bluegill, taunt).is_ok());
    }

    #[test]
    fn test_hero_attacks_with_weapon() {
        let mut world = world();
        let _ = world.equip_new_weapon(PlayerId::FIRST, CardId(4)).unwrap();
        let yeti = summon(&mut world, PlayerId::SECOND, 2);
        let hero = world.player(PlayerId::FIRST).hero().id();

        let _ = world.attack(hero, yeti).unwrap();
        let me = world.player(PlayerId::FIRST);
        assert_eq!(me.hero().health(), 26);
        assert!(me.weapon().is_none());
        assert_eq!(me.hero().attack(), 0);
        assert_eq!(world.player(PlayerId::SECOND).board().minions()[0].health(), 2);
        assert!(matches!(world.attack(hero, yeti), Err(EngineError::IllegalState(_))));
    }

    #[test]
    fn test_attack_can_be_redirected() {
        let mut world = world();
        let bluegill = summon(&mut world, PlayerId::FIRST, 1);
        let yeti = summon(&mut world, PlayerId::SECOND, 2);
        let enemy_hero = world.player(PlayerId::SECOND).hero().id();
        // Secret-style: send attacks on the hero to a random other character.
        let def = ReactionDef::new(EventKind::AttackInitiated, EventFilter::SubjectIsSelf, ReactionAction::Misdirect);
        let _ = world.register_reaction(Actor::new(PlayerId::SECOND, enemy_hero, SelfKind::Hero), &def);

        let _ = world.attack(bluegill, enemy_hero).unwrap();
        let redirected_to_yeti = world.player(PlayerId::SECOND).board().get(yeti).map(|m| m.health()) == Some(3);
        let redirected_to_own_hero = world.player(PlayerId::FIRST).hero().health() == 28;
        assert!(redirected_to_yeti || redirected_to_own_hero);
        assert_eq!(world.player(PlayerId::SECOND).hero().health(), 30);
    }
}
