//! Board-wide damage.
//!
//! A [`MultiTargeter`] is built from four independent side/kind flags plus
//! a predicate and an `atomic` flag:
//!
//! - **atomic**: the target list is computed once and every entry is hit,
//!   even if an earlier hit killed or changed it
//! - **sequential**: before each hit the entry is re-checked for liveness
//!   and against the predicate

use serde::{Deserialize, Serialize};

use crate::cards::Keyword;
use crate::undo::{UndoAction, UndoBuilder};
use crate::world::{Character, Damageable, Ownable, World};

use super::context::Actor;
use super::targeting::Targets;

/// Extra condition on each candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CharacterPredicate {
    #[default]
    Any,
    HasKeyword { keyword: Keyword },
    NotActor,
    Damaged,
}

impl CharacterPredicate {
    #[must_use]
    pub fn matches(&self, actor: &Actor, character: &Character<'_>) -> bool {
        match self {
            CharacterPredicate::Any => true,
            CharacterPredicate::HasKeyword { keyword } => character.has_keyword(keyword),
            CharacterPredicate::NotActor => character.id() != actor.entity,
            CharacterPredicate::Damaged => character.is_damaged(),
        }
    }
}

/// Target-set policy for multi-target damage.
///
/// ## Example
///
/// ```
/// use ccg_rules::effects::MultiTargeter;
///
/// // Hits every minion on both sides, all at once.
/// let flamestrike = MultiTargeter::all_minions();
/// assert!(flamestrike.atomic);
/// assert!(!flamestrike.heroes);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiTargeter {
    pub own_side: bool,
    pub enemy_side: bool,
    pub minions: bool,
    pub heroes: bool,
    pub atomic: bool,
    pub predicate: CharacterPredicate,
}

impl Default for MultiTargeter {
    fn default() -> Self {
        Self {
            own_side: true,
            enemy_side: true,
            minions: true,
            heroes: true,
            atomic: true,
            predicate: CharacterPredicate::Any,
        }
    }
}

impl MultiTargeter {
    /// Every character on both sides.
    #[must_use]
    pub fn all_characters() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn all_minions() -> Self {
        Self::default().heroes(false)
    }

    #[must_use]
    pub fn enemy_characters() -> Self {
        Self::default().own_side(false)
    }

    #[must_use]
    pub fn enemy_minions() -> Self {
        Self::default().own_side(false).heroes(false)
    }

    #[must_use]
    pub fn own_side(mut self, include: bool) -> Self {
        self.own_side = include;
        self
    }

    #[must_use]
    pub fn enemy_side(mut self, include: bool) -> Self {
        self.enemy_side = include;
        self
    }

    #[must_use]
    pub fn minions(mut self, include: bool) -> Self {
        self.minions = include;
        self
    }

    #[must_use]
    pub fn heroes(mut self, include: bool) -> Self {
        self.heroes = include;
        self
    }

    #[must_use]
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: CharacterPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    fn includes(&self, actor: &Actor, character: &Character<'_>) -> bool {
        let side = if character.owner() == actor.player {
            self.own_side
        } else {
            self.enemy_side
        };
        let kind = if character.is_hero() {
            self.heroes
        } else {
            self.minions
        };
        side && kind && self.predicate.matches(actor, character)
    }

    /// Living characters this targeter covers right now, in world order.
    #[must_use]
    pub fn damage_targets(&self, world: &World, actor: &Actor) -> Targets {
        world
            .living_characters()
            .filter(|c| self.includes(actor, c))
            .map(|c| c.id())
            .collect()
    }
}

impl World {
    /// Deal `amount` from `actor` to every character the targeter covers.
    pub fn deal_multi_damage(&mut self, targeter: &MultiTargeter, actor: &Actor, amount: i32) -> UndoAction {
        let damage = self.create_damage(actor, amount);
        let targets = targeter.damage_targets(self, actor);
        let mut undo = UndoBuilder::new();
        for target in targets {
            if !targeter.atomic {
                let eligible = self
                    .character(target)
                    .is_some_and(|c| c.is_alive() && targeter.includes(actor, &c));
                if !eligible {
                    continue;
                }
            }
            undo.add(self.damage_character(damage, target));
        }
        undo.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDescr, CardId, CardRegistry, MinionDescr};
    use crate::core::{EntityId, PlayerId, RulesConfig};
    use crate::effects::{Effect, EntityFilter, Selector, SelfKind, Side};
    use crate::events::{EventFilter, EventKind, ReactionAction, ReactionDef};
    use std::sync::Arc;

    fn world() -> (World, Actor) {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDescr::minion(CardId(1), "Wisp", 0, MinionDescr::new("Wisp", 1, 1)))
            .unwrap();
        // Destroys its own neighbours whenever it takes damage.
        registry
            .register(CardDescr::minion(
                CardId(2),
                "Unstable Core",
                2,
                MinionDescr::new("Unstable Core", 1, 3).with_reaction(ReactionDef::new(
                    EventKind::DamageDealt,
                    EventFilter::SubjectIsSelf,
                    ReactionAction::WithSelf {
                        effect: Effect::Destroy {
                            targets: Selector::minions(Side::Own).filtered(EntityFilter::ExcludeActor),
                        },
                    },
                )),
            ))
            .unwrap();
        let world = World::new(RulesConfig::default(), Arc::new(registry)).unwrap();
        let hero = world.player(PlayerId::FIRST).hero().id();
        (world, Actor::new(PlayerId::FIRST, hero, SelfKind::Hero))
    }

    fn core_and_wisp(world: &mut World) -> (EntityId, EntityId) {
        let _ = world.summon_minion(PlayerId::SECOND, CardId(2), 7).unwrap();
        let _ = world.summon_minion(PlayerId::SECOND, CardId(1), 7).unwrap();
        let board = world.player(PlayerId::SECOND).board();
        (board.minions()[0].id(), board.minions()[1].id())
    }

    #[test]
    fn test_atomic_hits_every_collected_target() {
        let (mut world, actor) = world();
        let (_, wisp) = core_and_wisp(&mut world);

        let _ = world.deal_multi_damage(&MultiTargeter::enemy_minions(), &actor, 1);

        // Destroyed by the core's reaction, then still hit.
        let wisp = world.player(PlayerId::SECOND).board().get(wisp).unwrap();
        assert!(wisp.is_dead());
        assert_eq!(wisp.health(), 0);
        assert_eq!(world.player(PlayerId::SECOND).hero().health(), 30);
    }

    #[test]
    fn test_sequential_skips_targets_that_died() {
        let (mut world, actor) = world();
        let (core, wisp) = core_and_wisp(&mut world);

        let _ = world.deal_multi_damage(&MultiTargeter::enemy_minions().atomic(false), &actor, 1);

        let board = world.player(PlayerId::SECOND).board();
        assert_eq!(board.get(core).unwrap().health(), 2);
        let wisp = board.get(wisp).unwrap();
        assert!(wisp.is_dead());
        assert_eq!(wisp.health(), 1);
    }

    #[test]
    fn test_targets_respect_flags() {
        let (mut world, actor) = world();
        let _ = world.summon_minion(PlayerId::FIRST, CardId(1), 7).unwrap();
        let _ = world.summon_minion(PlayerId::SECOND, CardId(1), 7).unwrap();

        assert_eq!(MultiTargeter::all_characters().damage_targets(&world, &actor).len(), 4);
        assert_eq!(MultiTargeter::enemy_characters().damage_targets(&world, &actor).len(), 2);
        assert_eq!(MultiTargeter::all_minions().damage_targets(&world, &actor).len(), 2);

        let not_me = MultiTargeter::all_characters().with_predicate(CharacterPredicate::NotActor);
        assert_eq!(not_me.damage_targets(&world, &actor).len(), 3);

        let damaged = MultiTargeter::all_characters().with_predicate(CharacterPredicate::Damaged);
        assert!(damaged.damage_targets(&world, &actor).is_empty());
    }
}
