//! Effect targeting system.
//!
//! A [`Selector`] turns an actor and an optional chosen target into an
//! ordered list of living characters:
//! - base selectors name a fixed set (the target, the enemy hero, all
//!   minions on one side, ...)
//! - [`Selector::Filtered`] narrows a base set through [`EntityFilter`]
//!   stages, including random sampling
//!
//! Output is always in world order (first player before second, hero before
//! minions, minions left to right) so random stages are reproducible for a
//! given seed. An empty result is a valid outcome, not an error.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{keyword, Keyword};
use crate::core::{EntityId, PlayerId};
use crate::world::{Character, Damageable, Ownable, World};

use super::context::EffectContext;

/// Selected entities, in world order.
pub type Targets = SmallVec<[EntityId; 8]>;

/// Board side relative to the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
    Own,
    Enemy,
    Both,
}

impl Side {
    #[must_use]
    pub fn includes(self, actor: PlayerId, owner: PlayerId) -> bool {
        match self {
            Side::Own => owner == actor,
            Side::Enemy => owner != actor,
            Side::Both => true,
        }
    }
}

/// Declarative base set of characters.
///
/// ## Example
///
/// ```
/// use ccg_rules::effects::{EntityFilter, Selector, Side};
///
/// // One random enemy minion.
/// let selector = Selector::Characters { side: Side::Enemy, minions: true, heroes: false }
///     .filtered(EntityFilter::Random);
/// assert!(matches!(selector, Selector::Filtered { .. }));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Selector {
    /// The chosen target.
    Target,
    /// The acting entity itself, when it is a character.
    Actor,
    OwnHero,
    EnemyHero,
    Characters {
        side: Side,
        minions: bool,
        heroes: bool,
    },
    Filtered {
        source: Box<Selector>,
        filter: EntityFilter,
    },
}

/// A narrowing stage applied to a selected sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EntityFilter {
    /// One uniformly random entry.
    Random,
    /// Up to `count` entries sampled without replacement.
    RandomN { count: usize },
    WithKeywords { keywords: Vec<Keyword> },
    WithoutKeywords { keywords: Vec<Keyword> },
    ExcludeActor,
    Damaged,
    /// Drops everything.
    Empty,
    Chain { filters: Vec<EntityFilter> },
}

impl Selector {
    /// Minions of one side.
    #[must_use]
    pub fn minions(side: Side) -> Self {
        Selector::Characters {
            side,
            minions: true,
            heroes: false,
        }
    }

    /// Heroes and minions of one side.
    #[must_use]
    pub fn characters(side: Side) -> Self {
        Selector::Characters {
            side,
            minions: true,
            heroes: true,
        }
    }

    /// Wrap in a filter stage.
    #[must_use]
    pub fn filtered(self, filter: EntityFilter) -> Self {
        Selector::Filtered {
            source: Box::new(self),
            filter,
        }
    }

    /// One random member of this set.
    #[must_use]
    pub fn random(self) -> Self {
        self.filtered(EntityFilter::Random)
    }

    /// Resolve against the world. Random stages draw from the world RNG.
    pub fn select(&self, world: &mut World, ctx: &EffectContext) -> Targets {
        match self {
            Selector::Target => living(world, ctx.target),
            Selector::Actor => living(world, Some(ctx.actor.entity)),
            Selector::OwnHero => living(world, Some(world.player(ctx.player()).hero().id())),
            Selector::EnemyHero => {
                living(world, Some(world.player(ctx.player().opponent()).hero().id()))
            }
            Selector::Characters {
                side,
                minions,
                heroes,
            } => world
                .living_characters()
                .filter(|c| side.includes(ctx.player(), c.owner()))
                .filter(|c| (c.is_minion() && *minions) || (c.is_hero() && *heroes))
                .map(|c| c.id())
                .collect(),
            Selector::Filtered { source, filter } => {
                let selected = source.select(world, ctx);
                filter.apply(world, ctx, selected)
            }
        }
    }
}

fn living(world: &World, id: Option<EntityId>) -> Targets {
    id.filter(|id| world.locate(*id).is_some())
        .filter(|id| world.character(*id).is_some_and(|c| c.is_alive()))
        .into_iter()
        .collect()
}

impl EntityFilter {
    /// Narrow `targets`, keeping their relative order.
    pub fn apply(&self, world: &mut World, ctx: &EffectContext, targets: Targets) -> Targets {
        match self {
            EntityFilter::Random => match world.rng_mut().roll(targets.len()) {
                Some(index) => SmallVec::from_slice(&targets[index..=index]),
                None => Targets::new(),
            },
            EntityFilter::RandomN { count } => {
                let mut picked = world.rng_mut().sample_indices(targets.len(), *count);
                picked.sort_unstable();
                picked.into_iter().map(|i| targets[i]).collect()
            }
            EntityFilter::WithKeywords { keywords } => {
                retain(world, targets, |c| match c {
                    Character::Minion(m) => keyword::has_all(m.keywords(), keywords),
                    Character::Hero(_) => keywords.is_empty(),
                })
            }
            EntityFilter::WithoutKeywords { keywords } => {
                retain(world, targets, |c| match c {
                    Character::Minion(m) => keyword::has_none(m.keywords(), keywords),
                    Character::Hero(_) => true,
                })
            }
            EntityFilter::ExcludeActor => targets
                .into_iter()
                .filter(|id| *id != ctx.actor.entity)
                .collect(),
            EntityFilter::Damaged => retain(world, targets, |c| c.is_damaged()),
            EntityFilter::Empty => Targets::new(),
            EntityFilter::Chain { filters } => filters
                .iter()
                .fold(targets, |acc, filter| filter.apply(world, ctx, acc)),
        }
    }
}

fn retain(world: &World, targets: Targets, keep: impl Fn(&Character<'_>) -> bool) -> Targets {
    targets
        .into_iter()
        .filter(|id| world.character(*id).is_some_and(|c| keep(&c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDescr, CardId, CardRegistry, MinionDescr};
    use crate::core::RulesConfig;
    use crate::effects::Actor;
    use std::sync::Arc;

    fn world() -> World {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDescr::minion(CardId(1), "Wolf", 1, MinionDescr::new("Wolf", 1, 1).with_keyword(Keyword::BEAST)))
            .unwrap();
        registry
            .register(CardDescr::minion(CardId(2), "Yeti", 4, MinionDescr::new("Yeti", 4, 5)))
            .unwrap();
        let mut world = World::new(RulesConfig::default().with_seed(11), Arc::new(registry)).unwrap();
        for (player, card) in [(PlayerId::FIRST, 1), (PlayerId::FIRST, 2), (PlayerId::SECOND, 2), (PlayerId::SECOND, 1)] {
            let _ = world.summon_minion(player, CardId(card), 7).unwrap();
        }
        world
    }

    fn ctx(world: &World) -> EffectContext {
        let hero = world.player(PlayerId::FIRST).hero().id();
        EffectContext::new(Actor::new(PlayerId::FIRST, hero, crate::effects::SelfKind::Hero), None)
    }

    #[test]
    fn test_world_order() {
        let mut world = world();
        let ctx = ctx(&world);
        let all = Selector::characters(Side::Both).select(&mut world, &ctx);
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], world.player(PlayerId::FIRST).hero().id());
        assert_eq!(all[3], world.player(PlayerId::SECOND).hero().id());

        let enemies = Selector::minions(Side::Enemy).select(&mut world, &ctx);
        let expected: Vec<_> = world.player(PlayerId::SECOND).board().iter().map(|m| m.id()).collect();
        assert_eq!(enemies.to_vec(), expected);
    }

    #[test]
    fn test_keyword_filters() {
        let mut world = world();
        let ctx = ctx(&world);
        let beasts = Selector::minions(Side::Both)
            .filtered(EntityFilter::WithKeywords { keywords: vec![Keyword::BEAST] })
            .select(&mut world, &ctx);
        assert_eq!(beasts.len(), 2);

        let others = Selector::characters(Side::Own)
            .filtered(EntityFilter::WithoutKeywords { keywords: vec![Keyword::BEAST] })
            .select(&mut world, &ctx);
        assert_eq!(others.len(), 2);
    }

    #[test]
    fn test_random_n_samples_without_replacement() {
        let mut world = world();
        let ctx = ctx(&world);
        let picked = Selector::characters(Side::Both)
            .filtered(EntityFilter::RandomN { count: 4 })
            .select(&mut world, &ctx);
        assert_eq!(picked.len(), 4);
        let mut unique = picked.to_vec();
        unique.dedup();
        assert_eq!(unique.len(), 4);

        let capped = Selector::minions(Side::Own)
            .filtered(EntityFilter::RandomN { count: 9 })
            .select(&mut world, &ctx);
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn test_random_is_reproducible() {
        let pick = || {
            let mut world = world();
            let ctx = ctx(&world);
            Selector::characters(Side::Both).random().select(&mut world, &ctx)
        };
        assert_eq!(pick(), pick());
    }

    #[test]
    fn test_empty_and_exclude_actor() {
        let mut world = world();
        let ctx = ctx(&world);
        assert!(Selector::characters(Side::Both)
            .filtered(EntityFilter::Empty)
            .select(&mut world, &ctx)
            .is_empty());

        let chained = Selector::characters(Side::Own)
            .filtered(EntityFilter::Chain {
                filters: vec![EntityFilter::ExcludeActor, EntityFilter::Damaged],
            })
            .select(&mut world, &ctx);
        assert!(chained.is_empty());

        assert!(Selector::Target.select(&mut world, &ctx).is_empty());
    }
}
