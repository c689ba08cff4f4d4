//! Event filters.
//!
//! A filter decides whether a registration reacts to one dispatch. It sees
//! the world, the registration's owner and the payload, and never mutates
//! anything.

use serde::{Deserialize, Serialize};

use crate::cards::{CardType, Keyword};
use crate::effects::{Actor, SelfKind};
use crate::world::{Character, Damageable, World};

use super::event::{Capabilities, EventKind, EventPayload};

/// Condition a dispatch must meet for a reaction to run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EventFilter {
    #[default]
    Any,
    Never,

    // === Turn ===
    /// The owner is the active player.
    OwnTurn,
    EnemyTurn,

    // === Subject ===
    SubjectIsSelf,
    SubjectNotSelf,
    SubjectIsOwn,
    SubjectIsEnemy,
    SubjectIsMinion,
    SubjectIsHero,
    SubjectHasKeyword { keyword: Keyword },
    /// The subject is below its maximum health.
    SubjectDamaged,

    // === Source ===
    SourceIsSelf,
    SourceIsOwn,
    SourceIsEnemy,

    // === Payload values ===
    CardTypeIs { card_type: CardType },
    DamageAtLeast { amount: i32 },
    Vetoed,
    NotVetoed,

    // === Combinators ===
    All { filters: Vec<EventFilter> },
    AnyOf { filters: Vec<EventFilter> },
    Not { filter: Box<EventFilter> },
}

impl EventFilter {
    /// Both filters must pass.
    #[must_use]
    pub fn and(self, other: EventFilter) -> EventFilter {
        match (self, other) {
            (EventFilter::Any, f) | (f, EventFilter::Any) => f,
            (EventFilter::All { mut filters }, f) => {
                filters.push(f);
                EventFilter::All { filters }
            }
            (a, b) => EventFilter::All {
                filters: vec![a, b],
            },
        }
    }

    /// Evaluate against the current world.
    #[must_use]
    pub fn matches(&self, world: &World, owner: &Actor, payload: &EventPayload) -> bool {
        let subject_owner = || {
            payload
                .subject_owner()
                .or_else(|| payload.subject().and_then(|id| world.locate(id)).map(|r| r.owner()))
        };
        let subject = || payload.subject().and_then(|id| world.character(id));

        match self {
            EventFilter::Any => true,
            EventFilter::Never => false,

            EventFilter::OwnTurn => world.active_player() == owner.player,
            EventFilter::EnemyTurn => world.active_player() != owner.player,

            EventFilter::SubjectIsSelf => payload.subject() == Some(owner.entity),
            EventFilter::SubjectNotSelf => payload.subject() != Some(owner.entity),
            EventFilter::SubjectIsOwn => subject_owner() == Some(owner.player),
            EventFilter::SubjectIsEnemy => subject_owner() == Some(owner.player.opponent()),
            EventFilter::SubjectIsMinion => subject().is_some_and(|c| c.is_minion()),
            EventFilter::SubjectIsHero => subject().is_some_and(|c| c.is_hero()),
            EventFilter::SubjectHasKeyword { keyword } => {
                matches!(subject(), Some(Character::Minion(m)) if m.has_keyword(keyword))
            }
            EventFilter::SubjectDamaged => subject().is_some_and(|c| c.is_damaged()),

            EventFilter::SourceIsSelf => payload.source() == Some(owner.entity),
            EventFilter::SourceIsOwn => payload.source_owner() == Some(owner.player),
            EventFilter::SourceIsEnemy => payload.source_owner() == Some(owner.player.opponent()),

            EventFilter::CardTypeIs { card_type } => payload.card_type() == Some(*card_type),
            EventFilter::DamageAtLeast { amount } => payload.amount().is_some_and(|a| a >= *amount),
            EventFilter::Vetoed => payload.is_vetoed(),
            EventFilter::NotVetoed => !payload.is_vetoed(),

            EventFilter::All { filters } => filters.iter().all(|f| f.matches(world, owner, payload)),
            EventFilter::AnyOf { filters } => filters.iter().any(|f| f.matches(world, owner, payload)),
            EventFilter::Not { filter } => !filter.matches(world, owner, payload),
        }
    }

    /// What the payload must offer for this filter to be meaningful.
    #[must_use]
    pub fn required(&self) -> Capabilities {
        let none = Capabilities::NONE;
        match self {
            EventFilter::Any | EventFilter::Never | EventFilter::OwnTurn | EventFilter::EnemyTurn => none,
            EventFilter::SubjectIsSelf
            | EventFilter::SubjectNotSelf
            | EventFilter::SubjectIsOwn
            | EventFilter::SubjectIsEnemy
            | EventFilter::SubjectIsMinion
            | EventFilter::SubjectIsHero
            | EventFilter::SubjectHasKeyword { .. }
            | EventFilter::SubjectDamaged => Capabilities {
                subject: true,
                ..none
            },
            EventFilter::SourceIsSelf | EventFilter::SourceIsOwn | EventFilter::SourceIsEnemy => {
                Capabilities {
                    source: true,
                    ..none
                }
            }
            EventFilter::CardTypeIs { .. } => Capabilities { card: true, ..none },
            EventFilter::DamageAtLeast { .. } => Capabilities {
                damage: true,
                ..none
            },
            EventFilter::Vetoed | EventFilter::NotVetoed => Capabilities { veto: true, ..none },
            EventFilter::All { .. } | EventFilter::AnyOf { .. } | EventFilter::Not { .. } => none,
        }
    }

    /// Type-check against an event kind and the kind of entity the filter
    /// is bound to.
    pub fn check(&self, kind: EventKind, self_kind: SelfKind) -> Result<(), String> {
        match self {
            EventFilter::All { filters } | EventFilter::AnyOf { filters } => {
                return filters.iter().try_for_each(|f| f.check(kind, self_kind));
            }
            EventFilter::Not { filter } => return filter.check(kind, self_kind),
            _ => {}
        }
        if !kind.capabilities().covers(&self.required()) {
            return Err(format!("filter {self:?} does not apply to {kind} events"));
        }
        Ok(())
    }
}
