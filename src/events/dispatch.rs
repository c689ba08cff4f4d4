//! Firing events.
//!
//! A dispatch walks a snapshot of one channel in priority order:
//!
//! 1. the channel's global filter and every non-lazy filter are evaluated
//!    up front, against the world as it was when the event fired
//! 2. each registration that passed and is still registered runs in turn;
//!    a lazy filter is evaluated right before its reaction
//! 3. a trigger-once registration is unregistered before its reaction runs
//!
//! Reactions can register and unregister others while the dispatch runs.
//! New registrations wait for the next event; removed ones are skipped.

use crate::core::EntityId;
use crate::effects::Actor;
use crate::undo::{UndoAction, UndoBuilder, Undoable};
use crate::world::World;

use super::event::{EventKind, EventPayload};
use super::reaction::ReactionDef;
use super::registry::{Registration, RegistrationId};

/// On-summon registrations whose filter failed, re-checked once the
/// summon is done.
#[derive(Debug, Default)]
pub(crate) struct Deferred(Vec<Registration>);

impl World {
    /// Dispatch an event. The payload may be edited by reactions (veto,
    /// redirect, retarget) and is read back by the caller.
    pub fn fire(&mut self, kind: EventKind, payload: &mut EventPayload) -> UndoAction {
        self.dispatch(kind, payload).undo
    }

    /// Dispatch, collecting on-summon registrations that did not pass.
    pub(crate) fn dispatch(&mut self, kind: EventKind, payload: &mut EventPayload) -> Undoable<Deferred> {
        let snapshot = self.events().registrations(kind).clone();
        if snapshot.is_empty() {
            return Undoable::unchanged(Deferred::default());
        }

        let summoned = match (kind, &*payload) {
            (EventKind::Summoning, EventPayload::Minion { minion, .. }) => Some(*minion),
            _ => None,
        };
        let passed: Vec<bool> = snapshot
            .iter()
            .map(|r| r.lazy_filter || self.passes(r, payload))
            .collect();

        let mut undo = UndoBuilder::new();
        let mut deferred = Vec::new();
        for (registration, passed) in snapshot.into_iter().zip(passed) {
            if summoned == Some(registration.owner.entity) {
                continue;
            }
            if !passed {
                if summoned.is_some() {
                    deferred.push(registration);
                }
                continue;
            }
            if !self.events().contains(kind, registration.id) {
                continue;
            }
            if registration.lazy_filter && !self.passes(&registration, payload) {
                continue;
            }
            undo.add(self.run_registration(&registration, payload));
        }
        Undoable::new(Deferred(deferred), undo.build())
    }

    /// Run deferred on-summon registrations whose filter now passes.
    pub(crate) fn complete_deferred(&mut self, deferred: Deferred, payload: &mut EventPayload) -> UndoAction {
        let mut undo = UndoBuilder::new();
        for registration in deferred.0 {
            if self.events().contains(registration.kind, registration.id) && self.passes(&registration, payload) {
                undo.add(self.run_registration(&registration, payload));
            }
        }
        undo.build()
    }

    fn passes(&self, registration: &Registration, payload: &EventPayload) -> bool {
        let global = self
            .events()
            .global_filter(registration.kind)
            .map_or(true, |g| g.matches(self, &registration.owner, payload));
        global && registration.filter.matches(self, &registration.owner, payload)
    }

    fn run_registration(&mut self, registration: &Registration, payload: &mut EventPayload) -> UndoAction {
        let mut undo = UndoBuilder::new();
        if registration.trigger_once {
            if let Some(removed) = self.events_mut().unregister(registration.kind, registration.id) {
                undo.add(removed.undo);
            }
        }
        tracing::trace!(
            event = %registration.kind,
            registration = %registration.id,
            owner = %registration.owner.entity,
            "reaction fired"
        );
        undo.add(self.run_reaction(&registration.owner, &registration.action, payload));
        undo.build()
    }

    // === Ability lifecycle ===

    /// Register one reaction for `owner`.
    pub fn register_reaction(&mut self, owner: Actor, def: &ReactionDef) -> Undoable<RegistrationId> {
        self.events_mut().register(owner, def)
    }

    /// Register every reaction of an entity entering play.
    pub fn activate_reactions(&mut self, owner: Actor, defs: &[ReactionDef]) -> UndoAction {
        let mut undo = UndoBuilder::new();
        for def in defs {
            undo.add(self.register_reaction(owner, def).undo);
        }
        undo.build()
    }

    /// Unregister everything an entity leaving play registered.
    pub fn deactivate_reactions(&mut self, entity: EntityId) -> UndoAction {
        let owned: Vec<_> = self.events().owned_by(entity).map(|r| (r.kind, r.id)).collect();
        let mut undo = UndoBuilder::new();
        for (kind, id) in owned {
            if let Some(removed) = self.events_mut().unregister(kind, id) {
                undo.add(removed.undo);
            }
        }
        undo.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;
    use crate::core::{PlayerId, RulesConfig};
    use crate::effects::{Damage, DamageSource, Effect, SelfKind};
    use crate::events::{EventFilter, Priority, ReactionAction};
    use std::sync::Arc;

    fn world() -> (World, Actor) {
        let world = World::new(RulesConfig::default(), Arc::new(CardRegistry::new())).unwrap();
        let hero = world.player(PlayerId::FIRST).hero().id();
        (world, Actor::new(PlayerId::FIRST, hero, SelfKind::Hero))
    }

    fn armor(amount: i32) -> ReactionAction {
        ReactionAction::WithSelf {
            effect: Effect::GainArmor { amount },
        }
    }

    fn turn_starts(world: &mut World) -> UndoAction {
        let mut payload = EventPayload::Player {
            player: PlayerId::FIRST,
        };
        world.fire(EventKind::TurnStarts, &mut payload)
    }

    #[test]
    fn test_trigger_once_fires_once_and_undoes() {
        let (mut world, hero) = world();
        let def = ReactionDef::new(EventKind::TurnStarts, EventFilter::Any, armor(2)).trigger_once();
        let _ = world.register_reaction(hero, &def);
        let before = world.snapshot().unwrap();

        let first = turn_starts(&mut world);
        let second = turn_starts(&mut world);
        assert_eq!(world.player(PlayerId::FIRST).hero().armor(), 2);
        assert!(second.is_nothing());
        assert!(world.events().registrations(EventKind::TurnStarts).is_empty());

        world.undo(first);
        assert_eq!(world.snapshot().unwrap(), before);
    }

    #[test]
    fn test_veto_visible_to_lazy_filters_only() {
        let (mut world, hero) = world();
        let veto = ReactionDef::new(EventKind::PrepareDamage, EventFilter::Any, ReactionAction::VetoDamage)
            .with_priority(Priority::HIGH);
        let eager = ReactionDef::new(EventKind::PrepareDamage, EventFilter::Vetoed, armor(1));
        let lazy = ReactionDef::new(EventKind::PrepareDamage, EventFilter::Vetoed, armor(10))
            .with_priority(Priority::LOW)
            .lazy();
        let _ = world.activate_reactions(hero, &[eager, lazy, veto]);

        let target = world.player(PlayerId::SECOND).hero().id();
        let _ = world.damage_character(Damage::new(DamageSource::from(&hero), 5), target);

        assert_eq!(world.player(PlayerId::SECOND).hero().health(), 30);
        assert_eq!(world.player(PlayerId::FIRST).hero().armor(), 10);
    }

    #[test]
    fn test_global_filter_applies_to_every_registration() {
        let (mut world, hero) = world();
        let _ = world.register_reaction(hero, &ReactionDef::new(EventKind::TurnStarts, EventFilter::Any, armor(1)));
        world
            .events_mut()
            .set_global_filter(EventKind::TurnStarts, Some(EventFilter::EnemyTurn));

        let _ = turn_starts(&mut world);
        assert_eq!(world.player(PlayerId::FIRST).hero().armor(), 0);
    }

    #[test]
    fn test_deactivate_removes_owned_registrations() {
        let (mut world, hero) = world();
        let defs = [
            ReactionDef::new(EventKind::TurnStarts, EventFilter::Any, armor(1)),
            ReactionDef::new(EventKind::TurnEnds, EventFilter::Any, armor(1)),
        ];
        let _ = world.activate_reactions(hero, &defs);
        let before = world.snapshot().unwrap();

        let undo = world.deactivate_reactions(hero.entity);
        assert!(world.events().is_empty());
        assert!(turn_starts(&mut world).is_nothing());

        world.undo(undo);
        assert_eq!(world.snapshot().unwrap(), before);
    }
}
