//! Reaction actions and definitions.
//!
//! A [`ReactionDef`] is the static description a card carries: which event
//! to listen to, when to react and what to do. Registering it against an
//! owner produces a [`Registration`](super::Registration) on the bus.
//! [`World::run_reaction`] interprets a [`ReactionAction`] against the
//! payload being dispatched; payload edits (veto, redirect) need no
//! inverse because the payload does not outlive the dispatch.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{EntityId, PlayerId};
use crate::effects::{Actor, DamageSource, Effect, EffectContext, Selector, SelfKind};
use crate::error::EngineResult;
use crate::undo::{UndoAction, UndoBuilder};
use crate::world::{Ownable, World};

use super::condition::EventFilter;
use super::event::{Capabilities, EventKind, EventPayload};
use super::registry::Priority;

fn default_miss_count() -> u32 {
    1
}

fn default_attack_count() -> u32 {
    2
}

/// What a reaction does when it fires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReactionAction {
    /// Veto the card being played.
    VetoCardPlay,
    /// Veto the prepared damage. Vetoing twice is the same as once.
    VetoDamage,
    /// Redirect the attack to a random character other than the attacker
    /// and the current defender.
    Misdirect,
    /// With probability `miss_count / attack_count`, redirect the attack to
    /// another character on the defender's side.
    MissTargetSometimes {
        #[serde(default = "default_miss_count")]
        miss_count: u32,
        #[serde(default = "default_attack_count")]
        attack_count: u32,
    },
    /// Summon a minion for the owner and make it the attack's defender.
    SummonAttackTarget { card: CardId },
    /// Summon a minion for the owner and make it the spell's target.
    SummonCardPlayTarget { card: CardId },
    /// Heal the owner's hero by the damage dealt.
    LifeStealForHero,
    /// Deal the damage just taken to the selected characters.
    ReflectDamage { targets: Selector },
    /// Run an effect with the event's subject as target.
    ForSubject { effect: Effect },
    /// Run an effect with the attacker as target.
    ForAttacker { effect: Effect },
    /// Run an effect with no target.
    WithSelf { effect: Effect },
    /// Reveal the secret that owns this reaction.
    RevealSecret,
    Batch { actions: Vec<ReactionAction> },
}

impl ReactionAction {
    /// What the payload must offer for this action to run.
    #[must_use]
    pub fn required(&self) -> Capabilities {
        let none = Capabilities::NONE;
        match self {
            ReactionAction::VetoCardPlay | ReactionAction::SummonCardPlayTarget { .. } => Capabilities {
                card_play: true,
                ..none
            },
            ReactionAction::VetoDamage => Capabilities {
                damage_request: true,
                ..none
            },
            ReactionAction::Misdirect
            | ReactionAction::MissTargetSometimes { .. }
            | ReactionAction::SummonAttackTarget { .. }
            | ReactionAction::ForAttacker { .. } => Capabilities {
                attack: true,
                ..none
            },
            ReactionAction::LifeStealForHero | ReactionAction::ReflectDamage { .. } => Capabilities {
                damage: true,
                ..none
            },
            ReactionAction::ForSubject { .. } => Capabilities {
                subject: true,
                ..none
            },
            ReactionAction::WithSelf { .. } | ReactionAction::RevealSecret | ReactionAction::Batch { .. } => {
                none
            }
        }
    }

    /// Type-check against an event kind and the owner's kind.
    pub fn check(&self, kind: EventKind, self_kind: SelfKind) -> Result<(), String> {
        match self {
            ReactionAction::Batch { actions } => {
                return actions.iter().try_for_each(|a| a.check(kind, self_kind));
            }
            ReactionAction::RevealSecret if self_kind != SelfKind::Secret => {
                return Err("reveal-secret must be bound to a secret".to_string());
            }
            ReactionAction::LifeStealForHero | ReactionAction::ReflectDamage { .. }
                if self_kind == SelfKind::Player =>
            {
                return Err(format!("{self:?} needs a damage source as owner"));
            }
            ReactionAction::MissTargetSometimes {
                miss_count,
                attack_count,
            } if *attack_count == 0 || miss_count > attack_count => {
                return Err(format!("cannot miss {miss_count} out of {attack_count} attacks"));
            }
            _ => {}
        }
        if !kind.capabilities().covers(&self.required()) {
            return Err(format!("action {self:?} does not apply to {kind} events"));
        }
        Ok(())
    }

    /// Collect every catalog card this action can create.
    pub fn collect_card_refs(&self, out: &mut Vec<CardId>) {
        match self {
            ReactionAction::SummonAttackTarget { card } | ReactionAction::SummonCardPlayTarget { card } => {
                out.push(*card)
            }
            ReactionAction::ForSubject { effect }
            | ReactionAction::ForAttacker { effect }
            | ReactionAction::WithSelf { effect } => effect.collect_card_refs(out),
            ReactionAction::Batch { actions } => {
                for action in actions {
                    action.collect_card_refs(out);
                }
            }
            ReactionAction::VetoCardPlay
            | ReactionAction::VetoDamage
            | ReactionAction::Misdirect
            | ReactionAction::MissTargetSometimes { .. }
            | ReactionAction::LifeStealForHero
            | ReactionAction::ReflectDamage { .. }
            | ReactionAction::RevealSecret => {}
        }
    }
}

/// A reaction a card arms while its entity is in play.
///
/// ## Example
///
/// ```
/// use ccg_rules::effects::{Effect, Selector};
/// use ccg_rules::events::{EventFilter, EventKind, Priority, ReactionAction, ReactionDef};
///
/// // "At the end of your turn, deal 1 damage to the enemy hero."
/// let def = ReactionDef::new(
///     EventKind::TurnEnds,
///     EventFilter::OwnTurn,
///     ReactionAction::WithSelf { effect: Effect::damage(1, Selector::EnemyHero) },
/// )
/// .with_priority(Priority::LOW);
///
/// assert_eq!(def.priority, Priority::LOW);
/// assert!(!def.trigger_once);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReactionDef {
    pub kind: EventKind,
    pub filter: EventFilter,
    pub action: ReactionAction,
    pub priority: Priority,
    /// Unregister after the first time the reaction runs.
    pub trigger_once: bool,
    /// Evaluate the filter right before running rather than at dispatch
    /// start.
    pub lazy_filter: bool,
}

impl ReactionDef {
    pub fn new(kind: EventKind, filter: EventFilter, action: ReactionAction) -> Self {
        Self {
            kind,
            filter,
            action,
            priority: Priority::NORMAL,
            trigger_once: false,
            lazy_filter: false,
        }
    }

    /// A secret's reaction: only on the opponent's turn, and revealing the
    /// secret after it runs.
    pub fn secret(kind: EventKind, filter: EventFilter, action: ReactionAction) -> Self {
        Self::new(
            kind,
            EventFilter::EnemyTurn.and(filter),
            ReactionAction::Batch {
                actions: vec![action, ReactionAction::RevealSecret],
            },
        )
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn trigger_once(mut self) -> Self {
        self.trigger_once = true;
        self
    }

    #[must_use]
    pub fn lazy(mut self) -> Self {
        self.lazy_filter = true;
        self
    }

    pub fn collect_card_refs(&self, out: &mut Vec<CardId>) {
        self.action.collect_card_refs(out);
    }
}

impl World {
    /// Run a reaction on behalf of `owner` against the payload being
    /// dispatched.
    pub fn run_reaction(&mut self, owner: &Actor, action: &ReactionAction, payload: &mut EventPayload) -> UndoAction {
        match action {
            ReactionAction::VetoCardPlay => {
                if let EventPayload::CardPlay { vetoed, .. } = payload {
                    *vetoed = true;
                }
                UndoAction::Nothing
            }
            ReactionAction::VetoDamage => {
                if let EventPayload::DamageRequest { vetoed, .. } = payload {
                    *vetoed = true;
                }
                UndoAction::Nothing
            }
            ReactionAction::Misdirect => {
                let EventPayload::Attack {
                    attacker, defender, ..
                } = *payload
                else {
                    return UndoAction::Nothing;
                };
                let candidates: Vec<_> = self
                    .living_characters()
                    .map(|c| (c.id(), c.owner()))
                    .filter(|(id, _)| *id != attacker && *id != defender)
                    .collect();
                if let Some(index) = self.rng_mut().roll(candidates.len()) {
                    redirect(payload, candidates[index]);
                }
                UndoAction::Nothing
            }
            ReactionAction::MissTargetSometimes {
                miss_count,
                attack_count,
            } => {
                let EventPayload::Attack {
                    defender,
                    defender_owner,
                    ..
                } = *payload
                else {
                    return UndoAction::Nothing;
                };
                let missed = self
                    .rng_mut()
                    .roll(*attack_count as usize)
                    .is_some_and(|roll| roll < *miss_count as usize);
                if !missed {
                    return UndoAction::Nothing;
                }
                let candidates: Vec<_> = self
                    .living_characters()
                    .filter(|c| c.owner() == defender_owner && c.id() != defender)
                    .map(|c| (c.id(), c.owner()))
                    .collect();
                if let Some(index) = self.rng_mut().roll(candidates.len()) {
                    redirect(payload, candidates[index]);
                }
                UndoAction::Nothing
            }
            ReactionAction::SummonAttackTarget { card } => {
                if !matches!(payload, EventPayload::Attack { .. }) {
                    return UndoAction::Nothing;
                }
                let summoned = self.summon_card_minion(owner.player, *card, usize::MAX);
                let Some(summoned) = log_skipped(summoned, "summon attack target") else {
                    return UndoAction::Nothing;
                };
                if let Some(minion) = summoned.value {
                    redirect(payload, (minion, owner.player));
                }
                summoned.undo
            }
            ReactionAction::SummonCardPlayTarget { card } => {
                if !matches!(payload, EventPayload::CardPlay { .. }) {
                    return UndoAction::Nothing;
                }
                let summoned = self.summon_card_minion(owner.player, *card, usize::MAX);
                let Some(summoned) = log_skipped(summoned, "summon card play target") else {
                    return UndoAction::Nothing;
                };
                if let (Some(minion), EventPayload::CardPlay { target, .. }) = (summoned.value, payload) {
                    *target = Some(minion);
                }
                summoned.undo
            }
            ReactionAction::LifeStealForHero => {
                let Some(dealt) = payload.amount().filter(|a| *a > 0) else {
                    return UndoAction::Nothing;
                };
                let hero = self.player(owner.player).hero().id();
                self.heal_character(DamageSource::from(owner), dealt, hero)
            }
            ReactionAction::ReflectDamage { targets } => {
                if payload.source() == Some(owner.entity) {
                    return UndoAction::Nothing;
                }
                let Some(dealt) = payload.amount().filter(|a| *a > 0) else {
                    return UndoAction::Nothing;
                };
                let damage = self.create_damage(owner, dealt);
                let ctx = EffectContext::new(*owner, payload.subject());
                let mut undo = UndoBuilder::new();
                for target in targets.select(self, &ctx) {
                    undo.add(self.damage_character(damage, target));
                }
                undo.build()
            }
            ReactionAction::ForSubject { effect } => match payload.subject() {
                Some(subject) => self.apply_effect(effect, &EffectContext::new(*owner, Some(subject))),
                None => UndoAction::Nothing,
            },
            ReactionAction::ForAttacker { effect } => match *payload {
                EventPayload::Attack { attacker, .. } => {
                    self.apply_effect(effect, &EffectContext::new(*owner, Some(attacker)))
                }
                _ => UndoAction::Nothing,
            },
            ReactionAction::WithSelf { effect } => self.apply_effect(effect, &EffectContext::new(*owner, None)),
            ReactionAction::RevealSecret => self.reveal_secret(owner.player, owner.entity),
            ReactionAction::Batch { actions } => {
                let mut undo = UndoBuilder::new();
                for action in actions {
                    undo.add(self.run_reaction(owner, action, payload));
                }
                undo.build()
            }
        }
    }
}

fn redirect(payload: &mut EventPayload, (id, owner): (EntityId, PlayerId)) {
    if let EventPayload::Attack {
        defender,
        defender_owner,
        ..
    } = payload
    {
        tracing::trace!(from = %defender, to = %id, "attack redirected");
        *defender = id;
        *defender_owner = owner;
    }
}

fn log_skipped<T>(result: EngineResult<T>, what: &str) -> Option<T> {
    result
        .map_err(|error| tracing::warn!(%error, reaction = what, "reaction skipped"))
        .ok()
}
