//! Reaction registrations and the per-kind channels that hold them.
//!
//! Each channel keeps its registrations sorted by descending priority;
//! registrations of equal priority keep their registration order. Channels
//! are `im::Vector`s so a dispatch can iterate over an O(1) snapshot while
//! reactions add and remove registrations underneath it.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::effects::Actor;
use crate::undo::{UndoAction, Undoable};

use super::condition::EventFilter;
use super::event::EventKind;
use super::reaction::{ReactionAction, ReactionDef};

/// Unique identifier for a registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistrationId(pub u32);

impl RegistrationId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Registration({})", self.0)
    }
}

/// Dispatch priority. Higher fires first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    pub const LOWEST: Priority = Priority(-2000);
    pub const LOW: Priority = Priority(-1000);
    pub const NORMAL: Priority = Priority(0);
    pub const HIGH: Priority = Priority(1000);
    pub const HIGHEST: Priority = Priority(2000);

    /// Look up a named level, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lowest" => Some(Self::LOWEST),
            "low" => Some(Self::LOW),
            "normal" => Some(Self::NORMAL),
            "high" => Some(Self::HIGH),
            "highest" => Some(Self::HIGHEST),
            _ => None,
        }
    }
}

/// A reaction bound to an owner on one channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub id: RegistrationId,
    /// Registration order, the tie-break between equal priorities.
    pub seq: u64,
    pub kind: EventKind,
    pub priority: Priority,
    pub owner: Actor,
    pub filter: EventFilter,
    pub action: ReactionAction,
    pub trigger_once: bool,
    pub lazy_filter: bool,
}

impl Registration {
    fn sorts_before(&self, other: &Registration) -> bool {
        (other.priority, self.seq) < (self.priority, other.seq)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
struct Channel {
    global_filter: Option<EventFilter>,
    registrations: im::Vector<Registration>,
}

/// All event channels of a world.
///
/// ## Example
///
/// ```
/// use ccg_rules::core::{EntityId, PlayerId};
/// use ccg_rules::effects::{Actor, SelfKind};
/// use ccg_rules::events::{EventBus, EventFilter, EventKind, Priority, ReactionAction, ReactionDef};
///
/// let mut bus = EventBus::new();
/// let owner = Actor::new(PlayerId::FIRST, EntityId(0), SelfKind::Hero);
/// let low = ReactionDef::new(EventKind::TurnStarts, EventFilter::Any, ReactionAction::VetoCardPlay)
///     .with_priority(Priority::LOW);
/// let high = low.clone().with_priority(Priority::HIGH);
///
/// let first = bus.register(owner, &low).value;
/// let second = bus.register(owner, &high).value;
///
/// let order: Vec<_> = bus.registrations(EventKind::TurnStarts).iter().map(|r| r.id).collect();
/// assert_eq!(order, vec![second, first]);
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct EventBus {
    channels: Vec<Channel>,
    #[serde(skip)]
    next_id: u32,
    #[serde(skip)]
    next_seq: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: vec![Channel::default(); EventKind::ALL.len()],
            next_id: 0,
            next_seq: 0,
        }
    }

    fn channel(&self, kind: EventKind) -> &Channel {
        &self.channels[kind.index()]
    }

    fn channel_mut(&mut self, kind: EventKind) -> &mut Channel {
        &mut self.channels[kind.index()]
    }

    /// Bind a reaction to `owner`. The inverse unregisters it.
    pub fn register(&mut self, owner: Actor, def: &ReactionDef) -> Undoable<RegistrationId> {
        let id = RegistrationId(self.next_id);
        self.next_id += 1;
        let seq = self.next_seq;
        self.next_seq += 1;

        self.reinsert(Registration {
            id,
            seq,
            kind: def.kind,
            priority: def.priority,
            owner,
            filter: def.filter.clone(),
            action: def.action.clone(),
            trigger_once: def.trigger_once,
            lazy_filter: def.lazy_filter,
        });
        Undoable::new(id, UndoAction::Unregister { kind: def.kind, id })
    }

    /// Remove a registration. The inverse puts it back in its old place.
    pub fn unregister(&mut self, kind: EventKind, id: RegistrationId) -> Option<Undoable<Registration>> {
        let registrations = &mut self.channel_mut(kind).registrations;
        let index = registrations.iter().position(|r| r.id == id)?;
        let registration = registrations.remove(index);
        let undo = UndoAction::Reregister {
            registration: Box::new(registration.clone()),
        };
        Some(Undoable::new(registration, undo))
    }

    /// Registrations on a channel, in dispatch order.
    #[must_use]
    pub fn registrations(&self, kind: EventKind) -> &im::Vector<Registration> {
        &self.channel(kind).registrations
    }

    #[must_use]
    pub fn contains(&self, kind: EventKind, id: RegistrationId) -> bool {
        self.registrations(kind).iter().any(|r| r.id == id)
    }

    /// Every registration whose owner is `entity`, across all channels.
    pub fn owned_by(&self, entity: EntityId) -> impl Iterator<Item = &Registration> + '_ {
        self.channels
            .iter()
            .flat_map(|c| c.registrations.iter())
            .filter(move |r| r.owner.entity == entity)
    }

    /// Total number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.iter().map(|c| c.registrations.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn global_filter(&self, kind: EventKind) -> Option<&EventFilter> {
        self.channel(kind).global_filter.as_ref()
    }

    /// Setup: a filter every reaction on `kind` must also pass.
    pub fn set_global_filter(&mut self, kind: EventKind, filter: Option<EventFilter>) {
        self.channel_mut(kind).global_filter = filter;
    }

    // === Inverse application ===

    pub(crate) fn remove(&mut self, kind: EventKind, id: RegistrationId) {
        let registrations = &mut self.channel_mut(kind).registrations;
        if let Some(index) = registrations.iter().position(|r| r.id == id) {
            registrations.remove(index);
        }
    }

    pub(crate) fn reinsert(&mut self, registration: Registration) {
        let registrations = &mut self.channel_mut(registration.kind).registrations;
        let index = registrations
            .iter()
            .position(|r| registration.sorts_before(r))
            .unwrap_or(registrations.len());
        registrations.insert(index, registration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::effects::SelfKind;

    fn owner(id: u32) -> Actor {
        Actor::new(PlayerId::FIRST, EntityId(id), SelfKind::Minion)
    }

    fn def(priority: Priority) -> ReactionDef {
        ReactionDef::new(EventKind::DamageDealt, EventFilter::Any, ReactionAction::VetoDamage)
            .with_priority(priority)
    }

    fn order(bus: &EventBus) -> Vec<u32> {
        bus.registrations(EventKind::DamageDealt)
            .iter()
            .map(|r| r.owner.entity.raw())
            .collect()
    }

    #[test]
    fn test_priority_then_registration_order() {
        let mut bus = EventBus::new();
        let _ = bus.register(owner(1), &def(Priority::NORMAL));
        let _ = bus.register(owner(2), &def(Priority::HIGHEST));
        let _ = bus.register(owner(3), &def(Priority::NORMAL));
        let _ = bus.register(owner(4), &def(Priority::LOWEST));
        let _ = bus.register(owner(5), &def(Priority::HIGHEST));

        assert_eq!(order(&bus), vec![2, 5, 1, 3, 4]);
    }

    #[test]
    fn test_unregister_then_reinsert_keeps_place() {
        let mut bus = EventBus::new();
        let _ = bus.register(owner(1), &def(Priority::NORMAL));
        let middle = bus.register(owner(2), &def(Priority::NORMAL)).value;
        let _ = bus.register(owner(3), &def(Priority::NORMAL));

        let removed = bus.unregister(EventKind::DamageDealt, middle).unwrap();
        assert_eq!(order(&bus), vec![1, 3]);
        assert!(!bus.contains(EventKind::DamageDealt, middle));

        match removed.undo {
            UndoAction::Reregister { registration } => bus.reinsert(*registration),
            other => panic!("unexpected inverse {other:?}"),
        }
        assert_eq!(order(&bus), vec![1, 2, 3]);
        assert!(bus.unregister(EventKind::TurnEnds, middle).is_none());
    }

    #[test]
    fn test_owned_by_spans_channels() {
        let mut bus = EventBus::new();
        let _ = bus.register(owner(7), &def(Priority::NORMAL));
        let turn = ReactionDef::new(EventKind::TurnEnds, EventFilter::OwnTurn, ReactionAction::VetoCardPlay);
        let _ = bus.register(owner(7), &turn);
        let _ = bus.register(owner(8), &turn);

        assert_eq!(bus.owned_by(EntityId(7)).count(), 2);
        assert_eq!(bus.len(), 3);
    }

    #[test]
    fn test_priority_names() {
        assert_eq!(Priority::from_name("Highest"), Some(Priority::HIGHEST));
        assert_eq!(Priority::from_name("low"), Some(Priority::LOW));
        assert_eq!(Priority::from_name("urgent"), None);
        assert!(Priority::HIGH > Priority::NORMAL);
    }
}
