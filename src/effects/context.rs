//! Who is acting, and on what.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};

/// The kind of entity a reaction or effect is bound to.
///
/// Reaction definitions are type-checked against this when parsed: an
/// action that needs a character as "self" cannot be bound to a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelfKind {
    Player,
    Hero,
    Minion,
    Card,
    Weapon,
    Secret,
}

impl SelfKind {
    /// Heroes and minions.
    #[must_use]
    pub fn is_character(self) -> bool {
        matches!(self, SelfKind::Hero | SelfKind::Minion)
    }
}

/// The entity an effect or reaction acts on behalf of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub player: PlayerId,
    pub entity: EntityId,
    pub kind: SelfKind,
}

impl Actor {
    pub fn new(player: PlayerId, entity: EntityId, kind: SelfKind) -> Self {
        Self {
            player,
            entity,
            kind,
        }
    }

    pub fn minion(player: PlayerId, entity: EntityId) -> Self {
        Self::new(player, entity, SelfKind::Minion)
    }

    pub fn card(player: PlayerId, entity: EntityId) -> Self {
        Self::new(player, entity, SelfKind::Card)
    }
}

/// Actor plus the chosen or inherited target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub actor: Actor,
    pub target: Option<EntityId>,
}

impl EffectContext {
    pub fn new(actor: Actor, target: Option<EntityId>) -> Self {
        Self { actor, target }
    }

    /// Same actor, different target.
    #[must_use]
    pub fn retarget(&self, target: Option<EntityId>) -> Self {
        Self {
            actor: self.actor,
            target,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.actor.player
    }
}
