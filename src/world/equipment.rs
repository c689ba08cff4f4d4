//! Weapons and secrets: permanents a player has in play besides minions.

use std::sync::Arc;

use serde::Serialize;

use crate::cards::{CardDescr, CardId};
use crate::core::{EntityId, PlayerId};
use crate::events::ReactionDef;

/// An equipped weapon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Weapon {
    id: EntityId,
    owner: PlayerId,
    descr: Arc<CardDescr>,
    attack: i32,
    durability: i32,
}

impl Weapon {
    /// Create a weapon from a weapon card. Returns `None` for other cards.
    pub fn from_card(id: EntityId, owner: PlayerId, descr: Arc<CardDescr>) -> Option<Self> {
        let (attack, durability) = {
            let template = descr.weapon.as_ref()?;
            (template.attack, template.durability)
        };
        Some(Self {
            id,
            owner,
            descr,
            attack,
            durability,
        })
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.descr.id
    }

    #[must_use]
    pub fn attack(&self) -> i32 {
        self.attack.max(0)
    }

    #[must_use]
    pub fn durability(&self) -> i32 {
        self.durability
    }

    /// Broken weapons are removed by the death sweep.
    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.durability <= 0
    }

    /// Reactions the weapon arms while equipped.
    #[must_use]
    pub fn reactions(&self) -> &[ReactionDef] {
        self.descr
            .weapon
            .as_ref()
            .map(|w| w.reactions.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn lose_durability(&mut self, amount: i32) {
        self.durability -= amount;
    }
}

/// A secret waiting for its trigger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Secret {
    id: EntityId,
    owner: PlayerId,
    descr: Arc<CardDescr>,
}

impl Secret {
    pub fn new(id: EntityId, owner: PlayerId, descr: Arc<CardDescr>) -> Self {
        Self { id, owner, descr }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.descr.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descr.name
    }

    #[must_use]
    pub fn reactions(&self) -> &[ReactionDef] {
        &self.descr.secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::WeaponDescr;

    #[test]
    fn test_weapon_from_card() {
        let axe = Arc::new(CardDescr::weapon(CardId(7), "Fiery War Axe", 2, WeaponDescr::new(3, 2)));
        let mut weapon = Weapon::from_card(EntityId(20), PlayerId::FIRST, axe).unwrap();

        assert_eq!(weapon.attack(), 3);
        assert_eq!(weapon.card_id(), CardId(7));
        assert!(weapon.reactions().is_empty());

        weapon.lose_durability(2);
        assert!(weapon.is_broken());
    }

    #[test]
    fn test_weapon_from_spell_is_none() {
        let spell = Arc::new(CardDescr::spell(CardId(8), "Coin", 0));
        assert!(Weapon::from_card(EntityId(21), PlayerId::FIRST, spell).is_none());
    }
}
