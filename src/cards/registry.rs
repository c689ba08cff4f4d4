//! Card registry for definition lookup.
//!
//! The `CardRegistry` is the resolved in-memory catalog a match is played
//! with. Definitions are shared through `Arc` so every card instance points
//! at the same immutable data.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{EngineError, EngineResult};

use super::definition::{CardDescr, CardId, CardType};

/// Registry of card definitions.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{CardDescr, CardId, CardRegistry};
///
/// let mut registry = CardRegistry::new();
/// registry.register(CardDescr::spell(CardId::new(1), "Moonfire", 0)).unwrap();
///
/// let found = registry.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Moonfire");
/// assert!(registry.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Arc<CardDescr>>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition. Duplicate ids are rejected.
    pub fn register(&mut self, card: CardDescr) -> EngineResult<Arc<CardDescr>> {
        if self.cards.contains_key(&card.id) {
            return Err(EngineError::invalid(format!("{} registered twice", card.id)));
        }
        let card = Arc::new(card);
        self.cards.insert(card.id, Arc::clone(&card));
        Ok(card)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Arc<CardDescr>> {
        self.cards.get(&id)
    }

    /// Get a card definition, failing with `UnknownCard`.
    pub fn require(&self, id: CardId) -> EngineResult<&Arc<CardDescr>> {
        self.get(id).ok_or(EngineError::UnknownCard(id))
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardDescr>> {
        self.cards.values()
    }

    pub fn find_by_type(&self, card_type: CardType) -> impl Iterator<Item = &Arc<CardDescr>> {
        self.cards.values().filter(move |c| c.card_type == card_type)
    }

    /// Fail fast on definitions that could never resolve at play time:
    /// dangling card references, and minion or weapon cards missing their
    /// template.
    pub fn validate(&self) -> EngineResult<()> {
        let mut ids: Vec<_> = self.cards.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            let Some(card) = self.cards.get(&id) else {
                continue;
            };
            match card.card_type {
                CardType::Minion if card.minion.is_none() => {
                    return Err(EngineError::invalid(format!("{id} is a minion card without a minion")));
                }
                CardType::Weapon if card.weapon.is_none() => {
                    return Err(EngineError::invalid(format!("{id} is a weapon card without a weapon")));
                }
                _ => {}
            }
            if let Some(missing) = card.referenced_cards().into_iter().find(|r| !self.contains(*r)) {
                return Err(EngineError::UnknownCard(missing));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::MinionDescr;
    use crate::effects::Effect;

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = CardRegistry::new();
        registry.register(CardDescr::spell(CardId(1), "A", 1)).unwrap();
        let err = registry.register(CardDescr::spell(CardId(1), "B", 1)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_by_type() {
        let mut registry = CardRegistry::new();
        registry.register(CardDescr::spell(CardId(1), "Spell", 1)).unwrap();
        registry
            .register(CardDescr::minion(CardId(2), "Wisp", 0, MinionDescr::new("Wisp", 1, 1)))
            .unwrap();

        assert_eq!(registry.find_by_type(CardType::Minion).count(), 1);
        assert_eq!(registry.find_by_type(CardType::Weapon).count(), 0);
    }

    #[test]
    fn test_validate_reports_dangling_reference() {
        let mut registry = CardRegistry::new();
        registry
            .register(
                CardDescr::spell(CardId(1), "Summon", 1)
                    .with_on_play(Effect::SummonMinion { card: CardId(99), enemy_side: false }),
            )
            .unwrap();

        assert_eq!(registry.validate(), Err(EngineError::UnknownCard(CardId(99))));
        assert!(matches!(registry.require(CardId(5)), Err(EngineError::UnknownCard(_))));
    }
}
