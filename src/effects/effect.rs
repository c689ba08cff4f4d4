//! Effect definitions.
//!
//! Effects are data. A card lists them; [`World::apply_effect`] interprets
//! them against an [`EffectContext`], returning the composed inverse.
//!
//! [`World::apply_effect`]: crate::world::World::apply_effect
//! [`EffectContext`]: super::EffectContext

use serde::{Deserialize, Serialize};

use crate::cards::CardId;

use super::multi_target::MultiTargeter;
use super::targeting::Selector;

/// A game-state change performed on behalf of an actor.
///
/// ## Example
///
/// ```
/// use ccg_rules::effects::{Effect, Selector};
///
/// let effect: Effect = serde_json::from_str(
///     r#"{ "type": "damage", "amount": 2, "targets": { "type": "enemy-hero" } }"#,
/// ).unwrap();
/// assert_eq!(effect, Effect::damage(2, Selector::EnemyHero));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Effect {
    /// Damage each selected character. Cards add spell power.
    Damage { amount: i32, targets: Selector },
    Heal { amount: i32, targets: Selector },
    /// Damage everything a multi-targeter covers.
    DamageAll { amount: i32, targeter: MultiTargeter },
    /// `count` times, one damage to a random member of `targets`, which is
    /// re-selected before every bomb.
    ThrowBombs { count: u32, targets: Selector },
    Destroy { targets: Selector },
    Buff { attack: i32, health: i32, targets: Selector },
    GainArmor { amount: i32 },
    DrawCards { count: u32 },
    AddCardToHand { card: CardId },
    /// Lower the cost of every card in the actor's hand.
    ReduceHandCost { amount: i32 },
    /// Temporary mana, this turn only.
    GainMana { amount: i32 },
    SummonMinion {
        card: CardId,
        #[serde(default)]
        enemy_side: bool,
    },
    EquipWeapon { card: CardId },
    /// Run `effect` once per selected character, with it as the target.
    ForTargets { targets: Selector, effect: Box<Effect> },
    Batch { effects: Vec<Effect> },
}

impl Effect {
    /// Damage the selected characters.
    #[must_use]
    pub fn damage(amount: i32, targets: Selector) -> Self {
        Effect::Damage { amount, targets }
    }

    #[must_use]
    pub fn heal(amount: i32, targets: Selector) -> Self {
        Effect::Heal { amount, targets }
    }

    /// Collect every catalog card this effect can create.
    pub fn collect_card_refs(&self, out: &mut Vec<CardId>) {
        match self {
            Effect::AddCardToHand { card }
            | Effect::SummonMinion { card, .. }
            | Effect::EquipWeapon { card } => out.push(*card),
            Effect::ForTargets { effect, .. } => effect.collect_card_refs(out),
            Effect::Batch { effects } => {
                for effect in effects {
                    effect.collect_card_refs(out);
                }
            }
            Effect::Damage { .. }
            | Effect::Heal { .. }
            | Effect::DamageAll { .. }
            | Effect::ThrowBombs { .. }
            | Effect::Destroy { .. }
            | Effect::Buff { .. }
            | Effect::GainArmor { .. }
            | Effect::DrawCards { .. }
            | Effect::ReduceHandCost { .. }
            | Effect::GainMana { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EntityFilter;

    #[test]
    fn test_nested_card_refs() {
        let effect = Effect::Batch {
            effects: vec![
                Effect::GainArmor { amount: 2 },
                Effect::ForTargets {
                    targets: Selector::Target,
                    effect: Box::new(Effect::SummonMinion { card: CardId(3), enemy_side: true }),
                },
                Effect::EquipWeapon { card: CardId(4) },
            ],
        };
        let mut refs = Vec::new();
        effect.collect_card_refs(&mut refs);
        assert_eq!(refs, vec![CardId(3), CardId(4)]);
    }

    #[test]
    fn test_json_shape() {
        let effect = Effect::Destroy {
            targets: Selector::EnemyHero.filtered(EntityFilter::RandomN { count: 2 }),
        };
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["type"], "destroy");
        assert_eq!(json["targets"]["type"], "filtered");
        assert_eq!(json["targets"]["filter"]["type"], "random-n");

        let summon: Effect = serde_json::from_str(r#"{ "type": "summon-minion", "card": 7 }"#).unwrap();
        assert_eq!(summon, Effect::SummonMinion { card: CardId(7), enemy_side: false });
    }
}
