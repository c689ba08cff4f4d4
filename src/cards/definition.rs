//! Card definitions - static card data.
//!
//! `CardDescr` holds the immutable properties of a card: its cost, type,
//! keywords and the ordered lists of actions it performs when played or
//! drawn. Minion and weapon cards embed a template for the permanent they
//! put into play.
//!
//! Instance data (cost buffs, the embedded minion's current health) lives
//! in `Card`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};
use crate::effects::Effect;
use crate::events::ReactionDef;
use crate::world::{AuraDef, World};

use super::keyword::{Keyword, Keywords};

/// Unique identifier for a card definition.
///
/// This identifies the "type" of card, not a specific copy in a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// The three kinds of card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardType {
    Minion,
    Spell,
    Weapon,
}

/// Condition an on-play action must meet to be queued.
///
/// Requirements are checked once, before any event of the play fires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PlayRequirement {
    /// Always queued.
    Always,
    /// Only when the play named a target.
    HasTarget,
    /// The player has at least this many minions on board.
    OwnMinionsAtLeast { count: usize },
    /// The opponent has at least this many minions on board.
    EnemyMinionsAtLeast { count: usize },
    /// Combo: this many other cards were played earlier this turn.
    CardsPlayedThisTurn { count: u32 },
    /// The player has a weapon equipped.
    HasWeapon,
}

impl PlayRequirement {
    /// Evaluate against the world as it is before the card resolves.
    #[must_use]
    pub fn is_met(&self, world: &World, player: PlayerId, target: Option<EntityId>) -> bool {
        let me = world.player(player);
        match self {
            PlayRequirement::Always => true,
            PlayRequirement::HasTarget => target.is_some(),
            PlayRequirement::OwnMinionsAtLeast { count } => me.board().len() >= *count,
            PlayRequirement::EnemyMinionsAtLeast { count } => {
                world.player(player.opponent()).board().len() >= *count
            }
            PlayRequirement::CardsPlayedThisTurn { count } => me.cards_played_this_turn() >= *count,
            PlayRequirement::HasWeapon => me.weapon().is_some(),
        }
    }
}

/// An on-play action paired with the requirement gating it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayActionDef {
    pub requirement: PlayRequirement,
    pub effect: Effect,
}

/// Dynamic adjustment to a card's mana cost.
///
/// Adjusters are applied in declaration order on top of the base cost and
/// any buffs; the total is clamped at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ManaCostAdjuster {
    /// `delta` per minion the owner controls.
    PerOwnMinion { delta: i32 },
    /// `delta` per minion the opponent controls.
    PerEnemyMinion { delta: i32 },
    /// `delta` per other card in the owner's hand.
    PerOtherCardInHand { delta: i32 },
}

impl ManaCostAdjuster {
    /// Cost change contributed by this adjuster for a card owned by `owner`.
    #[must_use]
    pub fn adjustment(&self, world: &World, owner: PlayerId) -> i32 {
        match *self {
            ManaCostAdjuster::PerOwnMinion { delta } => {
                delta * world.player(owner).board().len() as i32
            }
            ManaCostAdjuster::PerEnemyMinion { delta } => {
                delta * world.player(owner.opponent()).board().len() as i32
            }
            ManaCostAdjuster::PerOtherCardInHand { delta } => {
                let others = world.player(owner).hand().len().saturating_sub(1);
                delta * others as i32
            }
        }
    }
}

/// One branch of a choose-one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChooseOneOption {
    pub name: String,
    pub on_play: Vec<PlayActionDef>,
}

/// Template for the minion a card (or an effect) puts into play.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{Keyword, MinionDescr};
///
/// let wolf = MinionDescr::new("Timber Wolf", 1, 1)
///     .with_keyword(Keyword::BEAST)
///     .with_spell_power(1);
///
/// assert_eq!(wolf.attack, 1);
/// assert!(wolf.keywords.contains(&Keyword::BEAST));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MinionDescr {
    pub name: String,
    pub attack: i32,
    pub health: i32,
    pub keywords: Keywords,
    /// Spell damage bonus granted to the owner while alive.
    pub spell_power: i32,
    pub aura: Option<AuraDef>,
    /// Event reactions active while the minion is in play.
    pub reactions: Vec<ReactionDef>,
    /// Effects run by the death sweep, with the dead minion as actor.
    pub deathrattle: Vec<Effect>,
}

impl MinionDescr {
    /// Create a vanilla minion template.
    pub fn new(name: impl Into<String>, attack: i32, health: i32) -> Self {
        Self {
            name: name.into(),
            attack,
            health,
            keywords: Keywords::new(),
            spell_power: 0,
            aura: None,
            reactions: Vec::new(),
            deathrattle: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn with_spell_power(mut self, spell_power: i32) -> Self {
        self.spell_power = spell_power;
        self
    }

    #[must_use]
    pub fn with_aura(mut self, aura: AuraDef) -> Self {
        self.aura = Some(aura);
        self
    }

    #[must_use]
    pub fn with_reaction(mut self, reaction: ReactionDef) -> Self {
        self.reactions.push(reaction);
        self
    }

    #[must_use]
    pub fn with_reactions(mut self, reactions: impl IntoIterator<Item = ReactionDef>) -> Self {
        self.reactions.extend(reactions);
        self
    }

    /// Add a deathrattle effect; also tags the minion with the keyword.
    #[must_use]
    pub fn with_deathrattle(mut self, effect: Effect) -> Self {
        self.deathrattle.push(effect);
        self.keywords.insert(Keyword::DEATHRATTLE);
        self
    }
}

/// Template for an equipped weapon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeaponDescr {
    pub attack: i32,
    pub durability: i32,
    pub reactions: Vec<ReactionDef>,
}

impl WeaponDescr {
    pub fn new(attack: i32, durability: i32) -> Self {
        Self {
            attack,
            durability,
            reactions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_reaction(mut self, reaction: ReactionDef) -> Self {
        self.reactions.push(reaction);
        self
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{CardDescr, CardId, CardType, MinionDescr};
/// use ccg_rules::effects::{Effect, Selector};
///
/// let ogre = CardDescr::minion(CardId::new(1), "Boulderfist Ogre", 6, MinionDescr::new("Boulderfist Ogre", 6, 7));
/// let bolt = CardDescr::spell(CardId::new(2), "Frostbolt", 2)
///     .with_on_play(Effect::damage(3, Selector::Target));
///
/// assert_eq!(ogre.card_type, CardType::Minion);
/// assert_eq!(bolt.on_play.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardDescr {
    pub id: CardId,
    pub name: String,
    pub card_type: CardType,
    /// Base mana cost, never negative.
    pub mana_cost: i32,
    /// Mana locked on the owner's next turn.
    pub overload: i32,
    pub keywords: Keywords,
    pub on_play: Vec<PlayActionDef>,
    pub on_draw: Vec<Effect>,
    pub choose_one: Vec<ChooseOneOption>,
    pub minion: Option<Arc<MinionDescr>>,
    pub weapon: Option<WeaponDescr>,
    /// Reactions armed while the card sits in play as a secret.
    pub secret: Vec<ReactionDef>,
    pub cost_adjusters: Vec<ManaCostAdjuster>,
}

impl CardDescr {
    fn base(id: CardId, name: impl Into<String>, card_type: CardType, mana_cost: i32) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            mana_cost: mana_cost.max(0),
            overload: 0,
            keywords: Keywords::new(),
            on_play: Vec::new(),
            on_draw: Vec::new(),
            choose_one: Vec::new(),
            minion: None,
            weapon: None,
            secret: Vec::new(),
            cost_adjusters: Vec::new(),
        }
    }

    /// A minion card. The card's keywords start as the minion's.
    pub fn minion(id: CardId, name: impl Into<String>, mana_cost: i32, minion: MinionDescr) -> Self {
        let mut descr = Self::base(id, name, CardType::Minion, mana_cost);
        descr.keywords = minion.keywords.clone();
        descr.minion = Some(Arc::new(minion));
        descr
    }

    /// A spell card.
    pub fn spell(id: CardId, name: impl Into<String>, mana_cost: i32) -> Self {
        Self::base(id, name, CardType::Spell, mana_cost)
    }

    /// A weapon card.
    pub fn weapon(id: CardId, name: impl Into<String>, mana_cost: i32, weapon: WeaponDescr) -> Self {
        let mut descr = Self::base(id, name, CardType::Weapon, mana_cost);
        descr.weapon = Some(weapon);
        descr
    }

    /// Add an unconditional on-play action.
    #[must_use]
    pub fn with_on_play(self, effect: Effect) -> Self {
        self.with_on_play_if(PlayRequirement::Always, effect)
    }

    /// Add an on-play action gated by a requirement.
    #[must_use]
    pub fn with_on_play_if(mut self, requirement: PlayRequirement, effect: Effect) -> Self {
        self.on_play.push(PlayActionDef { requirement, effect });
        self
    }

    #[must_use]
    pub fn with_on_draw(mut self, effect: Effect) -> Self {
        self.on_draw.push(effect);
        self
    }

    #[must_use]
    pub fn with_choose_one(mut self, name: impl Into<String>, on_play: Vec<PlayActionDef>) -> Self {
        self.choose_one.push(ChooseOneOption {
            name: name.into(),
            on_play,
        });
        self
    }

    #[must_use]
    pub fn with_overload(mut self, overload: i32) -> Self {
        self.overload = overload.max(0);
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn with_cost_adjuster(mut self, adjuster: ManaCostAdjuster) -> Self {
        self.cost_adjusters.push(adjuster);
        self
    }

    /// Make this spell a secret armed with the given reactions.
    #[must_use]
    pub fn with_secret(mut self, reactions: impl IntoIterator<Item = ReactionDef>) -> Self {
        self.secret.extend(reactions);
        self.keywords.insert(Keyword::SECRET);
        self
    }

    #[must_use]
    pub fn is_secret(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Every card id this definition refers to, for catalog validation.
    pub fn referenced_cards(&self) -> Vec<CardId> {
        let mut out = Vec::new();
        let play_effects = self
            .on_play
            .iter()
            .chain(self.choose_one.iter().flat_map(|o| o.on_play.iter()))
            .map(|a| &a.effect);
        for effect in play_effects.chain(self.on_draw.iter()) {
            effect.collect_card_refs(&mut out);
        }
        if let Some(minion) = &self.minion {
            for effect in &minion.deathrattle {
                effect.collect_card_refs(&mut out);
            }
            for reaction in &minion.reactions {
                reaction.collect_card_refs(&mut out);
            }
        }
        if let Some(weapon) = &self.weapon {
            for reaction in &weapon.reactions {
                reaction.collect_card_refs(&mut out);
            }
        }
        for reaction in &self.secret {
            reaction.collect_card_refs(&mut out);
        }
        out
    }
}
