//! Heroes and minions.
//!
//! Characters are a tagged variant ([`Character`]) over the two concrete
//! kinds, plus three capability traits: [`Ownable`], [`Damageable`] and
//! [`Attacker`]. Code that only needs a capability takes the trait; code
//! that needs to tell the kinds apart matches on the variant.
//!
//! A dead minion is not removed on the spot. It keeps its slot, flagged
//! dead, until the death sweep moves it to the graveyard, so reactions
//! fired in the same resolution step still see it.

use std::sync::Arc;

use serde::Serialize;

use crate::cards::{CardId, Keyword, Keywords, MinionDescr};
use crate::core::{EntityId, PlayerId};

/// Something that belongs to a player.
pub trait Ownable {
    fn id(&self) -> EntityId;
    fn owner(&self) -> PlayerId;
}

/// Something with health that damage and healing apply to.
pub trait Damageable: Ownable {
    fn health(&self) -> i32;
    fn max_health(&self) -> i32;
    fn is_dead(&self) -> bool;

    fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    fn is_damaged(&self) -> bool {
        self.health() < self.max_health()
    }
}

/// Something that can declare attacks.
pub trait Attacker: Ownable {
    fn attack(&self) -> i32;
    fn can_attack(&self) -> bool;
}

// === Hero ===

/// A player's hero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hero {
    id: EntityId,
    owner: PlayerId,
    health: i32,
    max_health: i32,
    armor: i32,
    /// Attack gained this turn from effects.
    turn_attack: i32,
    /// Attack from the equipped weapon and hero auras.
    aura_attack: i32,
    attacks_this_turn: u32,
}

impl Hero {
    pub fn new(id: EntityId, owner: PlayerId, health: i32) -> Self {
        Self {
            id,
            owner,
            health,
            max_health: health,
            armor: 0,
            turn_attack: 0,
            aura_attack: 0,
            attacks_this_turn: 0,
        }
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
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    #[must_use]
    pub fn armor(&self) -> i32 {
        self.armor
    }

    #[must_use]
    pub fn attack(&self) -> i32 {
        (self.turn_attack + self.aura_attack).max(0)
    }

    #[must_use]
    pub fn aura_attack(&self) -> i32 {
        self.aura_attack
    }

    #[must_use]
    pub fn attacks_this_turn(&self) -> u32 {
        self.attacks_this_turn
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    #[must_use]
    pub fn can_attack(&self) -> bool {
        !self.is_dead() && self.attack() > 0 && self.attacks_this_turn < 1
    }

    /// Apply non-negative damage; armor soaks first. Returns the amount dealt.
    pub(crate) fn take_damage(&mut self, amount: i32) -> i32 {
        let soaked = amount.min(self.armor);
        self.armor -= soaked;
        self.health -= amount - soaked;
        amount
    }

    /// Restore health up to max. Returns the amount healed.
    pub(crate) fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.min(self.max_health - self.health).max(0);
        self.health += healed;
        healed
    }

    pub(crate) fn gain_armor(&mut self, amount: i32) {
        self.armor = (self.armor + amount).max(0);
    }

    pub(crate) fn add_turn_attack(&mut self, amount: i32) {
        self.turn_attack += amount;
    }

    pub(crate) fn set_aura_attack(&mut self, amount: i32) {
        self.aura_attack = amount;
    }

    pub(crate) fn record_attack(&mut self) {
        self.attacks_this_turn += 1;
    }

    /// Start-of-turn refresh: attacks become available again.
    pub(crate) fn refresh(&mut self) {
        self.attacks_this_turn = 0;
    }

    /// End-of-turn refresh: this-turn attack bonuses expire.
    pub(crate) fn refresh_end_of_turn(&mut self) {
        self.turn_attack = 0;
    }
}

// === Minion ===

/// A minion in play (or embedded in a minion card, waiting to be).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Minion {
    id: EntityId,
    owner: PlayerId,
    card: CardId,
    descr: Arc<MinionDescr>,
    keywords: Keywords,
    /// Base attack plus permanent buffs.
    attack: i32,
    turn_attack: i32,
    aura_attack: i32,
    health: i32,
    /// Base health plus permanent buffs plus aura health.
    max_health: i32,
    aura_health: i32,
    divine_shield: bool,
    summoning_sick: bool,
    attacks_this_turn: u32,
    destroyed: bool,
}

impl Minion {
    pub fn new(id: EntityId, owner: PlayerId, card: CardId, descr: Arc<MinionDescr>) -> Self {
        let divine_shield = descr.keywords.contains(&Keyword::DIVINE_SHIELD);
        Self {
            id,
            owner,
            card,
            keywords: descr.keywords.clone(),
            attack: descr.attack,
            turn_attack: 0,
            aura_attack: 0,
            health: descr.health,
            max_health: descr.health,
            aura_health: 0,
            divine_shield,
            summoning_sick: true,
            attacks_this_turn: 0,
            destroyed: false,
            descr,
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The card this minion was created from.
    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.card
    }

    #[must_use]
    pub fn descr(&self) -> &Arc<MinionDescr> {
        &self.descr
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descr.name
    }

    #[must_use]
    pub fn keywords(&self) -> &Keywords {
        &self.keywords
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: &Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    #[must_use]
    pub fn attack(&self) -> i32 {
        (self.attack + self.turn_attack + self.aura_attack).max(0)
    }

    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Current aura contribution as `(attack, health)`.
    #[must_use]
    pub fn aura_stats(&self) -> (i32, i32) {
        (self.aura_attack, self.aura_health)
    }

    #[must_use]
    pub fn has_divine_shield(&self) -> bool {
        self.divine_shield
    }

    #[must_use]
    pub fn is_summoning_sick(&self) -> bool {
        self.summoning_sick
    }

    #[must_use]
    pub fn attacks_this_turn(&self) -> u32 {
        self.attacks_this_turn
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.destroyed || self.health <= 0
    }

    #[must_use]
    pub fn has_taunt(&self) -> bool {
        self.has_keyword(&Keyword::TAUNT)
    }

    /// Spell damage bonus this minion grants while alive.
    #[must_use]
    pub fn spell_power(&self) -> i32 {
        if self.is_dead() {
            0
        } else {
            self.descr.spell_power
        }
    }

    #[must_use]
    pub fn max_attacks_per_turn(&self) -> u32 {
        if self.has_keyword(&Keyword::WINDFURY) {
            2
        } else {
            1
        }
    }

    #[must_use]
    pub fn can_attack(&self) -> bool {
        !self.is_dead()
            && self.attack() > 0
            && (!self.summoning_sick || self.has_keyword(&Keyword::CHARGE))
            && self.attacks_this_turn < self.max_attacks_per_turn()
    }

    /// Apply non-negative damage; divine shield absorbs one hit entirely.
    /// Returns the amount actually dealt.
    pub(crate) fn take_damage(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        if self.divine_shield {
            self.divine_shield = false;
            return 0;
        }
        self.health -= amount;
        amount
    }

    /// Restore health up to max. Returns the amount healed.
    pub(crate) fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.min(self.max_health - self.health).max(0);
        self.health += healed;
        healed
    }

    /// Permanent stat change.
    pub(crate) fn buff(&mut self, attack: i32, health: i32) {
        self.attack += attack;
        self.max_health += health;
        if health > 0 {
            self.health += health;
        } else {
            self.health = self.health.min(self.max_health);
        }
    }

    /// Replace the aura contribution.
    ///
    /// Gained aura health also raises current health; lost aura health only
    /// clamps current health to the new maximum, so auras never kill.
    pub(crate) fn set_aura(&mut self, attack: i32, health: i32) {
        self.aura_attack = attack;
        let delta = health - self.aura_health;
        self.aura_health = health;
        self.max_health += delta;
        if delta > 0 {
            self.health += delta;
        } else {
            self.health = self.health.min(self.max_health);
        }
    }

    pub(crate) fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub(crate) fn record_attack(&mut self) {
        self.attacks_this_turn += 1;
    }

    /// Start-of-turn refresh: no longer summoning sick, attacks available.
    pub(crate) fn refresh(&mut self) {
        self.summoning_sick = false;
        self.attacks_this_turn = 0;
    }

    /// End-of-turn refresh: this-turn attack bonuses expire.
    pub(crate) fn refresh_end_of_turn(&mut self) {
        self.turn_attack = 0;
    }

    pub(crate) fn add_turn_attack(&mut self, amount: i32) {
        self.turn_attack += amount;
    }
}

// === Capability impls ===

impl Ownable for Hero {
    fn id(&self) -> EntityId {
        Hero::id(self)
    }

    fn owner(&self) -> PlayerId {
        Hero::owner(self)
    }
}

impl Damageable for Hero {
    fn health(&self) -> i32 {
        Hero::health(self)
    }

    fn max_health(&self) -> i32 {
        Hero::max_health(self)
    }

    fn is_dead(&self) -> bool {
        Hero::is_dead(self)
    }
}

impl Attacker for Hero {
    fn attack(&self) -> i32 {
        Hero::attack(self)
    }

    fn can_attack(&self) -> bool {
        Hero::can_attack(self)
    }
}

impl Ownable for Minion {
    fn id(&self) -> EntityId {
        Minion::id(self)
    }

    fn owner(&self) -> PlayerId {
        Minion::owner(self)
    }
}

impl Damageable for Minion {
    fn health(&self) -> i32 {
        Minion::health(self)
    }

    fn max_health(&self) -> i32 {
        Minion::max_health(self)
    }

    fn is_dead(&self) -> bool {
        Minion::is_dead(self)
    }
}

impl Attacker for Minion {
    fn attack(&self) -> i32 {
        Minion::attack(self)
    }

    fn can_attack(&self) -> bool {
        Minion::can_attack(self)
    }
}

// === Tagged variant ===

/// A borrowed character of either kind.
#[derive(Clone, Copy, Debug)]
pub enum Character<'a> {
    Hero(&'a Hero),
    Minion(&'a Minion),
}

impl<'a> Character<'a> {
    #[must_use]
    pub fn is_hero(&self) -> bool {
        matches!(self, Character::Hero(_))
    }

    #[must_use]
    pub fn is_minion(&self) -> bool {
        matches!(self, Character::Minion(_))
    }

    #[must_use]
    pub fn as_minion(&self) -> Option<&'a Minion> {
        match *self {
            Character::Minion(m) => Some(m),
            Character::Hero(_) => None,
        }
    }

    /// Heroes carry no keywords.
    #[must_use]
    pub fn has_keyword(&self, keyword: &Keyword) -> bool {
        match self {
            Character::Hero(_) => false,
            Character::Minion(m) => m.has_keyword(keyword),
        }
    }

    #[must_use]
    pub fn has_taunt(&self) -> bool {
        match self {
            Character::Hero(_) => false,
            Character::Minion(m) => m.has_taunt(),
        }
    }
}

impl Ownable for Character<'_> {
    fn id(&self) -> EntityId {
        match self {
            Character::Hero(h) => h.id(),
            Character::Minion(m) => m.id(),
        }
    }

    fn owner(&self) -> PlayerId {
        match self {
            Character::Hero(h) => h.owner(),
            Character::Minion(m) => m.owner(),
        }
    }
}

impl Damageable for Character<'_> {
    fn health(&self) -> i32 {
        match self {
            Character::Hero(h) => h.health(),
            Character::Minion(m) => m.health(),
        }
    }

    fn max_health(&self) -> i32 {
        match self {
            Character::Hero(h) => h.max_health(),
            Character::Minion(m) => m.max_health(),
        }
    }

    fn is_dead(&self) -> bool {
        match self {
            Character::Hero(h) => h.is_dead(),
            Character::Minion(m) => m.is_dead(),
        }
    }
}

impl Attacker for Character<'_> {
    fn attack(&self) -> i32 {
        match self {
            Character::Hero(h) => h.attack(),
            Character::Minion(m) => m.attack(),
        }
    }

    fn can_attack(&self) -> bool {
        match self {
            Character::Hero(h) => h.can_attack(),
            Character::Minion(m) => m.can_attack(),
        }
    }
}

/// Where a character lives, without borrowing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterRef {
    Hero(PlayerId),
    Minion { owner: PlayerId, id: EntityId },
}

impl CharacterRef {
    #[must_use]
    pub fn owner(&self) -> PlayerId {
        match *self {
            CharacterRef::Hero(owner) => owner,
            CharacterRef::Minion { owner, .. } => owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minion(descr: MinionDescr) -> Minion {
        Minion::new(EntityId(5), PlayerId::FIRST, CardId(1), Arc::new(descr))
    }

    #[test]
    fn test_hero_armor_soaks_first() {
        let mut hero = Hero::new(EntityId(0), PlayerId::FIRST, 30);
        hero.gain_armor(3);

        assert_eq!(hero.take_damage(5), 5);
        assert_eq!(hero.armor(), 0);
        assert_eq!(hero.health(), 28);
    }

    #[test]
    fn test_hero_heal_caps_at_max() {
        let mut hero = Hero::new(EntityId(0), PlayerId::FIRST, 30);
        hero.take_damage(4);
        assert_eq!(hero.heal(10), 4);
        assert_eq!(hero.health(), 30);
    }

    #[test]
    fn test_minion_divine_shield_absorbs_one_hit() {
        let mut m = minion(MinionDescr::new("Squire", 1, 1).with_keyword(Keyword::DIVINE_SHIELD));

        assert_eq!(m.take_damage(4), 0);
        assert!(!m.has_divine_shield());
        assert!(m.is_alive());

        assert_eq!(m.take_damage(1), 1);
        assert!(m.is_dead());
    }

    #[test]
    fn test_minion_summoning_sickness_and_charge() {
        let mut plain = minion(MinionDescr::new("Yeti", 4, 5));
        assert!(!plain.can_attack());
        plain.refresh();
        assert!(plain.can_attack());

        let charger = minion(MinionDescr::new("Wolfrider", 3, 1).with_keyword(Keyword::CHARGE));
        assert!(charger.can_attack());
    }

    #[test]
    fn test_windfury_allows_two_attacks() {
        let mut m = minion(MinionDescr::new("Harpy", 4, 5).with_keyword(Keyword::WINDFURY));
        m.refresh();
        m.record_attack();
        assert!(m.can_attack());
        m.record_attack();
        assert!(!m.can_attack());
    }

    #[test]
    fn test_aura_health_gain_and_loss() {
        let mut m = minion(MinionDescr::new("Footman", 1, 2));
        m.set_aura(1, 1);
        assert_eq!((m.attack(), m.health(), m.max_health()), (2, 3, 3));

        m.take_damage(2);
        assert_eq!(m.health(), 1);

        // Losing the aura never kills.
        m.set_aura(0, 0);
        assert_eq!((m.attack(), m.health(), m.max_health()), (1, 1, 2));
        assert!(m.is_alive());
    }

    #[test]
    fn test_character_capabilities() {
        let hero = Hero::new(EntityId(0), PlayerId::SECOND, 30);
        let m = minion(MinionDescr::new("Guard", 1, 3).with_keyword(Keyword::TAUNT));

        let characters = [Character::Hero(&hero), Character::Minion(&m)];
        assert_eq!(characters[0].owner(), PlayerId::SECOND);
        assert!(characters[0].is_hero());
        assert!(!characters[0].has_taunt());
        assert!(characters[1].has_taunt());
        assert_eq!(characters[1].health(), 3);
        assert!(!characters[1].is_damaged());
    }
}
