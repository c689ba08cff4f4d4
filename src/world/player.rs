//! One side of the table.
//!
//! A `Player` owns everything that belongs to one seat: hero, zones, mana,
//! weapon, secrets, graveyard and the per-turn counters. Fields are private;
//! every rules-level change goes through a mutator that returns its inverse.

use serde::Serialize;

use crate::cards::CardId;
use crate::core::{EntityId, PlayerId, RulesConfig};
use crate::error::EngineResult;
use crate::undo::{UndoAction, Undoable};
use crate::zones::{Board, Deck, Hand};

use super::character::{Hero, Minion};
use super::equipment::{Secret, Weapon};
use super::mana::ManaResource;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Player {
    id: PlayerId,
    hero: Hero,
    board: Board,
    hand: Hand,
    deck: Deck,
    mana: ManaResource,
    secrets: Vec<Secret>,
    weapon: Option<Weapon>,
    /// Dead minions, oldest first.
    graveyard: Vec<Minion>,
    fatigue: i32,
    cards_played_this_turn: u32,
    minions_played_this_turn: u32,
    /// Aura-derived; recomputed by `apply_auras`.
    spell_power: i32,
    /// Card ids played this match, in order.
    played_cards: Vec<CardId>,
}

impl Player {
    pub(crate) fn new(id: PlayerId, hero_id: EntityId, config: &RulesConfig) -> Self {
        Self {
            id,
            hero: Hero::new(hero_id, id, config.starting_health),
            board: Board::new(id, config.max_board_size),
            hand: Hand::new(id, config.max_hand_size),
            deck: Deck::new(id),
            mana: ManaResource::default(),
            secrets: Vec::new(),
            weapon: None,
            graveyard: Vec::new(),
            fatigue: 0,
            cards_played_this_turn: 0,
            minions_played_this_turn: 0,
            spell_power: 0,
            played_cards: Vec::new(),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn mana(&self) -> &ManaResource {
        &self.mana
    }

    #[must_use]
    pub fn secrets(&self) -> &[Secret] {
        &self.secrets
    }

    #[must_use]
    pub fn has_secret(&self, card: CardId) -> bool {
        self.secrets.iter().any(|s| s.card_id() == card)
    }

    #[must_use]
    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    #[must_use]
    pub fn graveyard(&self) -> &[Minion] {
        &self.graveyard
    }

    #[must_use]
    pub fn fatigue(&self) -> i32 {
        self.fatigue
    }

    #[must_use]
    pub fn cards_played_this_turn(&self) -> u32 {
        self.cards_played_this_turn
    }

    #[must_use]
    pub fn minions_played_this_turn(&self) -> u32 {
        self.minions_played_this_turn
    }

    #[must_use]
    pub fn spell_power(&self) -> i32 {
        self.spell_power
    }

    #[must_use]
    pub fn played_cards(&self) -> &[CardId] {
        &self.played_cards
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    pub(crate) fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    // === Undoable mutators ===

    /// Mutate the hero, recording its previous state if anything changed.
    pub(crate) fn update_hero<R>(&mut self, change: impl FnOnce(&mut Hero) -> R) -> Undoable<R> {
        let before = self.hero.clone();
        let value = change(&mut self.hero);
        if self.hero == before {
            return Undoable::unchanged(value);
        }
        Undoable::new(
            value,
            UndoAction::RestoreHero {
                player: self.id,
                hero: Box::new(before),
            },
        )
    }

    pub(crate) fn replace_hero(&mut self, hero: Hero) -> UndoAction {
        let before = std::mem::replace(&mut self.hero, hero);
        UndoAction::RestoreHero {
            player: self.id,
            hero: Box::new(before),
        }
    }

    /// Mutate the mana pool; a failing mutation leaves it untouched.
    pub(crate) fn update_mana(
        &mut self,
        change: impl FnOnce(&mut ManaResource) -> EngineResult<()>,
    ) -> EngineResult<UndoAction> {
        let mut next = self.mana;
        change(&mut next)?;
        if next == self.mana {
            return Ok(UndoAction::Nothing);
        }
        let before = std::mem::replace(&mut self.mana, next);
        Ok(UndoAction::RestoreMana {
            player: self.id,
            mana: before,
        })
    }

    fn counters_undo(&self) -> UndoAction {
        UndoAction::RestoreCounters {
            player: self.id,
            cards_played: self.cards_played_this_turn,
            minions_played: self.minions_played_this_turn,
        }
    }

    pub(crate) fn reset_counters(&mut self) -> UndoAction {
        if self.cards_played_this_turn == 0 && self.minions_played_this_turn == 0 {
            return UndoAction::Nothing;
        }
        let undo = self.counters_undo();
        self.cards_played_this_turn = 0;
        self.minions_played_this_turn = 0;
        undo
    }

    pub(crate) fn count_played(&mut self, minion: bool) -> UndoAction {
        let undo = self.counters_undo();
        self.cards_played_this_turn += 1;
        if minion {
            self.minions_played_this_turn += 1;
        }
        undo
    }

    /// Bump the fatigue counter and return its new value.
    pub(crate) fn increase_fatigue(&mut self) -> Undoable<i32> {
        let undo = UndoAction::RestoreFatigue {
            player: self.id,
            fatigue: self.fatigue,
        };
        self.fatigue += 1;
        Undoable::new(self.fatigue, undo)
    }

    pub(crate) fn set_spell_power(&mut self, spell_power: i32) -> UndoAction {
        if self.spell_power == spell_power {
            return UndoAction::Nothing;
        }
        let undo = UndoAction::RestoreSpellPower {
            player: self.id,
            spell_power: self.spell_power,
        };
        self.spell_power = spell_power;
        undo
    }

    pub(crate) fn record_played(&mut self, card: CardId) -> UndoAction {
        self.played_cards.push(card);
        UndoAction::PopPlayedCard { player: self.id }
    }

    /// Swap the equipped weapon, handing back the old one.
    pub(crate) fn replace_weapon(&mut self, weapon: Option<Weapon>) -> Undoable<Option<Weapon>> {
        let old = std::mem::replace(&mut self.weapon, weapon);
        let undo = UndoAction::RestoreWeapon {
            player: self.id,
            weapon: old.clone().map(Box::new),
        };
        Undoable::new(old, undo)
    }

    pub(crate) fn update_weapon(&mut self, change: impl FnOnce(&mut Weapon)) -> UndoAction {
        let Some(weapon) = self.weapon.as_mut() else {
            return UndoAction::Nothing;
        };
        let before = weapon.clone();
        change(weapon);
        if *weapon == before {
            return UndoAction::Nothing;
        }
        UndoAction::RestoreWeapon {
            player: self.id,
            weapon: Some(Box::new(before)),
        }
    }

    pub(crate) fn add_secret(&mut self, secret: Secret) -> UndoAction {
        let id = secret.id();
        self.secrets.push(secret);
        UndoAction::RemoveSecret {
            player: self.id,
            secret: id,
        }
    }

    pub(crate) fn remove_secret(&mut self, id: EntityId) -> Option<Undoable<Secret>> {
        let index = self.secrets.iter().position(|s| s.id() == id)?;
        let secret = self.secrets.remove(index);
        let undo = UndoAction::InsertSecret {
            player: self.id,
            index,
            secret: Box::new(secret.clone()),
        };
        Some(Undoable::new(secret, undo))
    }

    pub(crate) fn bury(&mut self, minion: Minion) -> UndoAction {
        self.graveyard.push(minion);
        UndoAction::PopGraveyard { player: self.id }
    }

    // === Inverse application ===

    pub(crate) fn restore_counters(&mut self, cards_played: u32, minions_played: u32) {
        self.cards_played_this_turn = cards_played;
        self.minions_played_this_turn = minions_played;
    }

    pub(crate) fn restore_fatigue(&mut self, fatigue: i32) {
        self.fatigue = fatigue;
    }

    pub(crate) fn restore_mana(&mut self, mana: ManaResource) {
        self.mana = mana;
    }

    pub(crate) fn restore_hero(&mut self, hero: Hero) {
        self.hero = hero;
    }

    pub(crate) fn restore_spell_power(&mut self, spell_power: i32) {
        self.spell_power = spell_power;
    }

    pub(crate) fn pop_played_card(&mut self) {
        self.played_cards.pop();
    }

    pub(crate) fn restore_weapon(&mut self, weapon: Option<Weapon>) {
        self.weapon = weapon;
    }

    pub(crate) fn take_secret(&mut self, id: EntityId) {
        self.secrets.retain(|s| s.id() != id);
    }

    pub(crate) fn insert_secret(&mut self, index: usize, secret: Secret) {
        let index = index.min(self.secrets.len());
        self.secrets.insert(index, secret);
    }

    pub(crate) fn pop_graveyard(&mut self) {
        self.graveyard.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn player() -> Player {
        Player::new(PlayerId::FIRST, EntityId(0), &RulesConfig::default())
    }

    #[test]
    fn test_new_player_uses_config() {
        let p = player();
        assert_eq!(p.hero().health(), 30);
        assert_eq!(p.board().capacity(), 7);
        assert!(p.hand().is_empty());
        assert_eq!(p.mana().mana(), 0);
    }

    #[test]
    fn test_failed_mana_update_changes_nothing() {
        let mut p = player();
        let err = p.update_mana(|m| m.spend(1, 0)).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientMana { .. }));
        assert_eq!(p.mana().mana(), 0);
    }

    #[test]
    fn test_counters_round_trip() {
        let mut p = player();
        let undo = p.count_played(true);
        assert_eq!((p.cards_played_this_turn(), p.minions_played_this_turn()), (1, 1));

        match undo {
            UndoAction::RestoreCounters { cards_played, minions_played, .. } => {
                p.restore_counters(cards_played, minions_played);
            }
            other => panic!("unexpected inverse {other:?}"),
        }
        assert_eq!(p.cards_played_this_turn(), 0);
    }

    #[test]
    fn test_update_hero_records_only_changes() {
        let mut p = player();
        assert!(p.update_hero(|h| h.heal(5)).undo.is_nothing());
        assert!(!p.update_hero(|h| h.gain_armor(2)).undo.is_nothing());
        assert_eq!(p.hero().armor(), 2);
    }

    #[test]
    fn test_fatigue_escalates() {
        let mut p = player();
        let values: Vec<_> = (0..3).map(|_| p.increase_fatigue().value).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }
}
