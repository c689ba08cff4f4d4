//! The root aggregate of a match.

use std::sync::Arc;

use im::Vector;
use serde::Serialize;

use crate::cards::{Card, CardId, CardRegistry};
use crate::core::{
    ActionRecord, EntityAllocator, EntityId, GameAction, GameRng, PlayerId, PlayerMap, RulesConfig,
};
use crate::error::{EngineError, EngineResult};
use crate::events::EventBus;
use crate::undo::{UndoAction, Undoable};
use crate::zones::ZonePosition;

use super::character::{Character, CharacterRef, Hero, Minion};
use super::player::Player;

/// The whole mutable state of one match.
///
/// A `World` is created once per match with both players in place and is
/// only ever changed through operations that return an [`UndoAction`].
/// Entities refer to each other by [`EntityId`] and [`PlayerId`]; the world
/// owns every arena they index into.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use ccg_rules::cards::CardRegistry;
/// use ccg_rules::core::{PlayerId, RulesConfig};
/// use ccg_rules::world::World;
///
/// let mut world = World::new(RulesConfig::default(), Arc::new(CardRegistry::new())).unwrap();
/// let before = world.snapshot().unwrap();
///
/// let undo = world.set_mana(PlayerId::FIRST, 10, 10);
/// assert_eq!(world.player(PlayerId::FIRST).mana().mana(), 10);
///
/// world.undo(undo);
/// assert_eq!(world.snapshot().unwrap(), before);
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct World {
    config: RulesConfig,
    players: PlayerMap<Player>,
    turn: u32,
    active_player: PlayerId,
    events: EventBus,
    history: Vector<ActionRecord>,
    #[serde(skip)]
    allocator: EntityAllocator,
    #[serde(skip)]
    rng: GameRng,
    #[serde(skip)]
    catalog: Arc<CardRegistry>,
}

impl World {
    /// Create a match with both heroes at full health and empty zones.
    pub fn new(config: RulesConfig, catalog: Arc<CardRegistry>) -> EngineResult<Self> {
        config.validate()?;
        let mut allocator = EntityAllocator::new();
        let heroes = [allocator.alloc(), allocator.alloc()];
        let players = PlayerMap::new(|p| Player::new(p, heroes[p.index()], &config));
        Ok(Self {
            rng: GameRng::new(config.seed),
            config,
            players,
            turn: 0,
            active_player: PlayerId::FIRST,
            events: EventBus::new(),
            history: Vector::new(),
            allocator,
            catalog,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<CardRegistry> {
        &self.catalog
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    pub(crate) fn player_mut(&mut self, player: PlayerId) -> &mut Player {
        &mut self.players[player]
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub(crate) fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    pub(crate) fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    pub(crate) fn alloc(&mut self) -> EntityId {
        self.allocator.alloc()
    }

    // === Lookup ===

    /// Find a character by id: heroes, minions on board, then the dead.
    #[must_use]
    pub fn character(&self, id: EntityId) -> Option<Character<'_>> {
        for (_, player) in self.players.iter() {
            if player.hero().id() == id {
                return Some(Character::Hero(player.hero()));
            }
            if let Some(minion) = player.board().get(id) {
                return Some(Character::Minion(minion));
            }
        }
        self.find_minion(id).map(Character::Minion)
    }

    /// Where a character in play lives. Graveyard minions are not in play.
    #[must_use]
    pub fn locate(&self, id: EntityId) -> Option<CharacterRef> {
        self.players.iter().find_map(|(owner, player)| {
            if player.hero().id() == id {
                Some(CharacterRef::Hero(owner))
            } else if player.board().get(id).is_some() {
                Some(CharacterRef::Minion { owner, id })
            } else {
                None
            }
        })
    }

    /// Find a minion on either board or in either graveyard.
    #[must_use]
    pub fn find_minion(&self, id: EntityId) -> Option<&Minion> {
        self.players.iter().find_map(|(_, player)| {
            player
                .board()
                .get(id)
                .or_else(|| player.graveyard().iter().rev().find(|m| m.id() == id))
        })
    }

    /// Living heroes and minions in world order: first player then second,
    /// hero before minions, minions left to right.
    pub fn living_characters(&self) -> impl Iterator<Item = Character<'_>> {
        self.players.iter().flat_map(|(_, player)| {
            let hero = Some(player.hero())
                .filter(|h| !h.is_dead())
                .map(Character::Hero);
            hero.into_iter()
                .chain(player.board().alive().map(Character::Minion))
        })
    }

    // === Snapshots and undo ===

    /// Serialize all observable state. Entity and registration counters and
    /// the RNG are not part of the snapshot.
    pub fn snapshot(&self) -> EngineResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EngineError::illegal(format!("snapshot failed: {e}")))
    }

    /// Apply an inverse returned by an earlier operation.
    pub fn undo(&mut self, action: UndoAction) {
        action.undo(self);
    }

    /// Run an operation, read its outcome, then roll everything back,
    /// including the RNG.
    pub fn speculate<R>(
        &mut self,
        operation: impl FnOnce(&mut World) -> EngineResult<Undoable<R>>,
    ) -> EngineResult<R> {
        let rng = self.rng.state();
        let outcome = operation(self);
        self.rng = GameRng::from_state(&rng);
        let Undoable { value, undo } = outcome?;
        self.undo(undo);
        Ok(value)
    }

    // === Setup ===

    /// Replace a player's hero. The hero must belong to that player.
    pub fn set_hero(&mut self, player: PlayerId, hero: Hero) -> EngineResult<UndoAction> {
        if hero.owner() != player {
            return Err(EngineError::illegal(format!(
                "hero {} belongs to {}, not {}",
                hero.id(),
                hero.owner(),
                player
            )));
        }
        Ok(self.player_mut(player).replace_hero(hero))
    }

    /// Create a hero for `player` with a fresh id.
    pub fn create_hero(&mut self, player: PlayerId, health: i32) -> Hero {
        Hero::new(self.alloc(), player, health)
    }

    /// Set mana and crystals directly.
    pub fn set_mana(&mut self, player: PlayerId, mana: i32, crystals: i32) -> UndoAction {
        self.player_mut(player)
            .update_mana(|m| {
                m.set(mana, crystals);
                Ok(())
            })
            .unwrap_or_default()
    }

    /// Instantiate a card from the catalog, allocating its ids.
    pub fn create_card(&mut self, owner: PlayerId, card: CardId) -> EngineResult<Card> {
        let descr = Arc::clone(self.catalog.require(card)?);
        let id = self.alloc();
        let minion_id = descr.minion.is_some().then(|| self.alloc());
        Ok(Card::new(id, owner, descr, minion_id))
    }

    /// Setup: put a new card into a deck.
    pub fn put_in_deck(
        &mut self,
        player: PlayerId,
        card: CardId,
        position: ZonePosition,
    ) -> EngineResult<EntityId> {
        let card = self.create_card(player, card)?;
        let id = card.id();
        self.player_mut(player).deck_mut().put(card, position);
        Ok(id)
    }

    /// Setup: shuffle a deck with the world RNG.
    pub fn shuffle_deck(&mut self, player: PlayerId) {
        let Self { players, rng, .. } = self;
        players[player].deck_mut().shuffle(rng);
    }

    /// Put a new card into a hand. A full hand burns the card.
    pub fn add_card_to_hand(&mut self, player: PlayerId, card: CardId) -> EngineResult<Undoable<Option<EntityId>>> {
        let card = self.create_card(player, card)?;
        let id = card.id();
        match self.player_mut(player).hand_mut().add(card) {
            Ok(undo) => Ok(Undoable::new(Some(id), undo)),
            Err(burned) => {
                tracing::debug!(%player, card = %burned.card_id(), "hand full, card burned");
                Ok(Undoable::unchanged(None))
            }
        }
    }

    // === Match bookkeeping ===

    pub(crate) fn set_turn(&mut self, turn: u32, active_player: PlayerId) -> UndoAction {
        let undo = UndoAction::RestoreTurn {
            turn: self.turn,
            active_player: self.active_player,
        };
        self.turn = turn;
        self.active_player = active_player;
        undo
    }

    pub(crate) fn restore_turn(&mut self, turn: u32, active_player: PlayerId) {
        self.turn = turn;
        self.active_player = active_player;
    }

    pub(crate) fn record(&mut self, player: PlayerId, action: GameAction) -> UndoAction {
        let sequence = self.history.len() as u32;
        self.history
            .push_back(ActionRecord::new(player, action, self.turn, sequence));
        UndoAction::PopHistory
    }

    pub(crate) fn pop_history(&mut self) {
        self.history.pop_back();
    }
}
