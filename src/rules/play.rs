//! Playing cards from hand.
//!
//! ## Resolution order
//!
//! 1. The on-play actions whose requirements hold are queued, before
//!    anything changes
//! 2. Mana is spent; this is the first mutation, so a rejected play leaves
//!    the world untouched
//! 3. The card leaves the hand and the per-turn counters move
//! 4. `start-playing-card` fires and may veto the play
//! 5. The minion is summoned, or the weapon equipped, or the secret set
//! 6. The queued actions run against the (possibly redirected) target
//! 7. `done-playing-card` fires
//!
//! A veto or a full board still costs the mana and the card.

use std::sync::Arc;

use crate::cards::{Card, CardDescr, CardId, CardType};
use crate::core::{EntityId, GameAction, PlayerId};
use crate::effects::{Actor, Effect, EffectContext};
use crate::error::{EngineError, EngineResult};
use crate::events::{EventKind, EventPayload};
use crate::undo::{UndoAction, UndoBuilder};
use crate::world::{Weapon, World};

/// The player's choices for a card play.
///
/// ## Example
///
/// ```
/// use ccg_rules::core::EntityId;
/// use ccg_rules::rules::TargetRequest;
///
/// let request = TargetRequest::new().with_target(EntityId(4)).at_location(0);
/// assert_eq!(request.target, Some(EntityId(4)));
/// assert_eq!(TargetRequest::default().location, usize::MAX);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetRequest {
    pub target: Option<EntityId>,
    /// Index of the chosen option of a choose-one card.
    pub choose_one: Option<usize>,
    /// Board position for a minion; clamped, so `usize::MAX` is the right
    /// end.
    pub location: usize,
}

impl Default for TargetRequest {
    fn default() -> Self {
        Self {
            target: None,
            choose_one: None,
            location: usize::MAX,
        }
    }
}

impl TargetRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn with_choose_one(mut self, option: usize) -> Self {
        self.choose_one = Some(option);
        self
    }

    #[must_use]
    pub fn at_location(mut self, location: usize) -> Self {
        self.location = location;
        self
    }
}

impl World {
    /// Whether `player` could play `card` right now: their turn, the card
    /// in hand, enough mana, and room on the board for a minion.
    #[must_use]
    pub fn can_play_card(&self, player: PlayerId, card: EntityId) -> bool {
        if self.game_result().is_over() || player != self.active_player() {
            return false;
        }
        let me = self.player(player);
        let Some(card) = me.hand().get(card) else {
            return false;
        };
        if card.card_type() == CardType::Minion && me.board().is_full() {
            return false;
        }
        card.active_mana_cost(self) <= me.mana().mana()
    }

    /// Play a card from `player`'s hand, then run the death sweep.
    pub fn play_card(&mut self, player: PlayerId, card: EntityId, request: TargetRequest) -> EngineResult<UndoAction> {
        let action = GameAction::PlayCard {
            card,
            target: request.target,
        };
        let mut undo = UndoBuilder::new();
        let played = self
            .check_play(player, card)
            .and_then(|(card, cost)| self.play(player, card, cost, request, true))
            .inspect_err(|error| tracing::warn!(%error, %player, ?action, "card play rejected"))?;
        undo.add(played);
        undo.add(self.record(player, action));
        undo.add(self.end_phase());
        tracing::debug!(%player, %card, "card played");
        Ok(undo.build())
    }

    /// Resolve a fresh copy of a catalog card as if played, for free.
    ///
    /// Minion and done events are skipped, nothing is recorded in the
    /// history and no death sweep runs; the caller is mid-resolution.
    pub fn play_card_effect(&mut self, player: PlayerId, card: CardId, request: TargetRequest) -> EngineResult<UndoAction> {
        let card = self.create_card(player, card)?;
        self.play(player, card, 0, request, false)
    }

    fn check_play(&self, player: PlayerId, card: EntityId) -> EngineResult<(Card, i32)> {
        if self.game_result().is_over() {
            return Err(EngineError::illegal("the match is over"));
        }
        if player != self.active_player() {
            return Err(EngineError::illegal(format!("it is not the turn of {player}")));
        }
        let in_hand = self
            .player(player)
            .hand()
            .get(card)
            .ok_or(EngineError::CardNotInHand { player, card })?;
        Ok((in_hand.clone(), in_hand.active_mana_cost(self)))
    }

    fn play(
        &mut self,
        player: PlayerId,
        card: Card,
        mana_cost: i32,
        request: TargetRequest,
        events: bool,
    ) -> EngineResult<UndoAction> {
        let descr = Arc::clone(card.descr());
        if let Some(target) = request.target {
            self.locate(target).ok_or(EngineError::UnknownEntity(target))?;
        }
        let effects = self.queued_effects(player, &descr, request)?;

        let mut undo = UndoBuilder::new();
        let me = self.player_mut(player);
        undo.add(me.update_mana(|m| m.spend(mana_cost, descr.overload))?);
        let mut card = match me.hand_mut().remove(card.id()) {
            Some(removed) => undo.take(removed),
            None => card,
        };
        undo.add(me.count_played(descr.card_type == CardType::Minion));
        undo.add(me.record_played(descr.id));

        let id = card.id();
        let mut payload = EventPayload::CardPlay {
            card: id,
            card_id: descr.id,
            player,
            card_type: descr.card_type,
            target: request.target,
            mana_cost,
            vetoed: false,
        };

        if let Some(minion) = card.take_minion() {
            let reservation = self
                .player_mut(player)
                .board_mut()
                .try_reserve(request.location)
                .map(|reserved| undo.take(reserved));
            if events {
                undo.add(self.fire(EventKind::StartPlayingCard, &mut payload));
            }
            if payload.is_vetoed() {
                tracing::debug!(%player, card = %descr.id, "card play vetoed");
                if let Some(reservation) = reservation {
                    undo.add(self.player_mut(player).board_mut().release(reservation));
                }
                return Ok(undo.build());
            }
            match reservation {
                Some(reservation) => {
                    let minion_id = minion.id();
                    undo.add(self.summon_reserved(reservation, minion));
                    let ctx = EffectContext::new(Actor::minion(player, minion_id), payload.subject());
                    undo.add(self.apply_effects(&effects, &ctx));
                }
                None => tracing::debug!(%player, card = %descr.id, "board full, minion lost"),
            }
        } else {
            undo.add(self.fire(EventKind::StartPlayingCard, &mut payload));
            if payload.is_vetoed() {
                tracing::debug!(%player, card = %descr.id, "card play vetoed");
                return Ok(undo.build());
            }
            if let Some(weapon) = Weapon::from_card(id, player, Arc::clone(&descr)) {
                undo.add(self.equip_weapon(weapon));
            }
            if descr.is_secret() {
                undo.add(self.add_secret(player, &card));
            }
            let ctx = EffectContext::new(Actor::card(player, id), payload.subject());
            undo.add(self.apply_effects(&effects, &ctx));
        }

        if events {
            let mut done = EventPayload::CardPlayed {
                card: id,
                card_id: descr.id,
                player,
                card_type: descr.card_type,
                target: payload.subject(),
            };
            undo.add(self.fire(EventKind::DonePlayingCard, &mut done));
        }
        Ok(undo.build())
    }

    /// The on-play effects to run, checked against the world before the
    /// play changes it. A choose-one card must be given a valid option.
    fn queued_effects(&self, player: PlayerId, descr: &CardDescr, request: TargetRequest) -> EngineResult<Vec<Effect>> {
        let chosen = match (descr.choose_one.is_empty(), request.choose_one) {
            (true, None) => None,
            (true, Some(_)) => return Err(EngineError::invalid(format!("{} has no options", descr.id))),
            (false, index) => {
                let option = index
                    .and_then(|i| descr.choose_one.get(i))
                    .ok_or_else(|| EngineError::invalid(format!("{} needs a valid option", descr.id)))?;
                Some(option)
            }
        };

        let actions = descr
            .on_play
            .iter()
            .chain(chosen.into_iter().flat_map(|option| option.on_play.iter()));
        Ok(actions
            .filter(|a| a.requirement.is_met(self, player, request.target))
            .map(|a| a.effect.clone())
            .collect())
    }
}
