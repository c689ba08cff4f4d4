//! Drawing cards and fatigue.

use std::sync::Arc;

use crate::cards::Card;
use crate::core::PlayerId;
use crate::effects::{Actor, Damage, DamageSource, EffectContext};
use crate::events::{EventKind, EventPayload};
use crate::undo::{UndoAction, UndoBuilder};
use crate::world::World;

impl World {
    /// Draw the top card of a deck. An empty deck deals fatigue damage
    /// instead: one more than last time.
    pub fn draw_card(&mut self, player: PlayerId) -> UndoAction {
        let Some(drawn) = self.player_mut(player).deck_mut().draw() else {
            return self.fatigue_damage(player);
        };
        let mut undo = UndoBuilder::new();
        let card = undo.take(drawn);
        undo.add(self.draw_card_to_hand(player, card));
        undo.build()
    }

    /// Put a drawn card into the hand.
    ///
    /// The card's on-draw effects run first, with the card as actor. If
    /// the hand is full afterwards the card is burned and `draw-card` does
    /// not fire.
    pub fn draw_card_to_hand(&mut self, player: PlayerId, card: Card) -> UndoAction {
        let mut undo = UndoBuilder::new();
        let descr = Arc::clone(card.descr());
        if !descr.on_draw.is_empty() {
            let ctx = EffectContext::new(Actor::card(player, card.id()), None);
            undo.add(self.apply_effects(&descr.on_draw, &ctx));
        }

        let (id, card_type) = (card.id(), card.card_type());
        match self.player_mut(player).hand_mut().add(card) {
            Ok(added) => {
                undo.add(added);
                let mut event = EventPayload::CardDrawn {
                    card: id,
                    card_id: descr.id,
                    player,
                    card_type,
                };
                undo.add(self.fire(EventKind::DrawCard, &mut event));
            }
            Err(burned) => {
                tracing::debug!(%player, card = %burned.card_id(), "hand full, card burned");
            }
        }
        undo.build()
    }

    fn fatigue_damage(&mut self, player: PlayerId) -> UndoAction {
        let mut undo = UndoBuilder::new();
        let fatigue = undo.take(self.player_mut(player).increase_fatigue());
        let hero = self.player(player).hero().id();
        tracing::debug!(%player, fatigue, "deck empty, fatigue damage");

        let source = DamageSource { player, entity: hero };
        undo.add(self.damage_character(Damage::new(source, fatigue), hero));
        undo.build()
    }
}
