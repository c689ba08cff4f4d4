//! Turn structure.

use crate::core::GameAction;
use crate::error::{EngineError, EngineResult};
use crate::events::{EventKind, EventPayload};
use crate::undo::{UndoAction, UndoBuilder};
use crate::world::{Hero, World};

impl World {
    /// Begin the active player's turn: reset counters, refresh mana, draw,
    /// ready the board and hero, then fire `turn-starts`.
    pub fn start_new_turn(&mut self) -> UndoAction {
        let player = self.active_player();
        let max_mana = self.config().max_mana;
        tracing::debug!(%player, turn = self.turn(), "turn started");

        let mut undo = UndoBuilder::new();
        let me = self.player_mut(player);
        undo.add(me.reset_counters());
        undo.add(
            me.update_mana(|m| {
                m.refresh(max_mana);
                Ok(())
            })
            .unwrap_or_default(),
        );
        undo.add(self.draw_card(player));

        let me = self.player_mut(player);
        undo.add(me.board_mut().refresh());
        undo.add(me.update_hero(Hero::refresh).undo);

        let mut payload = EventPayload::Player { player };
        undo.add(self.fire(EventKind::TurnStarts, &mut payload));
        undo.add(self.end_phase());
        undo.build()
    }

    /// Close the active player's turn: fire `turn-ends`, then expire the
    /// hero's and the board's this-turn bonuses.
    pub fn end_turn(&mut self) -> UndoAction {
        let player = self.active_player();
        let mut undo = UndoBuilder::new();

        let mut payload = EventPayload::Player { player };
        undo.add(self.fire(EventKind::TurnEnds, &mut payload));

        let me = self.player_mut(player);
        undo.add(me.update_hero(Hero::refresh_end_of_turn).undo);
        undo.add(me.board_mut().refresh_end_of_turn());
        undo.add(self.end_phase());
        undo.build()
    }

    /// End the turn and hand it to the opponent, starting their turn.
    pub fn end_player_turn(&mut self) -> EngineResult<UndoAction> {
        let player = self.active_player();
        if self.game_result().is_over() {
            let error = EngineError::illegal("the match is over");
            tracing::warn!(%error, %player, "end turn rejected");
            return Err(error);
        }

        let mut undo = UndoBuilder::new();
        undo.add(self.end_turn());
        undo.add(self.record(player, GameAction::EndTurn));
        let next = self.turn() + 1;
        undo.add(self.set_turn(next, player.opponent()));
        undo.add(self.start_new_turn());
        Ok(undo.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDescr, CardId, CardRegistry, MinionDescr};
    use crate::core::{PlayerId, RulesConfig};
    use crate::effects::{Actor, Effect, SelfKind};
    use crate::events::{EventFilter, ReactionAction, ReactionDef};
    use crate::zones::ZonePosition;
    use std::sync::Arc;

    fn world() -> World {
        let mut registry = CardRegistry::new();
        registry
            .register(CardDescr::minion(CardId(1), "Wisp", 0, MinionDescr::new("Wisp", 1, 1)))
            .unwrap();
        World::new(RulesConfig::default(), Arc::new(registry)).unwrap()
    }

    #[test]
    fn test_start_new_turn_refreshes_and_draws() {
        let mut world = world();
        world.put_in_deck(PlayerId::FIRST, CardId(1), ZonePosition::Top).unwrap();
        let _ = world.summon_minion(PlayerId::FIRST, CardId(1), 0).unwrap();
        let before = world.snapshot().unwrap();

        let undo = world.start_new_turn();
        let me = world.player(PlayerId::FIRST);
        assert_eq!(me.mana().crystals(), 1);
        assert_eq!(me.mana().mana(), 1);
        assert_eq!(me.hand().len(), 1);
        assert!(me.deck().is_empty());
        assert!(!me.board().minions()[0].is_summoning_sick());

        world.undo(undo);
        assert_eq!(world.snapshot().unwrap(), before);
    }

    #[test]
    fn test_end_player_turn_passes_to_opponent() {
        let mut world = world();
        let before = world.snapshot().unwrap();

        let undo = world.end_player_turn().unwrap();
        assert_eq!(world.active_player(), PlayerId::SECOND);
        assert_eq!(world.turn(), 1);
        assert_eq!(world.player(PlayerId::SECOND).mana().crystals(), 1);
        assert_eq!(world.player(PlayerId::SECOND).fatigue(), 1);
        assert_eq!(world.history().len(), 1);

        world.undo(undo);
        assert_eq!(world.snapshot().unwrap(), before);
        assert!(world.history().is_empty());
    }

    #[test]
    fn test_turn_events_fire_for_the_right_player() {
        let mut world = world();
        world.put_in_deck(PlayerId::SECOND, CardId(1), ZonePosition::Top).unwrap();
        let hero = world.player(PlayerId::SECOND).hero().id();
        let owner = Actor::new(PlayerId::SECOND, hero, SelfKind::Hero);
        let armor = |amount| ReactionAction::WithSelf {
            effect: Effect::GainArmor { amount },
        };
        let _ = world.activate_reactions(
            owner,
            &[
                ReactionDef::new(EventKind::TurnEnds, EventFilter::EnemyTurn, armor(1)),
                ReactionDef::new(EventKind::TurnStarts, EventFilter::OwnTurn, armor(10)),
            ],
        );

        let _ = world.end_player_turn().unwrap();
        assert_eq!(world.player(PlayerId::SECOND).hero().armor(), 11);
    }

    #[test]
    fn test_end_turn_rejected_after_match() {
        let mut world = world();
        let lethal = world.create_hero(PlayerId::FIRST, 0);
        let _ = world.set_hero(PlayerId::FIRST, lethal).unwrap();

        let before = world.snapshot().unwrap();
        assert!(matches!(world.end_player_turn(), Err(EngineError::IllegalState(_))));
        assert_eq!(world.snapshot().unwrap(), before);
    }
}
