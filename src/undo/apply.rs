//! Applying inverses to a world.

use crate::world::World;
use crate::zones::ZonePosition;

use super::UndoAction;

impl UndoAction {
    /// Restore what the originating mutation changed. Batches are undone
    /// last-first.
    pub fn undo(self, world: &mut World) {
        match self {
            UndoAction::Nothing => {}
            UndoAction::Batch(actions) => {
                for action in actions.into_iter().rev() {
                    action.undo(world);
                }
            }

            UndoAction::RestoreCounters {
                player,
                cards_played,
                minions_played,
            } => world.player_mut(player).restore_counters(cards_played, minions_played),
            UndoAction::RestoreFatigue { player, fatigue } => {
                world.player_mut(player).restore_fatigue(fatigue)
            }
            UndoAction::RestoreMana { player, mana } => world.player_mut(player).restore_mana(mana),
            UndoAction::RestoreHero { player, hero } => world.player_mut(player).restore_hero(*hero),
            UndoAction::RestoreSpellPower { player, spell_power } => {
                world.player_mut(player).restore_spell_power(spell_power)
            }
            UndoAction::PopPlayedCard { player } => world.player_mut(player).pop_played_card(),

            UndoAction::RestoreMinion { minion } => {
                let owner = minion.owner();
                world.player_mut(owner).board_mut().restore_minion(*minion);
            }
            UndoAction::ReleaseReservation { player } => {
                world.player_mut(player).board_mut().drop_reservation()
            }
            UndoAction::Reserve { player } => world.player_mut(player).board_mut().add_reservation(),
            UndoAction::Uncommit { player, minion } => {
                world.player_mut(player).board_mut().uncommit(minion)
            }
            UndoAction::InsertMinion {
                player,
                index,
                minion,
            } => world.player_mut(player).board_mut().insert_at(index, *minion),
            UndoAction::PopGraveyard { player } => world.player_mut(player).pop_graveyard(),

            UndoAction::RemoveFromHand { player, card } => {
                world.player_mut(player).hand_mut().take(card);
            }
            UndoAction::InsertIntoHand {
                player,
                index,
                card,
            } => world.player_mut(player).hand_mut().insert_at(index, *card),
            UndoAction::RestoreCardCost {
                player,
                card,
                cost_modifier,
            } => {
                let _ = world
                    .player_mut(player)
                    .hand_mut()
                    .set_cost_modifier(card, cost_modifier);
            }
            UndoAction::ReturnToDeck { player, card } => {
                world.player_mut(player).deck_mut().put(*card, ZonePosition::Top)
            }
            UndoAction::PopDeck { player } => {
                let _ = world.player_mut(player).deck_mut().draw();
            }

            UndoAction::RestoreWeapon { player, weapon } => {
                world.player_mut(player).restore_weapon(weapon.map(|w| *w))
            }
            UndoAction::RemoveSecret { player, secret } => world.player_mut(player).take_secret(secret),
            UndoAction::InsertSecret {
                player,
                index,
                secret,
            } => world.player_mut(player).insert_secret(index, *secret),

            UndoAction::Unregister { kind, id } => world.events_mut().remove(kind, id),
            UndoAction::Reregister { registration } => world.events_mut().reinsert(*registration),

            UndoAction::RestoreTurn {
                turn,
                active_player,
            } => world.restore_turn(turn, active_player),
            UndoAction::PopHistory => world.pop_history(),
        }
    }
}
