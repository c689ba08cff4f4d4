//! Match outcome.
//!
//! A match ends as soon as a hero is dead. Both heroes dying in the same
//! resolution is a draw.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::world::World;

/// State of a match as seen from its heroes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Both heroes are alive.
    InProgress,
    /// Single winner.
    Winner(PlayerId),
    /// Both heroes died.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        *self == GameResult::Winner(player)
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        *self != GameResult::InProgress
    }
}

impl World {
    /// Decide the match from hero health.
    #[must_use]
    pub fn game_result(&self) -> GameResult {
        let dead = PlayerId::both().map(|p| self.player(p).hero().is_dead());
        match dead {
            [false, false] => GameResult::InProgress,
            [true, true] => GameResult::Draw,
            [false, true] => GameResult::Winner(PlayerId::FIRST),
            [true, false] => GameResult::Winner(PlayerId::SECOND),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRegistry;
    use crate::core::RulesConfig;
    use crate::effects::{Damage, DamageSource};
    use std::sync::Arc;

    fn hit_hero(world: &mut World, player: PlayerId, amount: i32) {
        let hero = world.player(player).hero().id();
        let source = DamageSource {
            player: player.opponent(),
            entity: world.player(player.opponent()).hero().id(),
        };
        let _ = world.damage_character(Damage::new(source, amount), hero);
    }

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::SECOND);
        assert!(!result.is_winner(PlayerId::FIRST));
        assert!(result.is_winner(PlayerId::SECOND));
        assert!(result.is_over());

        assert!(!GameResult::Draw.is_winner(PlayerId::FIRST));
        assert!(!GameResult::InProgress.is_over());
    }

    #[test]
    fn test_result_follows_hero_health() {
        let mut world = World::new(RulesConfig::default(), Arc::new(CardRegistry::new())).unwrap();
        assert_eq!(world.game_result(), GameResult::InProgress);

        hit_hero(&mut world, PlayerId::SECOND, 30);
        assert_eq!(world.game_result(), GameResult::Winner(PlayerId::FIRST));

        hit_hero(&mut world, PlayerId::FIRST, 40);
        assert_eq!(world.game_result(), GameResult::Draw);
    }
}
