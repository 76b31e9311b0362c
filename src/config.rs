//! Runtime configuration for the rules engine and the search algorithms.

use std::ops::Range;

use crate::constants::{
    AB_DEPTH, COUNT_PER_PIT, FSSS_DEPTH, FSSS_MAX_ITERATIONS, MOVE_LIMIT, NEG_INF, PITS_PER_ROW,
    POS_INF, UCT_EXPLORATION, UCT_ITERATIONS,
};
use crate::playout::RolloutPolicy;
use crate::position::Player;

/// Board dimensions and game length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Pits on each player's row (`R`).
    pub pits_per_row: usize,
    /// Initial pieces per pit (`C`).
    pub count_per_pit: u32,
    /// The game ends once more than this many moves have been played.
    pub move_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pits_per_row: PITS_PER_ROW,
            count_per_pit: COUNT_PER_PIT,
            move_limit: MOVE_LIMIT,
        }
    }
}

impl GameConfig {
    /// Total number of pits (`2R`).
    #[inline]
    pub fn board_size(&self) -> usize {
        2 * self.pits_per_row
    }

    /// Number of pieces in play, constant over a game.
    #[inline]
    pub fn total_pieces(&self) -> u32 {
        self.board_size() as u32 * self.count_per_pit
    }

    /// Pit indices owned by `player`.
    #[inline]
    pub fn row(&self, player: Player) -> Range<usize> {
        match player {
            Player::One => 0..self.pits_per_row,
            Player::Two => self.pits_per_row..self.board_size(),
        }
    }

    /// Unwrapped index of the opponent's first pit in sowing order.
    ///
    /// A pit `i` of `player` reaches the opponent's row iff
    /// `i + count(i) >= reach_index(player)`.
    #[inline]
    pub fn reach_index(&self, player: Player) -> usize {
        match player {
            Player::One => self.pits_per_row,
            Player::Two => self.board_size(),
        }
    }
}

/// Depth-limited Alpha-Beta parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaBetaConfig {
    pub depth: usize,
    /// Initial lower end of the search window.
    pub alpha: f64,
    /// Initial upper end of the search window.
    pub beta: f64,
}

impl Default for AlphaBetaConfig {
    fn default() -> Self {
        Self {
            depth: AB_DEPTH,
            alpha: NEG_INF,
            beta: POS_INF,
        }
    }
}

/// Monte Carlo Tree Search (UCT) parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UctConfig {
    /// Exploration constant `c` of the UCB1 formula.
    pub exploration: f64,
    /// Iterations (select, simulate, backpropagate) per move. Must be at least 1.
    pub iterations: usize,
    /// How simulated games are scored.
    pub policy: RolloutPolicy,
    /// Seed for the simulation RNG; `None` seeds from the system.
    pub seed: Option<u64>,
}

impl Default for UctConfig {
    fn default() -> Self {
        Self {
            exploration: UCT_EXPLORATION,
            iterations: UCT_ITERATIONS,
            policy: RolloutPolicy::WinLoss,
            seed: None,
        }
    }
}

impl UctConfig {
    /// Create a reproducible config for testing.
    pub fn seeded(iterations: usize, seed: u64) -> Self {
        Self {
            iterations,
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// FSSS-minimax parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsssConfig {
    /// Depth limit of each pass. Must be at least 1.
    pub depth: usize,
    /// Give up if the root bounds have not met after this many passes.
    pub max_iterations: u64,
}

impl Default for FsssConfig {
    fn default() -> Self {
        Self {
            depth: FSSS_DEPTH,
            max_iterations: FSSS_MAX_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rows() {
        let config = GameConfig::default();
        assert_eq!(config.row(Player::One), 0..6);
        assert_eq!(config.row(Player::Two), 6..12);
        assert_eq!(config.total_pieces(), 48);
        assert_eq!(config.reach_index(Player::One), 6);
        assert_eq!(config.reach_index(Player::Two), 12);
    }

    #[test]
    fn test_rows_follow_width() {
        let config = GameConfig {
            pits_per_row: 4,
            count_per_pit: 3,
            move_limit: 50,
        };
        assert_eq!(config.row(Player::Two), 4..8);
        assert_eq!(config.reach_index(Player::Two), 8);
        assert_eq!(config.total_pieces(), 24);
    }
}
