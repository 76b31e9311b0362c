//! Constants for board dimensions, reward weights, and search parameters.
//!
//! This module contains the default values behind [`crate::config`].
//! The board is a flat array of `2 * PITS_PER_ROW` pits: player 1 owns the
//! first row, player 2 the second, and pieces are sown in increasing index
//! order, wrapping from the last pit back to pit 0.

// =============================================================================
// Board Geometry
// =============================================================================

/// Pits on each player's row.
pub const PITS_PER_ROW: usize = 6;

/// Pieces placed in every pit at the start of a game.
pub const COUNT_PER_PIT: u32 = 4;

/// Number of moves after which the game is declared over.
pub const MOVE_LIMIT: usize = 300;

// =============================================================================
// Evaluation
// =============================================================================

/// Weights for the heuristic features `[h1, h2, h3, h4, h6]`:
/// home-most pit, row sum, non-empty pits, own store, opponent store.
pub const REWARD_WEIGHTS: [f64; 5] = [0.198649, 0.190084, 0.370793, 1.0, 0.565937];

/// Stand-in for negative infinity in bound propagation.
pub const NEG_INF: f64 = -1000.0;

/// Stand-in for positive infinity in bound propagation.
pub const POS_INF: f64 = 1000.0;

/// Tie perturbation and convergence tolerance for FSSS-minimax.
pub const EPSILON: f64 = 1e-5;

// =============================================================================
// Search Defaults
// =============================================================================

/// Default Alpha-Beta depth limit.
pub const AB_DEPTH: usize = 5;

/// Default UCB1 exploration constant.
pub const UCT_EXPLORATION: f64 = 1.0;

/// Default number of UCT iterations per move.
pub const UCT_ITERATIONS: usize = 1000;

/// Default FSSS-minimax depth limit.
pub const FSSS_DEPTH: usize = 3;

/// Number of FSSS passes after which the root is given up on.
pub const FSSS_MAX_ITERATIONS: u64 = 1_000_000;
