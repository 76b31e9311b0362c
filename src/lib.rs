//! Mancala-Search: game-tree search for a Mancala-style sowing game.
//!
//! This crate provides a rules engine for a two-row sowing game with
//! capture chains, forced feeding and grand slam suppression, plus three
//! interchangeable decision procedures that commit a move to a search node.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions, reward weights and search defaults
//! - [`config`] - Runtime configuration for the game and the algorithms
//! - [`position`] - Core game logic (sowing, captures, legal actions)
//! - [`node`] - Search nodes and the arena linking them into trees
//! - [`alphabeta`] - Depth-limited Alpha-Beta minimax
//! - [`mcts`] - Monte Carlo Tree Search with UCB1 (UCT)
//! - [`playout`] - Random agent and game simulation
//! - [`fsss`] - Forward Search Sparse Sampling minimax
//! - [`search`] - Common entry points and errors
//!
//! ## Example
//!
//! ```
//! use mancala_search::config::AlphaBetaConfig;
//! use mancala_search::search::{Algorithm, new_game};
//!
//! let mut node = new_game();
//! let mut search = Algorithm::AlphaBeta(AlphaBetaConfig { depth: 3, ..Default::default() });
//! let report = search.commit_best_move(&mut node).unwrap();
//! assert!(report.action < 6);
//! println!("{}", node.pos());
//! ```

pub mod alphabeta;
pub mod config;
pub mod constants;
pub mod fsss;
pub mod mcts;
pub mod node;
pub mod playout;
pub mod position;
pub mod search;
