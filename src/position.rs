//! Mancala position representation and move execution.
//!
//! This module provides the rules engine:
//! - Board state as a flat array of pits plus one store per player
//! - Sowing with capture chains on the opponent's row
//! - Forced feeding when one side is starved
//! - Grand slam suppression
//! - Terminal detection and the heuristic reward
//!
//! The position keeps a single sorted list of legal pits for both players;
//! [`Position::legal_actions`] filters it down to one player's row.

use std::fmt;
use std::mem;

use thiserror::Error;

use crate::config::GameConfig;
use crate::constants::REWARD_WEIGHTS;

/// A pit index into the board array.
pub type Pit = usize;

/// One of the two players. Player one moves first and maximizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}

/// Reasons a move is rejected. The position is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("invalid move: pit {pit} is off the board")]
    OutOfRange { pit: Pit },
    #[error("invalid move: pit {pit} does not belong to player {player}")]
    WrongOwner { pit: Pit, player: Player },
    #[error("invalid move: pit {pit} is not a legal action")]
    NotLegal { pit: Pit },
    #[error("invalid move: game is over")]
    Terminal,
}

/// Rejected board setups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("board has {found} pits, expected {expected}")]
    BoardSize { expected: usize, found: usize },
}

/// A Mancala position (board state).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    config: GameConfig,
    /// Pieces per pit, player one's row first
    pits: Vec<u32>,
    /// Captured pieces, indexed by player
    stores: [u32; 2],
    /// Legal pits of both players, ascending
    actions: Vec<Pit>,
    /// Moves played so far
    moves: usize,
    terminal: bool,
}

impl Default for Position {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Position {
    /// Create the starting position: every pit holds `count_per_pit` pieces.
    pub fn new(config: GameConfig) -> Self {
        let size = config.board_size();
        Self {
            config,
            pits: vec![config.count_per_pit; size],
            stores: [0, 0],
            actions: (0..size).collect(),
            moves: 0,
            terminal: false,
        }
    }

    /// Set up an arbitrary board with `to_move` to play next.
    ///
    /// Legal actions are computed as if `to_move`'s opponent just moved, so
    /// forced feeding and grand slam suppression apply.
    pub fn from_pits(
        config: GameConfig,
        pits: Vec<u32>,
        stores: [u32; 2],
        to_move: Player,
    ) -> Result<Self, SetupError> {
        if pits.len() != config.board_size() {
            return Err(SetupError::BoardSize {
                expected: config.board_size(),
                found: pits.len(),
            });
        }
        let mut pos = Self {
            config,
            pits,
            stores,
            actions: Vec::new(),
            moves: 0,
            terminal: false,
        };
        pos.update_actions(to_move);
        Ok(pos)
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn pits(&self) -> &[u32] {
        &self.pits
    }

    #[inline]
    pub fn store(&self, player: Player) -> u32 {
        self.stores[player.index()]
    }

    #[inline]
    pub fn move_count(&self) -> usize {
        self.moves
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Legal pits of both players, ascending.
    #[inline]
    pub fn actions(&self) -> &[Pit] {
        &self.actions
    }

    /// Legal pits on `player`'s row, ascending.
    pub fn legal_actions(&self, player: Player) -> Vec<Pit> {
        let row = self.config.row(player);
        self.actions
            .iter()
            .copied()
            .filter(|pit| row.contains(pit))
            .collect()
    }

    /// The player with more captured pieces once the game is over.
    ///
    /// Returns `None` while the game is running or on a draw.
    pub fn winner(&self) -> Option<Player> {
        if !self.terminal {
            return None;
        }
        match self.stores[0].cmp(&self.stores[1]) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Sow the pieces of `pit` for `player` and resolve captures.
    ///
    /// # Errors
    /// Returns a [`MoveError`] if the pit is off the board, on the wrong row,
    /// not currently legal, or the game is over. Nothing is modified then.
    pub fn play(&mut self, pit: Pit, player: Player) -> Result<(), MoveError> {
        if pit >= self.pits.len() {
            return Err(MoveError::OutOfRange { pit });
        }
        if !self.config.row(player).contains(&pit) {
            return Err(MoveError::WrongOwner { pit, player });
        }
        if self.terminal {
            return Err(MoveError::Terminal);
        }
        let slot = self
            .actions
            .iter()
            .position(|&a| a == pit)
            .ok_or(MoveError::NotLegal { pit })?;
        self.actions.remove(slot);

        let opponent_row = self.config.row(player.opponent());
        let mut pieces = mem::take(&mut self.pits[pit]);
        let mut chain: Vec<Pit> = Vec::new();
        let mut i = pit;
        while pieces > 0 {
            i = (i + 1) % self.pits.len();
            pieces -= 1;
            self.pits[i] += 1;
            // Only the trailing run of 2s and 3s on the opponent's row is captured
            if matches!(self.pits[i], 2 | 3) && opponent_row.contains(&i) {
                chain.push(i);
            } else {
                chain.clear();
            }
        }
        let captured: u32 = chain.iter().map(|&c| mem::take(&mut self.pits[c])).sum();
        self.stores[player.index()] += captured;
        self.moves += 1;

        let majority = self.config.total_pieces() / 2;
        if self.stores.iter().any(|&s| s > majority) || self.moves > self.config.move_limit {
            self.end_game();
        } else {
            self.update_actions(player.opponent());
        }
        Ok(())
    }

    /// Recompute legal actions from the non-empty pits, `player` to move.
    fn update_actions(&mut self, player: Player) {
        self.actions = (0..self.pits.len()).filter(|&i| self.pits[i] != 0).collect();

        if !self.can_move(player) {
            self.end_game();
            return;
        }
        if !self.can_move(player.opponent()) {
            self.retain_feeding(player);
        } else {
            self.remove_slam(player);
        }
        if self.actions.is_empty() {
            self.end_game();
        }
    }

    /// Heuristic value of the position from `player`'s point of view.
    pub fn reward(&self, player: Player) -> f64 {
        let row = self.config.row(player);
        let h1 = self.pits[row.start] as f64;
        let h2 = self.pits[row.clone()].iter().sum::<u32>() as f64;
        let h3 = self.pits[row].iter().filter(|&&c| c != 0).count() as f64;
        let h4 = self.store(player) as f64;
        let h6 = self.store(player.opponent()) as f64;
        [h1, h2, h3, h4, h6]
            .iter()
            .zip(REWARD_WEIGHTS.iter())
            .map(|(h, w)| h * w)
            .sum()
    }

    /// Store difference, positive when player one is ahead.
    #[inline]
    pub fn plain_reward(&self) -> i64 {
        self.stores[0] as i64 - self.stores[1] as i64
    }

    fn can_move(&self, player: Player) -> bool {
        self.config.row(player).any(|i| self.pits[i] != 0)
    }

    fn end_game(&mut self) {
        self.terminal = true;
        self.actions.clear();
    }

    /// Drop `player`'s moves that cannot put a piece on the opponent's row.
    fn retain_feeding(&mut self, player: Player) {
        let row = self.config.row(player);
        let reach = self.config.reach_index(player);
        let pits = &self.pits;
        self.actions
            .retain(|&i| !row.contains(&i) || i + pits[i] as usize >= reach);
    }

    /// Drop `player`'s moves that would capture the opponent's whole row,
    /// unless nothing else is left.
    fn remove_slam(&mut self, player: Player) {
        let Some(end) = self.slam_segment_end(player.opponent()) else {
            return;
        };
        // Player two's sowing reaches player one's row by wrapping past the end
        let target = match player {
            Player::One => end,
            Player::Two => end + self.pits.len(),
        };
        let row = self.config.row(player);
        let before = self.actions.clone();
        let pits = &self.pits;
        self.actions
            .retain(|&i| !row.contains(&i) || i + pits[i] as usize != target);
        if !self.actions.iter().any(|i| row.contains(i)) {
            self.actions = before;
        }
    }

    /// Last pit of a leading run of 1s and 2s on `owner`'s row, provided
    /// every pit after the run is empty.
    fn slam_segment_end(&self, owner: Player) -> Option<Pit> {
        let mut end = None;
        let mut zeros = false;
        for i in self.config.row(owner) {
            match (self.pits[i], zeros) {
                (1 | 2, false) => end = Some(i),
                (0, _) => zeros = true,
                _ => return None,
            }
        }
        end
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P1 {}, P2 {}, ", self.stores[0], self.stores[1])?;
        for (i, count) in self.pits.iter().enumerate() {
            if i == self.config.pits_per_row {
                write!(f, "|  ")?;
            }
            write!(f, "{count}  ")?;
        }
        Ok(())
    }
}
