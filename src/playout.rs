//! Random playouts (game simulation) and the random agent.
//!
//! A playout copies a node and plays uniformly random legal moves until the
//! game ends, then scores the final position.

use crate::node::Node;
use crate::position::Pit;
use crate::search::SearchError;

/// How a finished playout is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RolloutPolicy {
    /// 1 if player one won, 0.5 for a draw, 0 if player two won.
    #[default]
    WinLoss,
    /// Heuristic reward of the final position for the player to move.
    Heuristic,
}

/// Play a uniformly random legal move on `node`.
///
/// # Errors
/// [`SearchError::NoLegalMove`] if the player to move has no actions.
pub fn random_agent(node: &mut Node, rng: &mut fastrand::Rng) -> Result<Pit, SearchError> {
    let actions = node.actions();
    if actions.is_empty() {
        return Err(SearchError::NoLegalMove);
    }
    let choice = actions[rng.usize(..actions.len())];
    node.commit_play(choice)?;
    Ok(choice)
}

/// Simulate a random game from `node` and score it under `policy`.
///
/// `node` itself is not modified.
pub fn simulate(
    node: &Node,
    policy: RolloutPolicy,
    rng: &mut fastrand::Rng,
) -> Result<f64, SearchError> {
    let mut sim = node.fresh_copy();
    while !sim.is_leaf() {
        random_agent(&mut sim, rng)?;
    }
    Ok(match policy {
        RolloutPolicy::WinLoss => match sim.plain_reward() {
            r if r > 0 => 1.0,
            r if r < 0 => 0.0,
            _ => 0.5,
        },
        RolloutPolicy::Heuristic => sim.reward(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::position::{Player, Position};

    #[test]
    fn test_random_agent_plays_legal_move() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut node = Node::default();
        let pit = random_agent(&mut node, &mut rng).unwrap();
        assert!(pit < 6);
        assert_eq!(node.player, Player::Two);
        assert_eq!(node.pos().move_count(), 1);
    }

    #[test]
    fn test_random_agent_no_moves() {
        let mut rng = fastrand::Rng::with_seed(7);
        let pos = Position::from_pits(
            GameConfig::default(),
            vec![0, 0, 0, 0, 0, 0, 1, 6, 2, 0, 1, 3],
            [20, 15],
            Player::One,
        )
        .unwrap();
        let mut node = Node::with_player(pos, Player::One);
        assert!(matches!(
            random_agent(&mut node, &mut rng),
            Err(SearchError::NoLegalMove)
        ));
    }

    #[test]
    fn test_simulate_reaches_end() {
        let mut rng = fastrand::Rng::with_seed(11);
        let node = Node::default();
        for _ in 0..20 {
            let r = simulate(&node, RolloutPolicy::WinLoss, &mut rng).unwrap();
            assert!(r == 0.0 || r == 0.5 || r == 1.0);
        }
        assert_eq!(node.pos().move_count(), 0);
    }

    #[test]
    fn test_simulate_terminal_node() {
        let mut rng = fastrand::Rng::with_seed(3);
        let pos = Position::from_pits(
            GameConfig::default(),
            vec![0, 0, 0, 0, 0, 0, 1, 6, 2, 0, 1, 3],
            [20, 15],
            Player::One,
        )
        .unwrap();
        let node = Node::with_player(pos, Player::One);
        assert_eq!(simulate(&node, RolloutPolicy::WinLoss, &mut rng).unwrap(), 1.0);
        let h = simulate(&node, RolloutPolicy::Heuristic, &mut rng).unwrap();
        assert!((h - node.reward()).abs() < 1e-12);
    }
}
