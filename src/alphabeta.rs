//! Depth-limited Alpha-Beta minimax.
//!
//! Player one maximizes and player two minimizes the heuristic reward of
//! the positions at the depth limit. Children are searched in the engine's
//! action order and a later action only replaces the current best if it is
//! strictly better, so the result is deterministic.

use tracing::{debug, info};

use crate::config::AlphaBetaConfig;
use crate::node::Node;
use crate::position::{MoveError, Pit, Player};
use crate::search::{SearchError, SearchReport};

/// Backed-up value of a subtree and the action achieving it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Evaluation {
    value: f64,
    action: Option<Pit>,
}

/// Search `config.depth` plies from `node` and commit the best action.
pub fn alphabeta(node: &mut Node, config: &AlphaBetaConfig) -> Result<SearchReport, SearchError> {
    if node.is_leaf() {
        return Err(SearchError::NoLegalMove);
    }
    if config.depth == 0 {
        return Err(SearchError::InvalidConfig("alpha-beta depth must be at least 1"));
    }

    let mut expanded = 0;
    let eval = search(node, config.alpha, config.beta, config.depth, &mut expanded)?;
    let action = eval.action.ok_or(SearchError::NoLegalMove)?;

    debug!(action, value = eval.value, "alpha-beta chose move");
    node.commit_play(action)?;
    info!(nodes_expanded = expanded, "alpha-beta finished");

    Ok(SearchReport {
        action,
        nodes_expanded: expanded,
        iterations: 1,
    })
}

fn search(
    node: &Node,
    mut alpha: f64,
    mut beta: f64,
    depth: usize,
    expanded: &mut u64,
) -> Result<Evaluation, MoveError> {
    *expanded += 1;
    if node.is_leaf() || depth == 0 {
        return Ok(Evaluation {
            value: node.reward(),
            action: None,
        });
    }

    let mut best: Option<Evaluation> = None;
    for action in node.actions() {
        let value = search(&node.rollout(action)?, alpha, beta, depth - 1, expanded)?.value;
        let current = best.get_or_insert(Evaluation {
            value,
            action: Some(action),
        });
        match node.player {
            Player::One => {
                if value > current.value {
                    *current = Evaluation {
                        value,
                        action: Some(action),
                    };
                }
                alpha = alpha.max(current.value);
            }
            Player::Two => {
                if value < current.value {
                    *current = Evaluation {
                        value,
                        action: Some(action),
                    };
                }
                beta = beta.min(current.value);
            }
        }
        if alpha >= beta {
            break;
        }
    }

    // A non-leaf node always has an action, so `best` is set
    Ok(best.unwrap_or(Evaluation {
        value: node.reward(),
        action: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::constants::{NEG_INF, POS_INF};
    use crate::position::Position;

    fn config(depth: usize) -> AlphaBetaConfig {
        AlphaBetaConfig {
            depth,
            alpha: NEG_INF,
            beta: POS_INF,
        }
    }

    #[test]
    fn test_depth_one_picks_best_reward() {
        let root = Node::default();
        let expected = root
            .actions()
            .into_iter()
            .map(|a| (a, root.rollout(a).unwrap().reward()))
            .fold((None, f64::MIN), |(ba, bv), (a, v)| {
                if v > bv { (Some(a), v) } else { (ba, bv) }
            })
            .0
            .unwrap();

        let mut node = Node::default();
        let report = alphabeta(&mut node, &config(1)).unwrap();
        assert_eq!(report.action, expected);
        assert_eq!(report.nodes_expanded, 7);
        assert_eq!(node.player, Player::Two);
    }

    #[test]
    fn test_prunes_with_closed_window() {
        let mut wide = Node::default();
        let mut narrow = Node::default();
        let full = alphabeta(&mut wide, &config(3)).unwrap();
        let cut = alphabeta(
            &mut narrow,
            &AlphaBetaConfig {
                depth: 3,
                alpha: 0.0,
                beta: 0.0,
            },
        )
        .unwrap();
        assert!(cut.nodes_expanded < full.nodes_expanded);
    }

    #[test]
    fn test_player_two_minimizes() {
        let mut node = Node::default();
        node.commit_play(0).unwrap();
        let root = node.clone();
        let report = alphabeta(&mut node, &config(1)).unwrap();
        let chosen = root.rollout(report.action).unwrap().reward();
        for a in root.actions() {
            assert!(chosen <= root.rollout(a).unwrap().reward());
        }
    }

    #[test]
    fn test_terminal_root() {
        let pos = Position::from_pits(
            GameConfig::default(),
            vec![0, 0, 0, 0, 0, 0, 1, 6, 2, 0, 1, 3],
            [20, 15],
            Player::One,
        )
        .unwrap();
        let mut node = Node::with_player(pos, Player::One);
        assert_eq!(
            alphabeta(&mut node, &config(3)),
            Err(SearchError::NoLegalMove)
        );
    }

    #[test]
    fn test_zero_depth_rejected() {
        let mut node = Node::default();
        assert!(matches!(
            alphabeta(&mut node, &config(0)),
            Err(SearchError::InvalidConfig(_))
        ));
        assert_eq!(node.pos().move_count(), 0);
    }
}
