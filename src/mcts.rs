//! Monte Carlo Tree Search with UCB1 selection (UCT).
//!
//! Each iteration:
//! 1. Tree policy: descend from the root by UCB1 until a node still has
//!    untried actions, then expand the first of them
//! 2. Default policy: simulate a random game from the new node
//! 3. Backpropagation: add the result to every node on the path to the root
//!
//! Rewards are always from player one's point of view.

use tracing::{debug, info, trace};

use crate::config::UctConfig;
use crate::constants::NEG_INF;
use crate::node::{Node, NodeId, Tree};
use crate::playout::simulate;
use crate::position::MoveError;
use crate::search::{SearchError, SearchReport};

/// UCB1 score of `child` under a parent visited `parent_visits` times.
///
/// Both visit counts must be non-zero.
#[inline]
pub fn ucb1(child: &Node, parent_visits: u32, exploration: f64) -> f64 {
    let visits = child.visits as f64;
    child.total_reward / visits
        + exploration * std::f64::consts::FRAC_1_SQRT_2 * ((parent_visits as f64).ln() / visits).sqrt()
}

/// Select the child of `id` with the highest UCB1 score.
///
/// The first child wins ties.
pub fn best_child(tree: &Tree, id: NodeId, exploration: f64) -> Option<NodeId> {
    let parent = tree.get(id);
    let mut best = None;
    let mut best_score = NEG_INF;
    for &child in parent.children() {
        let score = ucb1(tree.get(child), parent.visits, exploration);
        if best.is_none() || score > best_score {
            best = Some(child);
            best_score = score;
        }
    }
    best
}

/// Expand the first untried action of `id`.
fn expand(tree: &mut Tree, id: NodeId) -> Result<NodeId, MoveError> {
    let node = tree.get_mut(id);
    let action = node.untried.remove(0);
    let child = node.rollout(action)?;
    Ok(tree.add_child(id, action, child))
}

/// Pick the node to simulate from.
fn tree_policy(tree: &mut Tree, exploration: f64) -> Result<NodeId, SearchError> {
    let mut current = Tree::ROOT;
    while !tree.get(current).is_leaf() {
        if !tree.get(current).untried.is_empty() {
            return Ok(expand(tree, current)?);
        }
        current = best_child(tree, current, exploration).ok_or(SearchError::NoLegalMove)?;
    }
    Ok(current)
}

/// Run `config.iterations` UCT iterations from `node` and commit the
/// action of the root's best UCB1 child.
pub fn uct(node: &mut Node, config: &UctConfig) -> Result<SearchReport, SearchError> {
    if node.is_leaf() {
        return Err(SearchError::NoLegalMove);
    }
    if config.iterations == 0 {
        return Err(SearchError::InvalidConfig("uct needs at least one iteration"));
    }

    let mut rng = config
        .seed
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let mut tree = Tree::new(node.fresh_copy());

    for i in 0..config.iterations {
        let leaf = tree_policy(&mut tree, config.exploration)?;
        let reward = simulate(tree.get(leaf), config.policy, &mut rng)?;
        tree.backpropagate(leaf, reward);
        trace!(iteration = i, leaf = leaf.0, reward, "uct iteration complete");
    }

    let best = best_child(&tree, Tree::ROOT, config.exploration).ok_or(SearchError::NoLegalMove)?;
    let action = tree.get(best).action.ok_or(SearchError::NoLegalMove)?;

    debug!(
        action,
        visits = tree.get(best).visits,
        mean = tree.get(best).total_reward / tree.get(best).visits as f64,
        "uct chose move"
    );
    node.commit_play(action)?;
    // Every iteration expands one node and simulates once from it
    let expanded = (tree.len() - 1) as u64;
    info!(nodes_expanded = expanded, simulations = config.iterations, "uct finished");

    Ok(SearchReport {
        action,
        nodes_expanded: expanded,
        iterations: tree.root().visits as u64,
    })
}
