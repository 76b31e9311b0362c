//! Forward Search Sparse Sampling minimax (FSSS-minimax).
//!
//! Every node keeps a lower bound `L` and an upper bound `U` on its value.
//! A pass descends from the root along one action per node, generating each
//! child at most once, and tightens the bounds on the way back up. Passes
//! repeat until the root's bounds meet.

use tracing::{debug, info, trace};

use crate::config::FsssConfig;
use crate::constants::{EPSILON, NEG_INF, POS_INF};
use crate::node::{Node, NodeId, Tree};
use crate::position::Player;
use crate::search::{SearchError, SearchReport};

/// Per-action bounds of a node's children, clipped to the current window.
struct ChildBounds {
    id: NodeId,
    upper: f64,
    lower: f64,
}

/// Index of the first element that `better` prefers over all earlier ones.
fn first_best(values: impl Iterator<Item = f64>, better: fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.enumerate() {
        match best {
            Some((_, b)) if !better(v, b) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

fn greater(a: f64, b: f64) -> bool {
    a > b
}

fn less(a: f64, b: f64) -> bool {
    a < b
}

/// Materialize every child of `id` and choose the one to descend into.
///
/// Returns the chosen child and the window to search it with.
fn traverse(
    tree: &mut Tree,
    id: NodeId,
    alpha: f64,
    beta: f64,
    expanded: &mut u64,
) -> Result<(NodeId, f64, f64), SearchError> {
    let actions = tree.get(id).actions();
    let mut bounds = Vec::with_capacity(actions.len());
    for action in actions {
        let child = match tree.get(id).expanded_child(action) {
            Some(child) => child,
            None => {
                let node = tree.get(id).rollout(action)?;
                *expanded += 1;
                tree.memoize_child(id, action, node)
            }
        };
        let node = tree.get(child);
        bounds.push(ChildBounds {
            id: child,
            upper: beta.min(node.upper),
            lower: alpha.max(node.lower),
        });
    }

    match tree.get(id).player {
        Player::One => {
            let star = first_best(bounds.iter().map(|b| b.upper), greater)
                .ok_or(SearchError::NoLegalMove)?;
            let runner_up = bounds
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != star)
                .map(|(_, b)| b.upper)
                .reduce(f64::max);
            let mut alpha = runner_up.map_or(alpha, |v| alpha.max(v));
            if alpha == bounds[star].upper {
                alpha -= EPSILON;
            }
            Ok((bounds[star].id, alpha, beta))
        }
        Player::Two => {
            let star = first_best(bounds.iter().map(|b| b.lower), less)
                .ok_or(SearchError::NoLegalMove)?;
            let runner_up = bounds
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != star)
                .map(|(_, b)| b.lower)
                .reduce(f64::min);
            let mut beta = runner_up.map_or(beta, |v| beta.min(v));
            if beta == bounds[star].lower {
                beta += EPSILON;
            }
            Ok((bounds[star].id, alpha, beta))
        }
    }
}

/// One pass of bounded minimax below `id`.
fn search(
    tree: &mut Tree,
    id: NodeId,
    alpha: f64,
    beta: f64,
    depth: usize,
    expanded: &mut u64,
) -> Result<(), SearchError> {
    let node = tree.get_mut(id);
    if node.is_leaf() || depth == 0 {
        let value = node.reward();
        node.lower = value;
        node.upper = value;
        return Ok(());
    }

    let (child, alpha, beta) = traverse(tree, id, alpha, beta, expanded)?;
    search(tree, child, alpha, beta, depth - 1, expanded)?;

    // traverse has materialized a child for every legal action
    let node = tree.get(id);
    let children: Vec<&Node> = node
        .actions()
        .into_iter()
        .filter_map(|action| node.expanded_child(action))
        .map(|child| tree.get(child))
        .collect();
    let (lower, upper) = match node.player {
        Player::One => children.iter().fold((NEG_INF, NEG_INF), |(l, u), c| {
            (l.max(c.lower), u.max(c.upper))
        }),
        Player::Two => children.iter().fold((POS_INF, POS_INF), |(l, u), c| {
            (l.min(c.lower), u.min(c.upper))
        }),
    };
    let node = tree.get_mut(id);
    node.lower = lower;
    node.upper = upper;
    Ok(())
}

/// Repeat FSSS passes from `node` until its bounds meet, then commit the
/// action whose child has the greatest lower bound.
pub fn fsss(node: &mut Node, config: &FsssConfig) -> Result<SearchReport, SearchError> {
    if node.is_leaf() {
        return Err(SearchError::NoLegalMove);
    }
    if config.depth == 0 {
        return Err(SearchError::InvalidConfig("fsss depth must be at least 1"));
    }

    let mut tree = Tree::new(node.fresh_copy());
    let mut expanded = 0;
    let mut iterations = 0;
    while (tree.root().lower - tree.root().upper).abs() > EPSILON {
        if iterations >= config.max_iterations {
            return Err(SearchError::NoConvergence { iterations });
        }
        search(&mut tree, Tree::ROOT, NEG_INF, POS_INF, config.depth, &mut expanded)?;
        iterations += 1;
        trace!(
            iteration = iterations,
            lower = tree.root().lower,
            upper = tree.root().upper,
            "fsss pass complete"
        );
    }

    let children: Vec<_> = tree.root().expanded().collect();
    let best = first_best(children.iter().map(|&(_, id)| tree.get(id).lower), greater)
        .ok_or(SearchError::NoLegalMove)?;
    let (action, _) = children[best];

    debug!(action, value = tree.root().lower, "fsss chose move");
    node.commit_play(action)?;
    info!(nodes_expanded = expanded, iterations, "fsss finished");

    Ok(SearchReport {
        action,
        nodes_expanded: expanded,
        iterations,
    })
}
