//! Search tree nodes and the arena that links them.
//!
//! A [`Node`] wraps one [`Position`] together with the bookkeeping every
//! search algorithm needs: UCT visit statistics, FSSS bounds, and links to
//! parent and children. Links are [`NodeId`] indices into a [`Tree`] arena,
//! so a node never owns its relatives.
//!
//! A node is either [`Attachment::Committed`] (a fresh decision point with no
//! tree context) or [`Attachment::Linked`] (part of some search tree).
//! [`Node::commit_play`] always returns a node to the committed state.

use std::collections::BTreeMap;

use crate::constants::{NEG_INF, POS_INF};
use crate::position::{MoveError, Pit, Player, Position};

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Tree context of a linked node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeLinks {
    pub parent: Option<NodeId>,
    /// Children in expansion order (UCT)
    pub children: Vec<NodeId>,
    /// Children by the action leading to them (FSSS)
    pub expanded: BTreeMap<Pit, NodeId>,
}

/// Whether a node carries tree context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Attachment {
    /// Root of a new decision, no parent, children or memoized children.
    #[default]
    Committed,
    Linked(TreeLinks),
}

/// A game state plus search metadata.
#[derive(Debug, Clone)]
pub struct Node {
    pos: Position,
    /// Player to move
    pub player: Player,
    /// Plies from the root of the search tree
    pub depth: usize,
    /// Action that led here from the parent
    pub action: Option<Pit>,
    /// Legal actions not yet expanded (UCT)
    pub untried: Vec<Pit>,
    /// Number of visits (UCT)
    pub visits: u32,
    /// Sum of simulation rewards (UCT)
    pub total_reward: f64,
    /// Lower bound on the value (FSSS)
    pub lower: f64,
    /// Upper bound on the value (FSSS)
    pub upper: f64,
    leaf: bool,
    attachment: Attachment,
}

impl Default for Node {
    fn default() -> Self {
        Self::new(Position::default())
    }
}

impl Node {
    /// Wrap a position with player one to move.
    pub fn new(pos: Position) -> Self {
        Self::with_player(pos, Player::One)
    }

    /// Wrap a position with `player` to move.
    pub fn with_player(pos: Position, player: Player) -> Self {
        let untried = pos.legal_actions(player);
        let leaf = pos.is_terminal();
        Self {
            pos,
            player,
            depth: 0,
            action: None,
            untried,
            visits: 0,
            total_reward: 0.0,
            lower: NEG_INF,
            upper: POS_INF,
            leaf,
            attachment: Attachment::Committed,
        }
    }

    /// Copy the position and turn into a new node without any tree metadata.
    pub fn fresh_copy(&self) -> Self {
        let mut node = Self::with_player(self.pos.clone(), self.player);
        node.depth = self.depth;
        node
    }

    /// Play `action` on a copy of this node and return the copy.
    pub fn rollout(&self, action: Pit) -> Result<Self, MoveError> {
        let mut node = self.fresh_copy();
        node.commit_play(action)?;
        node.depth = self.depth + 1;
        Ok(node)
    }

    /// Play `action` in place and pass the turn.
    ///
    /// All tree metadata is cleared: the node becomes [`Attachment::Committed`],
    /// its bounds go back to the surrogate infinities and its UCT statistics
    /// are zeroed. On error the node is unchanged.
    pub fn commit_play(&mut self, action: Pit) -> Result<(), MoveError> {
        self.pos.play(action, self.player)?;
        self.player = self.player.opponent();
        self.untried = self.pos.legal_actions(self.player);
        self.action = None;
        self.visits = 0;
        self.total_reward = 0.0;
        self.lower = NEG_INF;
        self.upper = POS_INF;
        self.attachment = Attachment::Committed;
        self.leaf = self.pos.is_terminal();
        Ok(())
    }

    /// The position at this node. It only advances through [`Node::commit_play`].
    #[inline]
    pub fn pos(&self) -> &Position {
        &self.pos
    }

    /// True iff the position is terminal.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Legal actions for the player to move.
    #[inline]
    pub fn actions(&self) -> Vec<Pit> {
        self.pos.legal_actions(self.player)
    }

    /// Heuristic reward for the player to move.
    #[inline]
    pub fn reward(&self) -> f64 {
        self.pos.reward(self.player)
    }

    #[inline]
    pub fn plain_reward(&self) -> i64 {
        self.pos.plain_reward()
    }

    #[inline]
    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    #[inline]
    pub fn is_committed(&self) -> bool {
        self.attachment == Attachment::Committed
    }

    pub fn parent(&self) -> Option<NodeId> {
        match &self.attachment {
            Attachment::Committed => None,
            Attachment::Linked(links) => links.parent,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.attachment {
            Attachment::Committed => &[],
            Attachment::Linked(links) => &links.children,
        }
    }

    /// Memoized child reached by `action`, if it has been generated.
    pub fn expanded_child(&self, action: Pit) -> Option<NodeId> {
        match &self.attachment {
            Attachment::Committed => None,
            Attachment::Linked(links) => links.expanded.get(&action).copied(),
        }
    }

    /// Memoized children in action order.
    pub fn expanded(&self) -> impl Iterator<Item = (Pit, NodeId)> + '_ {
        let links = match &self.attachment {
            Attachment::Committed => None,
            Attachment::Linked(links) => Some(links),
        };
        links
            .into_iter()
            .flat_map(|l| l.expanded.iter().map(|(&a, &id)| (a, id)))
    }

    /// Apply `update` to the tree links, linking the node first if needed.
    fn update_links(&mut self, update: impl FnOnce(&mut TreeLinks)) {
        let mut links = match std::mem::take(&mut self.attachment) {
            Attachment::Committed => TreeLinks::default(),
            Attachment::Linked(links) => links,
        };
        update(&mut links);
        self.attachment = Attachment::Linked(links);
    }
}

/// Arena of search nodes. The root is always [`Tree::ROOT`].
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub const ROOT: NodeId = NodeId(0);

    /// Create a tree owning `root`.
    pub fn new(root: Node) -> Self {
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[inline]
    pub fn root(&self) -> &Node {
        self.get(Self::ROOT)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn allocate(&mut self, parent: NodeId, action: Pit, mut child: Node) -> NodeId {
        child.action = Some(action);
        child.update_links(|links| links.parent = Some(parent));
        let id = NodeId(self.nodes.len());
        self.nodes.push(child);
        id
    }

    /// Append `child` to the ordered child list of `parent`.
    pub fn add_child(&mut self, parent: NodeId, action: Pit, child: Node) -> NodeId {
        let id = self.allocate(parent, action, child);
        self.get_mut(parent).update_links(|links| links.children.push(id));
        id
    }

    /// Record `child` as the memoized result of `action` at `parent`.
    pub fn memoize_child(&mut self, parent: NodeId, action: Pit, child: Node) -> NodeId {
        let id = self.allocate(parent, action, child);
        self.get_mut(parent).update_links(|links| {
            links.expanded.insert(action, id);
        });
        id
    }

    /// Add `reward` to every node from `from` up to the root.
    pub fn backpropagate(&mut self, from: NodeId, reward: f64) {
        let mut current = Some(from);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            node.total_reward += reward;
            current = node.parent();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollout_leaves_source_node() {
        let mut node = Node::default();
        for a in 0..6 {
            node.rollout(a).unwrap();
        }
        assert_eq!(node.player, Player::One);
        node.player = Player::Two;
        for a in 6..12 {
            node.rollout(a).unwrap();
        }
        assert_eq!(node.pos().pits(), &[4; 12]);
        assert_eq!(node.untried, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_position_advances_with_turn() {
        let mut node = Node::default();
        node.commit_play(0).unwrap();
        assert_eq!(node.pos().move_count(), 1);
        assert_eq!(node.player, Player::Two);
        assert_eq!(node.untried, node.pos().legal_actions(Player::Two));
        assert_eq!(node.untried, vec![6, 7, 8, 9, 10, 11]);

        // a detached copy of the board can be played without touching the node
        let mut board = node.pos().clone();
        board.play(6, Player::Two).unwrap();
        assert_eq!(node.pos().move_count(), 1);
        assert_eq!(node.player, Player::Two);
    }

    #[test]
    fn test_rollout_child() {
        let node = Node::default();
        let child = node.rollout(0).unwrap();
        assert_eq!(child.player, Player::Two);
        assert_eq!(child.depth, 1);
        assert_eq!(child.pos().pits(), &[0, 5, 5, 5, 5, 4, 4, 4, 4, 4, 4, 4]);
        assert_eq!(child.untried, vec![6, 7, 8, 9, 10, 11]);
        assert!(child.is_committed());
        assert_eq!(node.player, Player::One);
    }

    #[test]
    fn test_fresh_copy_drops_metadata() {
        let mut tree = Tree::new(Node::default());
        let child = tree.get(Tree::ROOT).rollout(2).unwrap();
        let id = tree.add_child(Tree::ROOT, 2, child);
        tree.backpropagate(id, 1.0);
        tree.get_mut(id).lower = 3.0;

        let copy = tree.get(id).fresh_copy();
        assert!(copy.is_committed());
        assert_eq!(copy.visits, 0);
        assert_eq!(copy.lower, NEG_INF);
        assert_eq!(copy.upper, POS_INF);
        assert_eq!(copy.action, None);
        assert_eq!(copy.pos(), tree.get(id).pos());
        assert_eq!(copy.player, tree.get(id).player);
    }

    #[test]
    fn test_tree_links() {
        let mut tree = Tree::new(Node::default());
        let a = tree.get(Tree::ROOT).rollout(0).unwrap();
        let b = tree.get(Tree::ROOT).rollout(1).unwrap();
        let a = tree.add_child(Tree::ROOT, 0, a);
        let b = tree.memoize_child(Tree::ROOT, 1, b);

        assert_eq!(tree.len(), 3);
        assert!(!tree.is_empty());
        assert_eq!(tree.root().children(), &[a]);
        assert_eq!(
            tree.get(b).attachment(),
            &Attachment::Linked(TreeLinks {
                parent: Some(Tree::ROOT),
                ..TreeLinks::default()
            })
        );
        assert_eq!(tree.root().expanded_child(1), Some(b));
        assert_eq!(tree.root().expanded_child(0), None);
        assert_eq!(tree.get(a).parent(), Some(Tree::ROOT));
        assert_eq!(tree.get(b).action, Some(1));
        assert!(!tree.root().is_committed());
    }

    #[test]
    fn test_backpropagate_to_root() {
        let mut tree = Tree::new(Node::default());
        let child = tree.root().rollout(0).unwrap();
        let child = tree.add_child(Tree::ROOT, 0, child);
        let grandchild = tree.get(child).rollout(6).unwrap();
        let grandchild = tree.add_child(child, 6, grandchild);

        tree.backpropagate(grandchild, 0.5);
        tree.backpropagate(child, 1.0);

        assert_eq!(tree.root().visits, 2);
        assert_eq!(tree.get(child).visits, 2);
        assert_eq!(tree.get(grandchild).visits, 1);
        assert!((tree.root().total_reward - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_commit_play_clears_tree_context() {
        let mut tree = Tree::new(Node::default());
        let child = tree.root().rollout(0).unwrap();
        let child = tree.add_child(Tree::ROOT, 0, child);
        tree.backpropagate(child, 1.0);

        let mut node = tree.get(child).clone();
        node.lower = 2.0;
        node.upper = 4.0;
        assert!(!node.is_committed());

        node.commit_play(6).unwrap();
        assert_eq!(node.attachment(), &Attachment::Committed);
        assert_eq!(node.parent(), None);
        assert!(node.children().is_empty());
        assert_eq!(node.expanded().count(), 0);
        assert_eq!(node.lower, NEG_INF);
        assert_eq!(node.upper, POS_INF);
        assert_eq!(node.visits, 0);
        assert_eq!(node.player, Player::One);
        assert_eq!(node.pos().pits(), &[0, 5, 5, 5, 5, 4, 0, 5, 5, 5, 5, 4]);
    }

    #[test]
    fn test_failed_commit_keeps_node() {
        let mut node = Node::default();
        assert!(node.commit_play(7).is_err());
        assert_eq!(node.player, Player::One);
        assert_eq!(node.pos().pits(), &[4; 12]);
    }
}
