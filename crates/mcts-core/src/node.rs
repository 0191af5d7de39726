//! Search tree nodes.
//!
//! [`SearchNode`] is the read surface the evaluation reporter needs from the
//! tree. [`Node`] implements it on top of [`NodeData`] guarded by a per-node
//! spin lock; the search algorithm drives it through the mutating methods.

pub mod node_data;
pub mod node_type;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::chess_move::Move;
use crate::node::node_data::NodeData;
use crate::node::node_type::NodeType;
use crate::types::{Value, Visits};
use crate::util::spinlock::{SpinMutex, SpinMutexGuard};

/// Read access to a search tree node.
///
/// Child indices follow the node's legal-move order. Every read is a
/// snapshot that may be stale while the search keeps running.
pub trait SearchNode: Sized {
    /// Number of legal moves (potential children).
    fn number_child_nodes(&self) -> usize;

    /// Children whose outcome is not proven yet.
    fn number_unsolved_child_nodes(&self) -> usize;

    fn legal_moves(&self) -> &[Move];

    /// Move leading to child `child_idx`.
    fn get_move(&self, child_idx: usize) -> Move {
        self.legal_moves()[child_idx]
    }

    /// Expanded child at `child_idx`, `None` if not expanded.
    fn child_node(&self, child_idx: usize) -> Option<Arc<Self>>;

    fn node_type(&self) -> NodeType;

    /// Whether the search has produced a usable value for this node.
    fn is_playout_node(&self) -> bool;

    /// Appends the node's best known continuation to `pv`.
    fn principal_variation(&self, pv: &mut Vec<Move>);

    /// Mean value of child `child_idx` from this node's side to move.
    fn q_value(&self, child_idx: usize) -> Value;

    /// Visit counts of the discovered children.
    fn child_number_visits(&self) -> Vec<Visits>;

    /// Fills `policy` with the visit distribution over all legal moves.
    fn mcts_policy(&self, policy: &mut Vec<f32>);

    /// Most visited child, ties broken by the lowest index.
    fn best_move_index(&self) -> usize;

    /// Number of nodes searched below this node.
    fn node_count(&self) -> u64;
}

/// A position in the search tree.
pub struct Node {
    legal_moves: Vec<Move>,
    /// Child statistics, absent for terminal positions.
    data: Option<SpinMutex<NodeData<Arc<Node>>>>,
    /// Proven outcome of a terminal position.
    terminal_type: NodeType,
    /// Value estimate stored as `f32` bits.
    value: AtomicU32,
    is_playout: AtomicBool,
}

impl Node {
    /// Creates an unevaluated node for a position with the given legal moves.
    ///
    /// A position without legal moves should be created with [`Node::new_terminal`].
    pub fn new(legal_moves: Vec<Move>) -> Node {
        let data = (!legal_moves.is_empty())
            .then(|| SpinMutex::new(NodeData::new(legal_moves.len())));
        Node {
            legal_moves,
            data,
            terminal_type: NodeType::Unsolved,
            value: AtomicU32::new(0.0f32.to_bits()),
            is_playout: AtomicBool::new(false),
        }
    }

    /// Creates a terminal node (mate, stalemate, ...) with a known outcome.
    ///
    /// The value is set to the exact game result and the node counts as evaluated.
    pub fn new_terminal(node_type: NodeType) -> Node {
        let value: Value = match node_type {
            NodeType::SolvedWin => 1.0,
            NodeType::SolvedLoss => -1.0,
            NodeType::SolvedDraw | NodeType::Unsolved => 0.0,
        };
        Node {
            legal_moves: Vec::new(),
            data: None,
            terminal_type: node_type,
            value: AtomicU32::new(value.to_bits()),
            is_playout: AtomicBool::new(true),
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.data.is_none()
    }

    /// Value estimate for the side to move.
    #[inline]
    pub fn value(&self) -> Value {
        f32::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Stores the evaluation and marks the node as a playout node.
    pub fn set_value(&self, value: Value) {
        self.value.store(value.to_bits(), Ordering::Relaxed);
        self.is_playout.store(true, Ordering::Release);
    }

    /// Locks the node statistics. `None` for terminal nodes.
    #[inline]
    pub fn lock(&self) -> Option<SpinMutexGuard<'_, NodeData<Arc<Node>>>> {
        self.data.as_ref().map(|data| data.lock())
    }

    /// Attaches an expanded child at `child_idx`.
    ///
    /// # Panics
    ///
    /// Panics on terminal nodes and when `child_idx` is not a legal-move index.
    pub fn set_child(&self, child_idx: usize, child: Arc<Node>) {
        assert!(child_idx < self.legal_moves.len(), "child index {child_idx} out of range");
        self.expect_data().lock().set_child_node(child_idx, child);
    }

    /// Backs up a simulation result through child `child_idx`.
    ///
    /// Child slots up to `child_idx` are created when missing. The first visit
    /// of a child must follow discovery order: a child may only be visited for
    /// the first time once every lower index has been visited.
    ///
    /// # Arguments
    ///
    /// * `child_idx` - Child the simulation went through.
    /// * `value` - Result from this node's side-to-move perspective.
    ///
    /// # Panics
    ///
    /// Panics on terminal nodes and when `child_idx` is not a legal-move index.
    pub fn backup(&self, child_idx: usize, value: Value) {
        self.record(child_idx, value, false);
    }

    /// Like [`Node::backup`] for a simulation that ended in a terminal position.
    pub fn backup_terminal(&self, child_idx: usize, value: Value) {
        self.record(child_idx, value, true);
    }

    fn record(&self, child_idx: usize, value: Value, is_terminal: bool) {
        assert!(child_idx < self.legal_moves.len(), "child index {child_idx} out of range");
        let mut data = self.expect_data().lock();
        while data.len() <= child_idx {
            data.add_empty_child();
        }
        data.record_visit(child_idx, value, is_terminal);
    }

    /// Marks the node as proven.
    pub fn solve(&self, node_type: NodeType, end_in_ply: u32) {
        self.expect_data().lock().solve(node_type, end_in_ply);
    }

    fn expect_data(&self) -> &SpinMutex<NodeData<Arc<Node>>> {
        self.data
            .as_ref()
            .unwrap_or_else(|| panic!("terminal node has no child statistics"))
    }
}

impl SearchNode for Node {
    fn number_child_nodes(&self) -> usize {
        self.legal_moves.len()
    }

    fn number_unsolved_child_nodes(&self) -> usize {
        self.lock().map_or(0, |d| d.number_unsolved_child_nodes())
    }

    fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    fn child_node(&self, child_idx: usize) -> Option<Arc<Node>> {
        self.lock()?.child_node(child_idx).cloned()
    }

    fn node_type(&self) -> NodeType {
        self.lock().map_or(self.terminal_type, |d| d.node_type())
    }

    fn is_playout_node(&self) -> bool {
        self.is_playout.load(Ordering::Acquire)
    }

    fn principal_variation(&self, pv: &mut Vec<Move>) {
        let mut child_idx = match self.lock() {
            Some(d) => d.best_child_index(),
            None => return,
        };
        pv.push(self.get_move(child_idx));

        let mut next = self.child_node(child_idx);
        while let Some(node) = next {
            if !node.is_playout_node() {
                break;
            }
            child_idx = match node.lock() {
                Some(d) => d.best_child_index(),
                None => break,
            };
            pv.push(node.get_move(child_idx));
            next = node.child_node(child_idx);
        }
    }

    fn q_value(&self, child_idx: usize) -> Value {
        self.lock()
            .map_or(self.value(), |d| d.q_value(child_idx))
    }

    fn child_number_visits(&self) -> Vec<Visits> {
        self.lock()
            .map_or_else(Vec::new, |d| d.child_number_visits().to_vec())
    }

    fn mcts_policy(&self, policy: &mut Vec<f32>) {
        policy.clear();
        policy.resize(self.number_child_nodes(), 0.0);

        let Some(data) = self.lock() else {
            return;
        };
        let visits = data.child_number_visits();
        let sum: u64 = visits.iter().map(|&v| v as u64).sum();
        if sum == 0 {
            return;
        }
        for (p, &v) in policy.iter_mut().zip(visits) {
            *p = v as f32 / sum as f32;
        }
    }

    fn best_move_index(&self) -> usize {
        self.lock().map_or(0, |d| d.best_child_index())
    }

    fn node_count(&self) -> u64 {
        self.lock().map_or(0, |d| {
            d.visit_sum().saturating_sub(d.terminal_visits()) as u64
        })
    }
}
