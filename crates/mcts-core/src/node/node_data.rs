//! Per-node child statistics stored as index-aligned flat sequences.

use crate::constants::{NO_CHECKMATE, PRESERVED_ITEMS, Q_INIT};
use crate::node::node_type::NodeType;
use crate::types::{Value, Visits};

/// Statistics of the children of one search node.
///
/// All per-child sequences share one index space (child discovery order) and
/// grow together, one slot per newly discovered child. `C` is the owned child
/// handle type.
///
/// The struct does no locking of its own; the owning node serializes access.
#[derive(Debug)]
pub struct NodeData<C> {
    /// Visit count of each child.
    child_number_visits: Vec<Visits>,
    /// Sum of backed-up values of each child (W).
    action_values: Vec<Value>,
    /// Combined exploitation/exploration value of each child. Only the first
    /// `no_visit_idx` entries are meaningful for selection.
    q_values: Vec<Value>,
    /// Owned child nodes, `None` until expanded.
    child_nodes: Vec<Option<C>>,
    /// Real visits that went through this node.
    visit_sum: Visits,
    /// Visits that ended in a terminal position below this node.
    terminal_visits: Visits,
    checkmate_idx: usize,
    /// Plies to the proven end of the game, 0 if not proven.
    end_in_ply: u32,
    /// Number of children that have been visited at least once.
    no_visit_idx: usize,
    number_unsolved_child_nodes: usize,
    node_type: NodeType,
}

impl<C> NodeData<C> {
    /// Creates statistics for a node with `number_child_nodes` legal moves.
    ///
    /// The first child slot is created eagerly.
    pub fn new(number_child_nodes: usize) -> Self {
        let mut data = NodeData {
            child_number_visits: Vec::new(),
            action_values: Vec::new(),
            q_values: Vec::new(),
            child_nodes: Vec::new(),
            visit_sum: 0,
            terminal_visits: 0,
            checkmate_idx: NO_CHECKMATE,
            end_in_ply: 0,
            no_visit_idx: 0,
            number_unsolved_child_nodes: number_child_nodes,
            node_type: NodeType::Unsolved,
        };
        data.reserve(number_child_nodes);
        data
    }

    /// Pre-allocates up to [`PRESERVED_ITEMS`] slots and creates the first one.
    ///
    /// Wide nodes only get the capped capacity; later children reallocate on
    /// demand.
    pub fn reserve(&mut self, number_child_nodes: usize) {
        let init_size = PRESERVED_ITEMS.min(number_child_nodes);

        self.child_number_visits.reserve(init_size);
        self.action_values.reserve(init_size);
        self.q_values.reserve(init_size);
        self.child_nodes.reserve(init_size);

        self.add_empty_child();
    }

    /// Appends a zero-initialized slot for a newly discovered child.
    pub fn add_empty_child(&mut self) {
        self.child_number_visits.push(0);
        self.action_values.push(0.0);
        self.q_values.push(Q_INIT);
        self.child_nodes.push(None);
        self.debug_check_lengths();
    }

    /// Combined values of the visited children.
    ///
    /// This is the slice the selection step runs its argmax over; children
    /// past the visited prefix still carry [`Q_INIT`].
    #[inline]
    pub fn populated_combined_values(&self) -> &[Value] {
        debug_assert!(self.no_visit_idx <= self.q_values.len());
        &self.q_values[..self.no_visit_idx]
    }

    /// Number of child slots created so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.child_number_visits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.child_number_visits.is_empty()
    }

    #[inline]
    pub fn child_number_visits(&self) -> &[Visits] {
        &self.child_number_visits
    }

    #[inline]
    pub fn action_values(&self) -> &[Value] {
        &self.action_values
    }

    #[inline]
    pub fn combined_values(&self) -> &[Value] {
        &self.q_values
    }

    /// Child handle at `idx`, `None` if the slot does not exist or is not expanded.
    #[inline]
    pub fn child_node(&self, idx: usize) -> Option<&C> {
        self.child_nodes.get(idx).and_then(Option::as_ref)
    }

    /// Stores the expanded child for slot `idx`, creating slots up to it.
    pub fn set_child_node(&mut self, idx: usize, child: C) {
        while self.len() <= idx {
            self.add_empty_child();
        }
        self.child_nodes[idx] = Some(child);
    }

    /// Mean backed-up value of child `idx`, or [`Q_INIT`] when unvisited.
    ///
    /// # Panics
    ///
    /// Panics if the slot does not exist.
    #[inline]
    pub fn q_value(&self, idx: usize) -> Value {
        match self.child_number_visits[idx] {
            0 => Q_INIT,
            visits => self.action_values[idx] / visits as Value,
        }
    }

    /// Records one simulation through child `idx`.
    ///
    /// `value` is the simulation result from the perspective of the side to
    /// move at this node. The combined value is reset to the plain mean; the
    /// search adds its exploration term through [`NodeData::set_combined_value`].
    ///
    /// The first visit of a child must go to slot `no_visit_idx`, so that the
    /// visited children stay a prefix in discovery order. Debug builds assert it.
    ///
    /// # Panics
    ///
    /// Panics if the slot does not exist.
    pub fn record_visit(&mut self, idx: usize, value: Value, is_terminal: bool) {
        self.child_number_visits[idx] += 1;
        self.action_values[idx] += value;
        self.q_values[idx] = self.q_value(idx);
        if idx >= self.no_visit_idx {
            debug_assert_eq!(idx, self.no_visit_idx, "children are visited in discovery order");
            self.no_visit_idx = idx + 1;
        }

        self.visit_sum += 1;
        if is_terminal {
            self.terminal_visits += 1;
        }
    }

    /// Restores the totals of child `idx` in one step, as when reloading a saved tree.
    ///
    /// The slot must not have been visited yet. Visited children still have to
    /// form a prefix in discovery order.
    ///
    /// # Arguments
    ///
    /// * `idx` - Existing child slot.
    /// * `visits` - Visit count of the child.
    /// * `value_sum` - Sum of backed-up values (W) of the child.
    /// * `terminal_visits` - Visits of the child that ended in a terminal position.
    ///
    /// # Panics
    ///
    /// Panics if the slot does not exist.
    pub fn set_child_stats(
        &mut self,
        idx: usize,
        visits: Visits,
        value_sum: Value,
        terminal_visits: Visits,
    ) {
        debug_assert_eq!(self.child_number_visits[idx], 0, "child {idx} already has visits");
        debug_assert!(terminal_visits <= visits);

        self.child_number_visits[idx] = visits;
        self.action_values[idx] = value_sum;
        self.q_values[idx] = self.q_value(idx);
        if visits > 0 && idx >= self.no_visit_idx {
            debug_assert_eq!(idx, self.no_visit_idx, "children are visited in discovery order");
            self.no_visit_idx = idx + 1;
        }

        self.visit_sum = self.visit_sum.saturating_add(visits);
        self.terminal_visits = self.terminal_visits.saturating_add(terminal_visits);
        self.debug_check_lengths();
    }

    /// Overwrites the combined value of a visited child.
    pub fn set_combined_value(&mut self, idx: usize, value: Value) {
        debug_assert!(idx < self.no_visit_idx, "combined value set on unvisited child {idx}");
        self.q_values[idx] = value;
    }

    /// Index of the most visited child, ties broken by the lowest index.
    pub fn best_child_index(&self) -> usize {
        let mut best_idx = 0;
        for (idx, &visits) in self.child_number_visits.iter().enumerate() {
            if visits > self.child_number_visits[best_idx] {
                best_idx = idx;
            }
        }
        best_idx
    }

    #[inline]
    pub fn visit_sum(&self) -> Visits {
        self.visit_sum
    }

    #[inline]
    pub fn terminal_visits(&self) -> Visits {
        self.terminal_visits
    }

    #[inline]
    pub fn no_visit_idx(&self) -> usize {
        self.no_visit_idx
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    #[inline]
    pub fn end_in_ply(&self) -> u32 {
        self.end_in_ply
    }

    /// Marks the node as proven, `end_in_ply` plies from the end of the game.
    pub fn solve(&mut self, node_type: NodeType, end_in_ply: u32) {
        self.node_type = node_type;
        self.end_in_ply = if node_type.is_solved() { end_in_ply } else { 0 };
    }

    /// Index of a child that delivers mate, if one is known.
    #[inline]
    pub fn checkmate_idx(&self) -> Option<usize> {
        (self.checkmate_idx != NO_CHECKMATE).then_some(self.checkmate_idx)
    }

    pub fn set_checkmate_idx(&mut self, idx: usize) {
        self.checkmate_idx = idx;
    }

    #[inline]
    pub fn number_unsolved_child_nodes(&self) -> usize {
        self.number_unsolved_child_nodes
    }

    /// Counts one more child as proven.
    pub fn mark_child_solved(&mut self) {
        self.number_unsolved_child_nodes = self.number_unsolved_child_nodes.saturating_sub(1);
    }

    #[inline]
    fn debug_check_lengths(&self) {
        debug_assert!(
            self.action_values.len() == self.child_number_visits.len()
                && self.q_values.len() == self.child_number_visits.len()
                && self.child_nodes.len() == self.child_number_visits.len(),
            "child statistics out of alignment"
        );
    }
}
