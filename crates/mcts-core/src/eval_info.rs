//! Evaluation reports extracted from the search tree.
//!
//! [`update_eval_info`] snapshots the root, ranks its children and resolves
//! up to `multi_pv` principal variations with centipawn or mate scores.
//! The filled [`EvalInfo`] renders as protocol `info` lines.

mod display;
pub mod options;

use std::time::Instant;

use log::{debug, log_enabled, trace};

use crate::chess_move::Move;
use crate::node::SearchNode;
use crate::node::node_type::NodeType;
use crate::score::{LineScore, value_to_centipawn};
use crate::types::{Centipawns, Depth, Value, Visits};
use crate::util::permutation::{apply_permutation_in_place, sort_permutation};

pub use options::EvalOptions;

/// Evaluation of the current search state, one entry per resolved line.
///
/// `pv`, `centipawns`, `moves_to_mate` and `best_move_q` are index-aligned.
/// The report may hold fewer lines than requested, including none.
#[derive(Clone, Debug)]
pub struct EvalInfo {
    /// Number of lines requested by the last update.
    pub multi_pv: usize,
    /// Render castling moves in Chess960 notation.
    pub is_chess960: bool,
    /// Root legal moves, sorted by policy when more than one line is requested.
    pub legal_moves: Vec<Move>,
    /// Visit-derived policy, aligned with `legal_moves`.
    pub policy_prob_small: Vec<f32>,
    /// Root child visit counts in discovery order.
    pub child_number_visits: Vec<Visits>,
    pub pv: Vec<Vec<Move>>,
    pub centipawns: Vec<Centipawns>,
    /// Signed mate distance in moves, 0 when the line is not proven.
    pub moves_to_mate: Vec<i32>,
    /// Raw value of the line's first move from the root side's perspective.
    pub best_move_q: Vec<Value>,
    pub depth: Depth,
    pub sel_depth: Depth,
    pub nodes: u64,
    /// Node count when the search started, for nodes-per-second.
    pub nodes_pre_search: u64,
    pub tb_hits: u64,
    pub start: Instant,
    pub end: Instant,
}

impl EvalInfo {
    /// Creates an empty report.
    pub fn new(options: &EvalOptions) -> Self {
        let now = Instant::now();
        EvalInfo {
            multi_pv: options.multi_pv,
            is_chess960: options.is_chess960,
            legal_moves: Vec::new(),
            policy_prob_small: Vec::new(),
            child_number_visits: Vec::new(),
            pv: Vec::new(),
            centipawns: Vec::new(),
            moves_to_mate: Vec::new(),
            best_move_q: Vec::new(),
            depth: 0,
            sel_depth: 0,
            nodes: 0,
            nodes_pre_search: 0,
            tb_hits: 0,
            start: now,
            end: now,
        }
    }

    /// Stamps the search start and remembers the tree size at that point.
    pub fn start_search(&mut self, nodes_pre_search: u64) {
        self.start = Instant::now();
        self.end = self.start;
        self.nodes_pre_search = nodes_pre_search;
    }

    /// Stamps the time of the report.
    pub fn stop_search(&mut self) {
        self.end = Instant::now();
    }

    /// Milliseconds between `start` and `end`.
    pub fn elapsed_time_ms(&self) -> u64 {
        self.end.saturating_duration_since(self.start).as_millis() as u64
    }

    /// Nodes per second over the elapsed time.
    pub fn nps(&self) -> u64 {
        self.nps_for(self.elapsed_time_ms())
    }

    /// Nodes per second for a given elapsed time.
    ///
    /// Elapsed times below 1 ms count as 1 ms.
    pub fn nps_for(&self, elapsed_ms: u64) -> u64 {
        let elapsed_secs = elapsed_ms.max(1) as f64 / 1000.0;
        let searched = self.nodes.saturating_sub(self.nodes_pre_search);
        (searched as f64 / elapsed_secs).round() as u64
    }

    /// Number of resolved lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.pv.len()
    }

    /// Score of line `idx`: mate when the line is proven, centipawns otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a resolved line.
    pub fn score(&self, idx: usize) -> LineScore {
        match self.moves_to_mate[idx] {
            0 => LineScore::Centipawns(self.centipawns[idx]),
            n => LineScore::Mate(n),
        }
    }

    /// First move of the best line.
    pub fn best_move(&self) -> Option<Move> {
        self.pv.first().and_then(|line| line.first()).copied()
    }

    fn truncate_lines(&mut self, len: usize) {
        self.moves_to_mate.truncate(len);
        self.best_move_q.truncate(len);
        self.centipawns.truncate(len);
        self.pv.truncate(len);
    }
}

impl Default for EvalInfo {
    fn default() -> Self {
        EvalInfo::new(&EvalOptions::default())
    }
}

/// Refreshes `eval_info` from the current state of the tree below `root`.
///
/// Line 0 is always the most visited child, the move the search would play.
/// Further lines follow the children sorted by policy. Resolution stops at the
/// first line whose child is not expanded or not evaluated yet.
///
/// # Arguments
///
/// * `eval_info` - Report to overwrite.
/// * `root` - Root of the search tree.
/// * `tb_hits` - Table-base hits so far.
/// * `sel_depth` - Selective depth reached by the search.
/// * `multi_pv` - Number of lines requested.
pub fn update_eval_info<N: SearchNode>(
    eval_info: &mut EvalInfo,
    root: &N,
    tb_hits: u64,
    sel_depth: Depth,
    multi_pv: usize,
) {
    eval_info.multi_pv = multi_pv;
    eval_info.child_number_visits = root.child_number_visits();
    eval_info.legal_moves.clear();
    eval_info.legal_moves.extend_from_slice(root.legal_moves());
    root.mcts_policy(&mut eval_info.policy_prob_small);
    eval_info
        .policy_prob_small
        .resize(eval_info.legal_moves.len(), 0.0);

    let max_idx = multi_pv.min(eval_info.legal_moves.len());
    let mut indices = Vec::with_capacity(eval_info.legal_moves.len());
    if max_idx > 1 {
        sort_eval_lists(eval_info, &mut indices);
    }

    eval_info.pv.clear();
    eval_info.moves_to_mate.clear();
    eval_info.moves_to_mate.resize(max_idx, 0);
    eval_info.best_move_q.clear();
    eval_info.best_move_q.resize(max_idx, 0.0);
    eval_info.centipawns.clear();
    eval_info.centipawns.resize(max_idx, 0);

    for idx in 0..max_idx {
        if !set_eval_for_single_pv(eval_info, root, idx, &indices) {
            debug!("resolved {idx} of {max_idx} requested lines");
            break;
        }
    }

    eval_info.depth = eval_info.pv.first().map_or(0, Vec::len);
    eval_info.sel_depth = sel_depth;
    eval_info.nodes = root.node_count();
    eval_info.tb_hits = tb_hits;
}

/// Sorts policy and legal moves by descending policy and records the original
/// child index of every rank in `indices`.
fn sort_eval_lists(eval_info: &mut EvalInfo, indices: &mut Vec<usize>) {
    let permutation = sort_permutation(&eval_info.policy_prob_small, |a, b| b.total_cmp(a));
    indices.clear();
    indices.extend(0..eval_info.legal_moves.len());

    apply_permutation_in_place(&mut eval_info.policy_prob_small, &permutation);
    apply_permutation_in_place(&mut eval_info.legal_moves, &permutation);
    apply_permutation_in_place(indices, &permutation);
}

/// Resolves line `idx`. Returns false, after truncating the report to `idx`
/// lines, when the selected child cannot be reported yet.
fn set_eval_for_single_pv<N: SearchNode>(
    eval_info: &mut EvalInfo,
    root: &N,
    idx: usize,
    indices: &[usize],
) -> bool {
    let child_idx = if idx == 0 {
        root.best_move_index()
    } else {
        indices[idx]
    };

    let next_node = match root.child_node(child_idx) {
        Some(node) if node.is_playout_node() => node,
        _ => {
            eval_info.truncate_lines(idx);
            return false;
        }
    };

    let mut pv = vec![root.get_move(child_idx)];
    next_node.principal_variation(&mut pv);
    let line_len = pv.len();
    eval_info.pv.push(pv);

    // Parity of the resolved line count, including this line.
    let parity = (eval_info.pv.len() % 2) as i32;
    match next_node.node_type() {
        NodeType::SolvedLoss => {
            eval_info.moves_to_mate[idx] = (line_len / 2) as i32 + parity;
        }
        NodeType::SolvedWin => {
            eval_info.moves_to_mate[idx] = -((line_len / 2) as i32 + parity);
        }
        NodeType::Unsolved | NodeType::SolvedDraw => {
            let q = root.q_value(child_idx);
            eval_info.moves_to_mate[idx] = 0;
            eval_info.best_move_q[idx] = q;
            eval_info.centipawns[idx] = value_to_centipawn(q);
        }
    }

    if log_enabled!(log::Level::Trace) {
        trace!(
            "line {} child {} len {} score {}",
            idx + 1,
            child_idx,
            line_len,
            eval_info.score(idx)
        );
    }
    true
}
