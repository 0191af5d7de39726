//! JSON snapshots of a search tree.
//!
//! A snapshot describes every node by its legal moves, its evaluation and the
//! statistics of its children. Loading replays the statistics into a live
//! [`Node`] tree so reports are produced by the same code the search uses.

use std::io::Read;
use std::sync::Arc;

use log::debug;
use mcts_core::chess_move::Move;
use mcts_core::node::Node;
use mcts_core::node::node_type::NodeType;
use serde::Deserialize;

use crate::error::{CliError, Result};

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum SnapshotNodeType {
    #[default]
    Unsolved,
    Win,
    Loss,
    Draw,
}

impl From<SnapshotNodeType> for NodeType {
    fn from(node_type: SnapshotNodeType) -> Self {
        match node_type {
            SnapshotNodeType::Unsolved => NodeType::Unsolved,
            SnapshotNodeType::Win => NodeType::SolvedWin,
            SnapshotNodeType::Loss => NodeType::SolvedLoss,
            SnapshotNodeType::Draw => NodeType::SolvedDraw,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeSnapshot {
    #[serde(default)]
    moves: Vec<String>,
    /// Entries of `moves` that castle, written king-takes-rook (`e1h1`).
    #[serde(default)]
    castling: Vec<String>,
    /// Absent while the node waits for its evaluation.
    #[serde(default)]
    value: Option<f32>,
    #[serde(default)]
    node_type: SnapshotNodeType,
    #[serde(default)]
    end_in_ply: u32,
    /// Child statistics in discovery order, aligned with `moves`.
    #[serde(default)]
    children: Vec<ChildSnapshot>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChildSnapshot {
    #[serde(default)]
    visits: u32,
    #[serde(default)]
    value_sum: f32,
    #[serde(default)]
    terminal_visits: u32,
    #[serde(default)]
    node: Option<NodeSnapshot>,
}

/// Reads a snapshot and builds the tree it describes.
pub fn load_tree<R: Read>(reader: R) -> Result<Node> {
    let snapshot: NodeSnapshot = serde_json::from_reader(reader)?;
    let mut node_count = 0usize;
    let root = build_node(snapshot, &mut node_count)?;
    debug!("loaded snapshot with {node_count} nodes");
    Ok(root)
}

/// Builds a tree from snapshot text.
pub fn parse_tree(json: &str) -> Result<Node> {
    load_tree(json.as_bytes())
}

fn build_node(snapshot: NodeSnapshot, node_count: &mut usize) -> Result<Node> {
    *node_count += 1;
    let node_type = NodeType::from(snapshot.node_type);

    if snapshot.moves.is_empty() {
        if !snapshot.children.is_empty() {
            return Err(CliError::Snapshot(
                "node without moves cannot have children".to_string(),
            ));
        }
        return Ok(Node::new_terminal(node_type));
    }

    if snapshot.children.len() > snapshot.moves.len() {
        return Err(CliError::Snapshot(format!(
            "{} children listed for {} moves",
            snapshot.children.len(),
            snapshot.moves.len()
        )));
    }

    let moves = snapshot
        .moves
        .iter()
        .map(|uci| {
            uci.parse::<Move>()
                .map_err(|err| CliError::Snapshot(format!("move '{uci}': {err}")))
        })
        .collect::<Result<Vec<_>>>()?;
    let moves = mark_castling(moves, &snapshot.moves, &snapshot.castling)?;

    let node = Node::new(moves);
    if let Some(value) = snapshot.value {
        node.set_value(value);
    }

    let mut seen_unvisited = false;
    for (idx, child) in snapshot.children.into_iter().enumerate() {
        if child.terminal_visits > child.visits {
            return Err(CliError::Snapshot(format!(
                "child {idx} has more terminal visits than visits"
            )));
        }
        if child.visits == 0 {
            seen_unvisited = true;
        } else if seen_unvisited {
            return Err(CliError::Snapshot(format!(
                "child {idx} is visited after an unvisited child"
            )));
        }

        let child_node = child
            .node
            .map(|snapshot| build_node(snapshot, node_count))
            .transpose()?;

        let mut data = node
            .lock()
            .ok_or_else(|| CliError::Snapshot("node has no child statistics".to_string()))?;
        while data.len() <= idx {
            data.add_empty_child();
        }
        if let Some(child_node) = child_node {
            data.set_child_node(idx, Arc::new(child_node));
        }
        data.set_child_stats(idx, child.visits, child.value_sum, child.terminal_visits);
    }

    if node_type.is_solved() {
        node.solve(node_type, snapshot.end_in_ply);
    }
    Ok(node)
}

/// Turns the moves listed in `castling` into castling moves.
fn mark_castling(mut moves: Vec<Move>, uci: &[String], castling: &[String]) -> Result<Vec<Move>> {
    for king_takes_rook in castling {
        let idx = uci
            .iter()
            .position(|m| m.trim() == king_takes_rook.trim())
            .ok_or_else(|| {
                CliError::Snapshot(format!("castling move '{king_takes_rook}' is not a legal move"))
            })?;

        let mv = moves[idx];
        if mv.is_null() || mv.from.rank() != mv.to.rank() {
            return Err(CliError::Snapshot(format!(
                "castling move '{king_takes_rook}' must move along the back rank"
            )));
        }
        moves[idx] = Move::castling(mv.from, mv.to);
    }
    Ok(moves)
}
