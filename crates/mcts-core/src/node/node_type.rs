//! Game-theoretic classification of search nodes.

/// Proven state of a node, from the perspective of the side to move at that node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Outcome unknown; the node's value is a statistical estimate.
    #[default]
    Unsolved,
    /// The side to move wins by force.
    SolvedWin,
    /// The side to move loses by force.
    SolvedLoss,
    /// Forced draw.
    SolvedDraw,
}

impl NodeType {
    /// Returns true for any proven outcome.
    #[inline]
    pub fn is_solved(self) -> bool {
        self != NodeType::Unsolved
    }

    /// The same outcome seen from the opponent's side.
    pub fn flip(self) -> NodeType {
        match self {
            NodeType::SolvedWin => NodeType::SolvedLoss,
            NodeType::SolvedLoss => NodeType::SolvedWin,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip() {
        assert_eq!(NodeType::SolvedWin.flip(), NodeType::SolvedLoss);
        assert_eq!(NodeType::SolvedLoss.flip(), NodeType::SolvedWin);
        assert_eq!(NodeType::SolvedDraw.flip(), NodeType::SolvedDraw);
        assert_eq!(NodeType::Unsolved.flip(), NodeType::Unsolved);
    }

    #[test]
    fn test_is_solved() {
        assert!(!NodeType::default().is_solved());
        assert!(NodeType::SolvedDraw.is_solved());
    }
}
