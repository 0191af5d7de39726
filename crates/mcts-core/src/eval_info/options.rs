/// Reporting settings supplied by the protocol layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalOptions {
    /// Number of principal variations to report.
    pub multi_pv: usize,
    /// Render castling in Chess960 (king-takes-rook) notation.
    pub is_chess960: bool,
}

impl EvalOptions {
    /// Report `multi_pv` lines, keeping the remaining defaults.
    #[must_use]
    pub fn new(multi_pv: usize) -> Self {
        EvalOptions {
            multi_pv,
            ..Default::default()
        }
    }

    /// Switch move notation for Chess960 games.
    #[must_use]
    pub fn with_chess960(mut self, is_chess960: bool) -> Self {
        self.is_chess960 = is_chess960;
        self
    }
}

impl Default for EvalOptions {
    fn default() -> Self {
        EvalOptions {
            multi_pv: 1,
            is_chess960: false,
        }
    }
}
