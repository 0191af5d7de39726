//! Text rendering of evaluation reports.

use std::fmt;

use crate::eval_info::EvalInfo;

impl EvalInfo {
    fn write_single_pv(
        &self,
        f: &mut fmt::Formatter<'_>,
        idx: usize,
        elapsed_ms: u64,
    ) -> fmt::Result {
        // The caller prefixes the first line itself.
        if idx != 0 {
            write!(f, "info score ")?;
        }
        write!(
            f,
            "multipv {} {} depth {} seldepth {} nodes {} time {} nps {} tbhits {} pv",
            idx + 1,
            self.score(idx),
            self.depth,
            self.sel_depth,
            self.nodes,
            elapsed_ms,
            self.nps_for(elapsed_ms),
            self.tb_hits
        )?;
        for mv in &self.pv[idx] {
            write!(f, " {}", mv.to_uci(self.is_chess960))?;
        }
        writeln!(f)
    }

    /// The `bestmove` command for the current report.
    pub fn bestmove_command(&self) -> String {
        match self.best_move() {
            Some(mv) => format!("bestmove {}", mv.to_uci(self.is_chess960)),
            None => "bestmove (none)".to_string(),
        }
    }
}

/// One line per resolved principal variation.
impl fmt::Display for EvalInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed_ms = self.elapsed_time_ms();
        for idx in 0..self.line_count() {
            self.write_single_pv(f, idx, elapsed_ms)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_move::Move;
    use crate::square::Square;

    fn two_line_info() -> EvalInfo {
        let mut info = EvalInfo::default();
        info.pv = vec![
            vec![Move::new(Square::E2, Square::E4), Move::new(Square::E7, Square::E5)],
            vec![Move::castling(Square::E1, Square::H1)],
        ];
        info.centipawns = vec![35, 0];
        info.moves_to_mate = vec![0, 2];
        info.best_move_q = vec![0.06, 0.0];
        info.depth = 2;
        info.sel_depth = 5;
        info.nodes = 1200;
        info.tb_hits = 3;
        info
    }

    #[test]
    fn test_render_two_lines() {
        let info = two_line_info();
        let text = info.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "multipv 1 cp 35 depth 2 seldepth 5 nodes 1200 time 0 nps 1200000 tbhits 3 pv e2e4 e7e5"
        );
        assert_eq!(
            lines[1],
            "info score multipv 2 mate 2 depth 2 seldepth 5 nodes 1200 time 0 nps 1200000 tbhits 3 pv e1g1"
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_render_chess960_notation() {
        let mut info = two_line_info();
        info.is_chess960 = true;
        assert!(info.to_string().ends_with("pv e1h1\n"));
    }

    #[test]
    fn test_render_empty() {
        let info = EvalInfo::default();
        assert_eq!(info.to_string(), "");
        assert_eq!(info.bestmove_command(), "bestmove (none)");
    }

    #[test]
    fn test_bestmove_command() {
        let info = two_line_info();
        assert_eq!(info.bestmove_command(), "bestmove e2e4");
    }
}
