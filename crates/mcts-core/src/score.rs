//! Conversion of model values into reportable scores.

use std::fmt;

use crate::constants::{CENTIPAWN_CAP, CENTIPAWN_LOG_BASE};
use crate::types::{Centipawns, Value};

/// Score of a single reported line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineScore {
    /// Statistical estimate converted to centipawns.
    Centipawns(Centipawns),
    /// Proven result: positive means the reporting side mates, negative means it gets mated.
    Mate(i32),
}

impl fmt::Display for LineScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineScore::Centipawns(cp) => write!(f, "cp {cp}"),
            LineScore::Mate(n) => write!(f, "mate {n}"),
        }
    }
}

/// Maps a value in [-1, 1] to a pseudo centipawn score.
///
/// Uses `-sign(v) * ln(1 - |v|) / ln(1.2) * 100`, rounded to the nearest
/// integer. The function is odd and monotonic. `|v| >= 1` saturates at
/// `±9999` since the logarithm would diverge.
///
/// # Arguments
///
/// * `value` - Value estimate from the reporting side's perspective.
pub fn value_to_centipawn(value: Value) -> Centipawns {
    let sign = sgn(value);
    if value.abs() >= 1.0 {
        return sign * CENTIPAWN_CAP;
    }

    let scaled = -(sign as f32) * (1.0 - value.abs()).ln() / CENTIPAWN_LOG_BASE.ln() * 100.0;
    scaled.round() as Centipawns
}

#[inline]
fn sgn(value: Value) -> i32 {
    (value > 0.0) as i32 - (value < 0.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(value_to_centipawn(0.0), 0);
        assert_eq!(value_to_centipawn(-0.0), 0);
    }

    #[test]
    fn test_known_values() {
        // -ln(0.5) / ln(1.2) * 100 = 380.17...
        assert_eq!(value_to_centipawn(0.5), 380);
        assert_eq!(value_to_centipawn(-0.5), -380);
        // 57.79 rounds up
        assert_eq!(value_to_centipawn(0.1), 58);
    }

    #[test]
    fn test_odd_symmetry() {
        for i in -99..=99 {
            let v = i as f32 / 100.0;
            assert_eq!(value_to_centipawn(v), -value_to_centipawn(-v), "v = {v}");
        }
    }

    #[test]
    fn test_monotonic() {
        let mut prev = value_to_centipawn(-1.0);
        for i in -1000..=1000 {
            let cp = value_to_centipawn(i as f32 / 1000.0);
            assert!(cp >= prev, "not monotonic at {i}");
            prev = cp;
        }
    }

    #[test]
    fn test_saturation() {
        assert_eq!(value_to_centipawn(1.0), 9999);
        assert_eq!(value_to_centipawn(-1.0), -9999);
        assert_eq!(value_to_centipawn(1.5), 9999);
        assert!(value_to_centipawn(0.999_999) < 9999);
        assert!(value_to_centipawn(-0.999_999) > -9999);
    }

    #[test]
    fn test_line_score_display() {
        assert_eq!(LineScore::Centipawns(-42).to_string(), "cp -42");
        assert_eq!(LineScore::Mate(3).to_string(), "mate 3");
    }
}
