//! Chess move representation and its text (UCI) notation.

use std::fmt;
use std::str::FromStr;

use crate::square::{Square, SquareError};

/// Piece a pawn may promote to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromotionPiece {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl PromotionPiece {
    /// Lowercase letter used by UCI notation.
    pub fn to_char(self) -> char {
        match self {
            PromotionPiece::Knight => 'n',
            PromotionPiece::Bishop => 'b',
            PromotionPiece::Rook => 'r',
            PromotionPiece::Queen => 'q',
        }
    }

    fn from_char(c: char) -> Option<PromotionPiece> {
        match c.to_ascii_lowercase() {
            'n' => Some(PromotionPiece::Knight),
            'b' => Some(PromotionPiece::Bishop),
            'r' => Some(PromotionPiece::Rook),
            'q' => Some(PromotionPiece::Queen),
            _ => None,
        }
    }
}

/// Kind of a move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoveKind {
    #[default]
    Normal,
    Promotion(PromotionPiece),
    EnPassant,
    /// Castling, stored as the king capturing its own rook.
    Castling,
}

/// A move from one square to another.
///
/// Castling moves are encoded king-captures-rook so that standard and
/// Chess960 castling share one representation; only the rendering differs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    /// The null move, rendered as `0000`.
    pub const NULL: Move = Move {
        from: Square::None,
        to: Square::None,
        kind: MoveKind::Normal,
    };

    pub const fn new(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            kind: MoveKind::Normal,
        }
    }

    pub const fn promotion(from: Square, to: Square, piece: PromotionPiece) -> Move {
        Move {
            from,
            to,
            kind: MoveKind::Promotion(piece),
        }
    }

    pub const fn en_passant(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            kind: MoveKind::EnPassant,
        }
    }

    /// Creates a castling move from the king square to the castling rook square.
    pub const fn castling(king: Square, rook: Square) -> Move {
        Move {
            from: king,
            to: rook,
            kind: MoveKind::Castling,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.from == Square::None
    }

    /// Renders the move in UCI notation.
    ///
    /// With `is_chess960` unset, castling is written as the king's two-square
    /// step (`e1g1`); with it set, as king-takes-rook (`e1h1`).
    ///
    /// # Arguments
    ///
    /// * `is_chess960` - Whether to use Chess960 castling notation.
    pub fn to_uci(&self, is_chess960: bool) -> String {
        if self.is_null() {
            return "0000".to_string();
        }

        let to = match self.kind {
            MoveKind::Castling if !is_chess960 => {
                let file = if self.to.file() > self.from.file() { 6 } else { 2 };
                Square::from_file_rank(file, self.from.rank() as u8)
            }
            _ => self.to,
        };

        match self.kind {
            MoveKind::Promotion(piece) => format!("{}{}{}", self.from, to, piece.to_char()),
            _ => format!("{}{}", self.from, to),
        }
    }
}

impl fmt::Display for Move {
    /// Standard (non-960) UCI notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci(false))
    }
}

/// Errors produced when parsing a move from UCI text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Input is not 4 or 5 characters long
    InvalidLength(usize),
    /// One of the squares is malformed
    InvalidSquare(SquareError),
    /// Unknown promotion piece letter
    InvalidPromotion(char),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::InvalidLength(len) => {
                write!(f, "Invalid move length {len}: expected 4 or 5 characters")
            }
            MoveError::InvalidSquare(err) => write!(f, "Invalid move square: {err}"),
            MoveError::InvalidPromotion(c) => {
                write!(f, "Invalid promotion piece '{c}': must be one of n, b, r, q")
            }
        }
    }
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoveError::InvalidSquare(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SquareError> for MoveError {
    fn from(err: SquareError) -> Self {
        MoveError::InvalidSquare(err)
    }
}

impl FromStr for Move {
    type Err = MoveError;

    /// Parses `e2e4`, `e7e8q` or `0000`.
    ///
    /// Castling and en passant cannot be told apart from normal moves without
    /// a board, so they parse as `MoveKind::Normal`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "0000" {
            return Ok(Move::NULL);
        }
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(MoveError::InvalidLength(s.chars().count()));
        }

        let from = s[0..2].parse::<Square>()?;
        let to = s[2..4].parse::<Square>()?;
        match s[4..].chars().next() {
            None => Ok(Move::new(from, to)),
            Some(c) => PromotionPiece::from_char(c)
                .map(|piece| Move::promotion(from, to, piece))
                .ok_or(MoveError::InvalidPromotion(c)),
        }
    }
}
