use std::fmt;
use std::str::FromStr;

/// A square on the chess board, A1 through H8.
///
/// Squares are numbered rank by rank starting from White's side:
///
/// ```text
///   A  B  C  D  E  F  G  H
/// 8 56 57 58 59 60 61 62 63
/// 7 48 49 50 51 52 53 54 55
/// 6 40 41 42 43 44 45 46 47
/// 5 32 33 34 35 36 37 38 39
/// 4 24 25 26 27 28 29 30 31
/// 3 16 17 18 19 20 21 22 23
/// 2 08 09 10 11 12 13 14 15
/// 1 00 01 02 03 04 05 06 07
/// ```
///
/// `None` marks an unspecified square (used by the null move).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
#[rustfmt::skip]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
    #[default]
    None,
}

/// Number of files (and ranks) on the board.
pub const BOARD_SIZE: usize = 8;

/// Number of playable squares.
pub const TOTAL_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

impl Square {
    /// Returns the index of the square (0-63, 64 for `Square::None`).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts an index into a `Square` without bounds checking.
    ///
    /// # Arguments
    ///
    /// * `index` - Square index (0-63, or 64 for `None`).
    #[inline]
    pub fn from_usize_unchecked(index: usize) -> Square {
        debug_assert!(
            index <= TOTAL_SQUARES,
            "Index out of bounds for Square enum. index: {index:?}"
        );
        unsafe { std::mem::transmute(index as u8) }
    }

    /// Converts an index into a `Square`, returning `None` when it is out of range.
    #[inline]
    pub fn from_usize(index: usize) -> Option<Square> {
        (index <= TOTAL_SQUARES).then(|| Square::from_usize_unchecked(index))
    }

    /// Builds a square from zero-based file and rank.
    ///
    /// # Panics
    ///
    /// Panics if `file` or `rank` is not in `0..8`.
    #[inline]
    pub fn from_file_rank(file: u8, rank: u8) -> Square {
        assert!((file as usize) < BOARD_SIZE, "Invalid file: {file}");
        assert!((rank as usize) < BOARD_SIZE, "Invalid rank: {rank}");
        Square::from_usize_unchecked(rank as usize * BOARD_SIZE + file as usize)
    }

    /// Zero-based file (0 = a-file).
    ///
    /// # Panics
    ///
    /// Panics when called on `Square::None`.
    #[inline]
    pub fn file(self) -> usize {
        assert!(self != Square::None, "Square::file called on Square::None");
        self.index() % BOARD_SIZE
    }

    /// Zero-based rank (0 = first rank).
    ///
    /// # Panics
    ///
    /// Panics when called on `Square::None`.
    #[inline]
    pub fn rank(self) -> usize {
        assert!(self != Square::None, "Square::rank called on Square::None");
        self.index() / BOARD_SIZE
    }

    /// Iterates over the 64 playable squares in index order.
    pub fn iter() -> impl Iterator<Item = Square> {
        (0..TOTAL_SQUARES).map(Square::from_usize_unchecked)
    }
}

/// Errors produced when parsing a square from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Input is not exactly two characters
    InvalidFormat,
    /// File character outside a-h
    InvalidFile(char),
    /// Rank character outside 1-8
    InvalidRank(char),
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidFormat => write!(
                f,
                "Invalid square format: must be 2 characters (e.g., 'e4')"
            ),
            SquareError::InvalidFile(c) => write!(f, "Invalid file '{c}': must be a-h or A-H"),
            SquareError::InvalidRank(c) => write!(f, "Invalid rank '{c}': must be 1-8"),
        }
    }
}

impl std::error::Error for SquareError {}

impl FromStr for Square {
    type Err = SquareError;

    /// Parses algebraic notation such as `e4`. Case-insensitive, surrounding
    /// whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(SquareError::InvalidFormat);
        };

        let file = file_char.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(SquareError::InvalidFile(file_char));
        }
        if !('1'..='8').contains(&rank_char) {
            return Err(SquareError::InvalidRank(rank_char));
        }

        Ok(Square::from_file_rank(
            file as u8 - b'a',
            rank_char as u8 - b'1',
        ))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Square::None {
            return write!(f, "None");
        }

        let file = self.file() as u8 + b'a';
        let rank = self.rank() as u8 + b'1';
        write!(f, "{}{}", file as char, rank as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout() {
        assert_eq!(Square::A1.index(), 0);
        assert_eq!(Square::H1.index(), 7);
        assert_eq!(Square::E2.index(), 12);
        assert_eq!(Square::H8.index(), 63);
        assert_eq!(Square::None.index(), 64);
    }

    #[test]
    fn test_file_and_rank() {
        assert_eq!(Square::E4.file(), 4);
        assert_eq!(Square::E4.rank(), 3);
        assert_eq!(Square::from_file_rank(6, 0), Square::G1);
        for sq in Square::iter() {
            assert_eq!(Square::from_file_rank(sq.file() as u8, sq.rank() as u8), sq);
        }
    }

    #[test]
    #[should_panic(expected = "Square::file called on Square::None")]
    fn test_file_panics_on_none() {
        let _ = Square::None.file();
    }

    #[test]
    fn test_from_usize() {
        assert_eq!(Square::from_usize(0), Some(Square::A1));
        assert_eq!(Square::from_usize(64), Some(Square::None));
        assert_eq!(Square::from_usize(65), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("e2".parse::<Square>(), Ok(Square::E2));
        assert_eq!(" H8 ".parse::<Square>(), Ok(Square::H8));
        assert_eq!("".parse::<Square>(), Err(SquareError::InvalidFormat));
        assert_eq!("e22".parse::<Square>(), Err(SquareError::InvalidFormat));
        assert_eq!("z1".parse::<Square>(), Err(SquareError::InvalidFile('z')));
        assert_eq!("a9".parse::<Square>(), Err(SquareError::InvalidRank('9')));
    }

    #[test]
    fn test_display() {
        assert_eq!(Square::A1.to_string(), "a1");
        assert_eq!(Square::E4.to_string(), "e4");
        assert_eq!(Square::None.to_string(), "None");
        for sq in Square::iter() {
            assert_eq!(sq.to_string().parse::<Square>(), Ok(sq));
        }
    }
}
