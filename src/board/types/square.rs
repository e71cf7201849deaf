//! Square type and utilities.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareParseError;

/// A square on the board, stored as a compact 0-63 index.
///
/// Index layout: rank * 8 + file, where a1=0, b1=1, ..., h8=63.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Create a square from rank and file (both 0-7). No bounds check.
    #[inline]
    #[must_use]
    pub const fn new(rank: u8, file: u8) -> Square {
        Square(rank * 8 + file)
    }

    /// Create a square from an index (0-63).
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Square {
        Square(index)
    }

    /// The square's index (a1=0, h8=63).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Rank 0-7, where 0 = rank 1.
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// File 0-7, where 0 = file a.
    #[inline]
    #[must_use]
    pub const fn file(self) -> u8 {
        self.0 & 0b111
    }

    /// The square `delta` ranks away (positive = towards rank 8).
    /// Caller guarantees the result stays on the board.
    #[inline]
    #[must_use]
    pub const fn shifted_ranks(self, delta: i8) -> Square {
        Square((self.0 as i8 + 8 * delta) as u8)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            (b'1' + self.rank()) as char
        )
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Square, SquareParseError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2
            || !(b'a'..=b'h').contains(&bytes[0])
            || !(b'1'..=b'8').contains(&bytes[1])
        {
            return Err(SquareParseError {
                notation: s.to_string(),
            });
        }
        Ok(Square::new(bytes[1] - b'1', bytes[0] - b'a'))
    }
}
