//! Piece and color types.
//!
//! Pieces carry their 4-bit packed-list code directly in the enum
//! discriminant, so converting between a list nibble and a `Piece` is a
//! cast plus a table lookup. White codes are 1..=6, black codes 8..=13.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// King material value, half of `i32::MAX` so that mate scores dominate
/// every material imbalance without overflowing on negation.
pub const KING_VALUE: i32 = i32::MAX / 2;

/// Side to move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_white(self) -> bool {
        matches!(self, Color::White)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// A piece as stored in the packed piece list.
///
/// The discriminant is the nibble written into the list. Code 7 and codes
/// 14-15 are unused gaps; `from_code` maps them (and 0) to `Empty`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Piece {
    Empty = 0,
    WhitePawn = 1,
    WhiteKing = 2,
    WhiteQueen = 3,
    WhiteRook = 4,
    WhiteBishop = 5,
    WhiteKnight = 6,
    BlackRook = 8,
    BlackBishop = 9,
    BlackKnight = 10,
    BlackKing = 11,
    BlackQueen = 12,
    BlackPawn = 13,
}

/// Signed material value per 4-bit code, from White's point of view.
const VALUE: [i32; 16] = [
    0,
    100,
    KING_VALUE,
    900,
    500,
    300,
    300,
    0,
    -500,
    -300,
    -300,
    -KING_VALUE,
    -900,
    -100,
    0,
    0,
];

impl Piece {
    /// The 4-bit code stored in the piece list.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decode a piece-list nibble. Unused codes decode to `Empty`.
    #[inline]
    #[must_use]
    pub const fn from_code(code: u8) -> Piece {
        match code & 0xF {
            1 => Piece::WhitePawn,
            2 => Piece::WhiteKing,
            3 => Piece::WhiteQueen,
            4 => Piece::WhiteRook,
            5 => Piece::WhiteBishop,
            6 => Piece::WhiteKnight,
            8 => Piece::BlackRook,
            9 => Piece::BlackBishop,
            10 => Piece::BlackKnight,
            11 => Piece::BlackKing,
            12 => Piece::BlackQueen,
            13 => Piece::BlackPawn,
            _ => Piece::Empty,
        }
    }

    /// Signed material value (black pieces negative, kings `±KING_VALUE`).
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        VALUE[self as usize]
    }

    /// Material value of a raw list nibble, avoiding the enum round-trip
    /// on the evaluation hot path.
    #[inline]
    #[must_use]
    pub(crate) const fn value_of_code(code: u8) -> i32 {
        VALUE[(code & 0xF) as usize]
    }

    #[inline]
    #[must_use]
    pub const fn is_white(self) -> bool {
        let c = self as u8;
        c >= 1 && c <= 6
    }

    #[inline]
    #[must_use]
    pub const fn is_black(self) -> bool {
        self as u8 >= 8
    }

    /// The color of the piece, or `None` for `Empty`.
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        if self.is_white() {
            Some(Color::White)
        } else if self.is_black() {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// True if the piece belongs to `side`.
    #[inline]
    #[must_use]
    pub const fn belongs_to(self, side: Color) -> bool {
        match side {
            Color::White => self.is_white(),
            Color::Black => self.is_black(),
        }
    }

    /// The king of the given side.
    #[inline]
    #[must_use]
    pub const fn king_of(side: Color) -> Piece {
        match side {
            Color::White => Piece::WhiteKing,
            Color::Black => Piece::BlackKing,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_king(self) -> bool {
        matches!(self, Piece::WhiteKing | Piece::BlackKing)
    }

    #[inline]
    #[must_use]
    pub const fn is_pawn(self) -> bool {
        matches!(self, Piece::WhitePawn | Piece::BlackPawn)
    }

    /// Parse a FEN piece letter (case encodes the color).
    #[must_use]
    pub fn from_fen_char(c: char) -> Option<Piece> {
        match c {
            'P' => Some(Piece::WhitePawn),
            'N' => Some(Piece::WhiteKnight),
            'B' => Some(Piece::WhiteBishop),
            'R' => Some(Piece::WhiteRook),
            'Q' => Some(Piece::WhiteQueen),
            'K' => Some(Piece::WhiteKing),
            'p' => Some(Piece::BlackPawn),
            'n' => Some(Piece::BlackKnight),
            'b' => Some(Piece::BlackBishop),
            'r' => Some(Piece::BlackRook),
            'q' => Some(Piece::BlackQueen),
            'k' => Some(Piece::BlackKing),
            _ => None,
        }
    }

    /// FEN letter for the piece (uppercase for White).
    #[must_use]
    pub const fn to_fen_char(self) -> char {
        match self {
            Piece::Empty => ' ',
            Piece::WhitePawn => 'P',
            Piece::WhiteKnight => 'N',
            Piece::WhiteBishop => 'B',
            Piece::WhiteRook => 'R',
            Piece::WhiteQueen => 'Q',
            Piece::WhiteKing => 'K',
            Piece::BlackPawn => 'p',
            Piece::BlackKnight => 'n',
            Piece::BlackBishop => 'b',
            Piece::BlackRook => 'r',
            Piece::BlackQueen => 'q',
            Piece::BlackKing => 'k',
        }
    }

    /// Unicode figurine for board dumps.
    #[must_use]
    pub const fn to_unicode(self) -> char {
        match self {
            Piece::Empty => '.',
            Piece::WhitePawn => '♙',
            Piece::WhiteKnight => '♘',
            Piece::WhiteBishop => '♗',
            Piece::WhiteRook => '♖',
            Piece::WhiteQueen => '♕',
            Piece::WhiteKing => '♔',
            Piece::BlackPawn => '♟',
            Piece::BlackKnight => '♞',
            Piece::BlackBishop => '♝',
            Piece::BlackRook => '♜',
            Piece::BlackQueen => '♛',
            Piece::BlackKing => '♚',
        }
    }
}
