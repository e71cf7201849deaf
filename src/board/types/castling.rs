//! Castling rights and the canonical castling move patterns.

use once_cell::sync::Lazy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::moves::Move;
use super::piece::Color;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

/// Castling rights as a 4-bit mask. Rights only ever get cleared once a
/// king or rook leaves its starting square.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    #[must_use]
    pub const fn none() -> CastlingRights {
        CastlingRights(0)
    }

    #[must_use]
    pub const fn all() -> CastlingRights {
        CastlingRights(CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q)
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    #[inline]
    pub fn clear(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::bit_for(color, kingside);
    }

    /// Drop both rights of one side (its king moved).
    #[inline]
    pub fn clear_side(&mut self, color: Color) {
        match color {
            Color::White => self.0 &= !(CASTLE_WHITE_K | CASTLE_WHITE_Q),
            Color::Black => self.0 &= !(CASTLE_BLACK_K | CASTLE_BLACK_Q),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

fn coord(s: &str) -> Move {
    s.parse().expect("canonical castling coordinate")
}

/// King two-square moves and the matching rook hops, one pair per right.
pub(crate) static WHITE_OO: Lazy<Move> = Lazy::new(|| coord("e1g1"));
pub(crate) static WHITE_OO_ROOK: Lazy<Move> = Lazy::new(|| coord("h1f1"));
pub(crate) static WHITE_OOO: Lazy<Move> = Lazy::new(|| coord("e1c1"));
pub(crate) static WHITE_OOO_ROOK: Lazy<Move> = Lazy::new(|| coord("a1d1"));
pub(crate) static BLACK_OO: Lazy<Move> = Lazy::new(|| coord("e8g8"));
pub(crate) static BLACK_OO_ROOK: Lazy<Move> = Lazy::new(|| coord("h8f8"));
pub(crate) static BLACK_OOO: Lazy<Move> = Lazy::new(|| coord("e8c8"));
pub(crate) static BLACK_OOO_ROOK: Lazy<Move> = Lazy::new(|| coord("a8d8"));

// Occupancy patterns gating castling generation. The mask selects the
// squares from the king's file to the rook's corner; the pattern requires
// exactly king and rook present there.
pub(crate) const WHITE_OO_MASK: u64 = 0b1111_0000;
pub(crate) const WHITE_OO_OK: u64 = 0b1001_0000;
pub(crate) const WHITE_OOO_MASK: u64 = 0b0001_1111;
pub(crate) const WHITE_OOO_OK: u64 = 0b0001_0001;
pub(crate) const BLACK_OO_MASK: u64 = WHITE_OO_MASK << 56;
pub(crate) const BLACK_OO_OK: u64 = WHITE_OO_OK << 56;
pub(crate) const BLACK_OOO_MASK: u64 = WHITE_OOO_MASK << 56;
pub(crate) const BLACK_OOO_OK: u64 = WHITE_OOO_OK << 56;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rights_clear_is_monotonic() {
        let mut rights = CastlingRights::all();
        assert!(rights.has(Color::White, true));
        rights.clear(Color::White, true);
        assert!(!rights.has(Color::White, true));
        assert!(rights.has(Color::White, false));
        rights.clear_side(Color::Black);
        assert!(!rights.has(Color::Black, true));
        assert!(!rights.has(Color::Black, false));
        assert!(!rights.is_empty());
    }

    #[test]
    fn canonical_moves_parse() {
        assert_eq!(WHITE_OO.to_string(), "e1g1");
        assert_eq!(WHITE_OOO_ROOK.to_string(), "a1d1");
        assert_eq!(BLACK_OO.to_string(), "e8g8");
        assert_eq!(BLACK_OOO.to_string(), "e8c8");
    }

    #[test]
    fn masks_cover_back_rank_squares() {
        // e1..h1 and a1..e1 respectively
        assert_eq!(WHITE_OO_MASK.count_ones(), 4);
        assert_eq!(WHITE_OOO_MASK.count_ones(), 5);
        assert_eq!(BLACK_OO_OK, WHITE_OO_OK << 56);
    }
}
