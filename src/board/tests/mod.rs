//! Board unit tests.

mod apply;
mod fen;
mod proptest;

use super::{Board, Color};

/// Parse a FEN, panicking on failure. Test positions are literals.
pub(crate) fn board(fen: &str) -> Board {
    Board::from_fen(fen).expect("test FEN").0
}

/// Parse a FEN keeping the side to move.
pub(crate) fn board_side(fen: &str) -> (Board, Color) {
    Board::from_fen(fen).expect("test FEN")
}
