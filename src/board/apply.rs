//! Move application.

use super::state::EN_PASSANT_NONE;
use super::types::{
    Color, Move, Piece, BLACK_OO, BLACK_OOO, BLACK_OOO_ROOK, BLACK_OO_ROOK, WHITE_OO, WHITE_OOO,
    WHITE_OOO_ROOK, WHITE_OO_ROOK,
};
use super::Board;

impl Board {
    /// Apply `m`, returning the new board and the captured piece (`Empty`
    /// if none).
    ///
    /// The function is total: it never validates legality, including
    /// leaving one's own king in check. Promotion is implicit (pawn on the
    /// last rank becomes a queen), castling is recognized by the canonical
    /// king two-square moves and performs the rook hop itself, and an en
    /// passant capture removes the pawn behind the target square.
    #[must_use]
    pub fn apply(&self, m: Move) -> (Board, Piece) {
        self.apply_from_index(m, self.piece_index(m.from()))
    }

    /// `apply` with the mover's piece-list index already known.
    #[must_use]
    pub(crate) fn apply_from_index(&self, m: Move, pc_idx: u32) -> (Board, Piece) {
        let mut board = *self;
        board.en_passant = EN_PASSANT_NONE;

        let src = m.from();
        let dst = m.to();
        let mut pc = self.piece_at_index(pc_idx);
        board.remove_at(src, pc_idx);

        if pc == Piece::WhitePawn && dst.rank() == 7 {
            pc = Piece::WhiteQueen;
        }
        if pc == Piece::BlackPawn && dst.rank() == 0 {
            pc = Piece::BlackQueen;
        }
        if pc == Piece::WhitePawn && dst.rank() == src.rank() + 2 {
            board.en_passant = dst.index() - 8;
        }
        if pc == Piece::BlackPawn && src.rank() == dst.rank() + 2 {
            board.en_passant = dst.index() + 8;
        }

        if pc == Piece::WhiteKing {
            if m == *WHITE_OO {
                board = board.apply(*WHITE_OO_ROOK).0;
            } else if m == *WHITE_OOO {
                board = board.apply(*WHITE_OOO_ROOK).0;
            }
            board.flags.clear_side(Color::White);
        }
        if pc == Piece::BlackKing {
            if m == *BLACK_OO {
                board = board.apply(*BLACK_OO_ROOK).0;
            } else if m == *BLACK_OOO {
                board = board.apply(*BLACK_OOO_ROOK).0;
            }
            board.flags.clear_side(Color::Black);
        }

        // A rook leaving its corner forfeits that side's right.
        if !board.flags.is_empty() {
            if pc == Piece::WhiteRook {
                if src.index() == 0 {
                    board.flags.clear(Color::White, false);
                }
                if src.index() == 7 {
                    board.flags.clear(Color::White, true);
                }
            }
            if pc == Piece::BlackRook {
                if src.index() == 56 {
                    board.flags.clear(Color::Black, false);
                }
                if src.index() == 63 {
                    board.flags.clear(Color::Black, true);
                }
            }
        }

        let mut taken = board.insert(pc, dst);

        // En passant: the captured pawn is behind the target square.
        if self.en_passant == dst.index() {
            if pc == Piece::WhitePawn {
                board.remove(dst.shifted_ranks(-1));
                taken = Piece::BlackPawn;
            } else if pc == Piece::BlackPawn {
                board.remove(dst.shifted_ranks(1));
                taken = Piece::WhitePawn;
            }
        }

        (board, taken)
    }
}
