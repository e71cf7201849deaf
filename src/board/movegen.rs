//! Pseudo-legal move generation, move ordering, and legality filtering.
//!
//! Generation walks the occupancy bitmap once to build the opponent
//! bitmap, then again emitting moves piece by piece. Legality (own king
//! left in check) is not enforced here; the search finds king captures
//! one ply later, and `remove_invalid` filters explicitly where full
//! legality is needed.

use super::types::{
    Color, Move, MoveList, Piece, Square, BLACK_OOO_MASK, BLACK_OOO_OK, BLACK_OO_MASK, BLACK_OO_OK,
    WHITE_OOO_MASK, WHITE_OOO_OK, WHITE_OO_MASK, WHITE_OO_OK,
};
use super::Board;

impl Board {
    /// Pseudo-legal moves for `side`, ordered captures-first.
    #[must_use]
    pub fn moves(&self, side: Color) -> MoveList {
        self.moves_with_opponent(side).0
    }

    /// Pseudo-legal moves plus the opponent-occupancy bitmap (the search
    /// kernels reuse it for mobility counting).
    #[must_use]
    pub fn moves_with_opponent(&self, side: Color) -> (MoveList, u64) {
        let white = side.is_white();
        let mut list = MoveList::new();
        let mut opponent: u64 = 0;
        let mut opponent_king: u32 = 0;
        let enpassant: u64 = if self.en_passant > 63 {
            0
        } else {
            1u64 << self.en_passant
        };

        // First pass: opponent bitmap and king square.
        let mut bits = self.position;
        let mut pc_idx = 0u32;
        while bits != 0 {
            let sq = bits.trailing_zeros();
            let pc = self.piece_at_index(pc_idx);
            pc_idx += 1;
            bits &= bits - 1;
            if pc == Piece::king_of(side.opposite()) {
                opponent_king = sq;
            }
            if pc.belongs_to(side.opposite()) {
                opponent |= 1u64 << sq;
            }
        }

        // Second pass: emit moves for our pieces.
        let mut bits = self.position;
        let mut pc_idx = 0u32;
        while bits != 0 {
            let sq = bits.trailing_zeros();
            let pc = self.piece_at_index(pc_idx);
            pc_idx += 1;
            bits &= bits - 1;
            if !pc.belongs_to(side) {
                continue;
            }

            let from = Square::from_index(sq as u8);
            let row = from.rank() as i32;
            let col = from.file() as i32;

            match pc {
                Piece::WhitePawn => {
                    if row < 7 && self.position & (1u64 << (sq + 8)) == 0 {
                        self.push_target(&mut list, opponent, from, row + 1, col);
                        if row == 1 && self.position & (1u64 << (sq + 16)) == 0 {
                            self.push_target(&mut list, opponent, from, row + 2, col);
                        }
                    }
                    let strikeable = opponent | enpassant;
                    if col > 0 && row < 7 && strikeable & (1u64 << (sq + 7)) != 0 {
                        self.push_target(&mut list, opponent, from, row + 1, col - 1);
                    }
                    if col < 7 && row < 7 && strikeable & (1u64 << (sq + 9)) != 0 {
                        self.push_target(&mut list, opponent, from, row + 1, col + 1);
                    }
                }
                Piece::BlackPawn => {
                    if row > 0 && self.position & (1u64 << (sq - 8)) == 0 {
                        self.push_target(&mut list, opponent, from, row - 1, col);
                        if row == 6 && self.position & (1u64 << (sq - 16)) == 0 {
                            self.push_target(&mut list, opponent, from, row - 2, col);
                        }
                    }
                    let strikeable = opponent | enpassant;
                    if col > 0 && row > 0 && strikeable & (1u64 << (sq - 9)) != 0 {
                        self.push_target(&mut list, opponent, from, row - 1, col - 1);
                    }
                    if col < 7 && row > 0 && strikeable & (1u64 << (sq - 7)) != 0 {
                        self.push_target(&mut list, opponent, from, row - 1, col + 1);
                    }
                }
                Piece::WhiteKnight | Piece::BlackKnight => {
                    for (dr, dc) in [
                        (-2, -1),
                        (-2, 1),
                        (2, -1),
                        (2, 1),
                        (-1, -2),
                        (1, -2),
                        (-1, 2),
                        (1, 2),
                    ] {
                        self.push_target(&mut list, opponent, from, row + dr, col + dc);
                    }
                }
                Piece::WhiteKing | Piece::BlackKing => {
                    for (dr, dc) in [
                        (0, 1),
                        (0, -1),
                        (-1, 0),
                        (1, 0),
                        (-1, 1),
                        (1, 1),
                        (-1, -1),
                        (1, -1),
                    ] {
                        self.push_target(&mut list, opponent, from, row + dr, col + dc);
                    }
                    // Castling: pattern of king and rook intact on the back
                    // rank and the right still held. Transit-square attacks
                    // are not checked here; the selection stage penalizes
                    // castling into or through check.
                    if pc == Piece::WhiteKing {
                        if self.position & WHITE_OO_MASK == WHITE_OO_OK
                            && self.flags.has(Color::White, true)
                        {
                            self.push_target(&mut list, opponent, from, row, col + 2);
                        }
                        if self.position & WHITE_OOO_MASK == WHITE_OOO_OK
                            && self.flags.has(Color::White, false)
                        {
                            self.push_target(&mut list, opponent, from, row, col - 2);
                        }
                    } else {
                        if self.position & BLACK_OO_MASK == BLACK_OO_OK
                            && self.flags.has(Color::Black, true)
                        {
                            self.push_target(&mut list, opponent, from, row, col + 2);
                        }
                        if self.position & BLACK_OOO_MASK == BLACK_OOO_OK
                            && self.flags.has(Color::Black, false)
                        {
                            self.push_target(&mut list, opponent, from, row, col - 2);
                        }
                    }
                }
                _ => {
                    // Sliders: bishops, rooks, queens.
                    if matches!(
                        pc,
                        Piece::WhiteBishop | Piece::BlackBishop | Piece::WhiteQueen | Piece::BlackQueen
                    ) {
                        for (dr, dc) in [(1, 1), (1, -1), (-1, -1), (-1, 1)] {
                            self.slide(&mut list, opponent, from, row, col, dr, dc);
                        }
                    }
                    if matches!(
                        pc,
                        Piece::WhiteRook | Piece::BlackRook | Piece::WhiteQueen | Piece::BlackQueen
                    ) {
                        for (dr, dc) in [(0, 1), (0, -1), (1, 0), (-1, 0)] {
                            self.slide(&mut list, opponent, from, row, col, dr, dc);
                        }
                    }
                }
            }
        }

        order_moves(&mut list, opponent, opponent_king);
        (list, opponent)
    }

    /// Push `from -> (rank, file)` if the target is on the board and not
    /// blocked by an own piece. Reports (occupied, opponent-occupied) so
    /// slider rays know when to stop.
    fn push_target(
        &self,
        list: &mut MoveList,
        opponent: u64,
        from: Square,
        rank: i32,
        file: i32,
    ) -> (bool, bool) {
        if !(0..8).contains(&rank) || !(0..8).contains(&file) {
            return (false, false);
        }
        let sq = (rank * 8 + file) as u8;
        let occupied = self.position & (1u64 << sq) != 0;
        let hits_opponent = opponent & (1u64 << sq) != 0;
        if !occupied || hits_opponent {
            list.push(Move::new(from, Square::from_index(sq)));
        }
        (occupied, hits_opponent)
    }

    /// Walk one ray until the board edge or the first blocker; a blocker
    /// holding an opponent is included as a capture.
    fn slide(
        &self,
        list: &mut MoveList,
        opponent: u64,
        from: Square,
        row: i32,
        col: i32,
        dr: i32,
        dc: i32,
    ) {
        for l in 1..8 {
            let r = row + l * dr;
            let c = col + l * dc;
            if !(0..8).contains(&r) || !(0..8).contains(&c) {
                break;
            }
            let (occupied, hits_opponent) = self.push_target(list, opponent, from, r, c);
            if occupied || hits_opponent {
                break;
            }
        }
    }

    /// True if `color`'s king can be captured by an opponent pseudo-legal
    /// move right now.
    #[must_use]
    pub fn is_check(&self, color: Color) -> bool {
        let own_king = Piece::king_of(color);
        let replies = self.moves(color.opposite());
        for &m in replies.iter() {
            let (_, taken) = self.apply(m);
            if taken == own_king {
                return true;
            }
        }
        false
    }

    /// Drop every candidate that leaves our king capturable one ply later.
    ///
    /// With `depth > 0` opponent replies are themselves filtered first,
    /// verifying multi-ply king safety. Expensive; used by the game layer
    /// and display paths, never inside the search.
    pub fn remove_invalid(&self, side: Color, moves: &mut MoveList, depth: u32) {
        let own_king = Piece::king_of(side);
        moves.retain(|m| {
            let (child, _) = self.apply(m);
            let mut replies = child.moves(side.opposite());
            if depth > 0 {
                child.remove_invalid(side.opposite(), &mut replies, depth - 1);
            }
            for &reply in replies.iter() {
                let (_, taken) = child.apply(reply);
                if taken == own_king {
                    return false;
                }
            }
            true
        });
    }

    /// Node count of the legal-move tree to `depth`. Reflects this
    /// engine's move rules (implicit queen promotion, pattern-gated
    /// castling), so counts match standard perft only where those rules
    /// cannot differ.
    #[must_use]
    pub fn perft(&self, side: Color, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut moves = self.moves(side);
        self.remove_invalid(side, &mut moves, 0);
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for &m in moves.iter() {
            let (child, _) = self.apply(m);
            nodes += child.perft(side.opposite(), depth - 1);
        }
        nodes
    }
}

/// Partition captures to the front (cutoff density), then move any
/// opponent-king capture to slot 0 so mate lines terminate immediately.
fn order_moves(list: &mut MoveList, opponent: u64, opponent_king: u32) {
    let m = list.len();
    if m <= 2 {
        return;
    }
    let is_capture = |mv: Move| opponent & (1u64 << mv.to().index()) != 0;

    let mut front = 0;
    let mut back = m - 1;
    while front < back {
        while is_capture(list[front]) && front < back {
            front += 1;
        }
        while !is_capture(list[back]) && front < back {
            back -= 1;
        }
        if front < back {
            list.swap(front, back);
            front += 1;
            back -= 1;
        }
    }

    for i in 1..front {
        if list[i].to().index() as u32 == opponent_king {
            list.swap(0, i);
            break;
        }
    }
}
