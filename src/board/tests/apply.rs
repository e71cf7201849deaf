//! Move application tests.

use crate::board::{Board, Color, Move, Piece, Square};

use super::board;

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

#[test]
fn quiet_move_keeps_occupancy() {
    let b = Board::startpos();
    let (after, taken) = b.apply(mv("e2e4"));
    assert_eq!(taken, Piece::Empty);
    assert_eq!(after.piece_count(), b.piece_count());
    assert_eq!(after.get_piece(sq("e2")), Piece::Empty);
    assert_eq!(after.get_piece(sq("e4")), Piece::WhitePawn);
}

#[test]
fn capture_reduces_occupancy_by_one() {
    let b = board("k7/8/8/3p4/4P3/8/8/K7 w - - 0 1");
    let (after, taken) = b.apply(mv("e4d5"));
    assert_eq!(taken, Piece::BlackPawn);
    assert_eq!(after.piece_count(), b.piece_count() - 1);
    assert_eq!(after.get_piece(sq("d5")), Piece::WhitePawn);
}

#[test]
fn white_pawn_promotes_to_queen() {
    let b = board("k7/4P3/8/8/8/8/8/K7 w - - 0 1");
    let (after, taken) = b.apply(mv("e7e8"));
    assert_eq!(taken, Piece::Empty);
    assert_eq!(after.get_piece(sq("e8")), Piece::WhiteQueen);
}

#[test]
fn black_pawn_promotes_to_queen() {
    let b = board("k7/8/8/8/8/8/4p3/K7 b - - 0 1");
    let (after, _) = b.apply(mv("e2e1"));
    assert_eq!(after.get_piece(sq("e1")), Piece::BlackQueen);
}

#[test]
fn double_step_sets_en_passant_for_one_ply() {
    let b = Board::startpos();
    let (after, _) = b.apply(mv("e2e4"));
    assert_eq!(after.en_passant_square(), Some(sq("e3")));
    // Any following move clears it.
    let (next, _) = after.apply(mv("g8f6"));
    assert_eq!(next.en_passant_square(), None);
}

#[test]
fn en_passant_capture_removes_the_passed_pawn() {
    let b = board("k7/8/8/3pP3/8/8/8/K7 w - d6 0 1");
    let (after, taken) = b.apply(mv("e5d6"));
    assert_eq!(taken, Piece::BlackPawn);
    assert_eq!(after.get_piece(sq("d6")), Piece::WhitePawn);
    assert_eq!(after.get_piece(sq("d5")), Piece::Empty);
    assert_eq!(after.piece_count(), b.piece_count() - 1);
}

#[test]
fn kingside_castle_hops_the_rook() {
    let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let (after, taken) = b.apply(mv("e1g1"));
    assert_eq!(taken, Piece::Empty);
    assert_eq!(after.get_piece(sq("g1")), Piece::WhiteKing);
    assert_eq!(after.get_piece(sq("f1")), Piece::WhiteRook);
    assert_eq!(after.get_piece(sq("h1")), Piece::Empty);
    assert!(!after.castling_rights().has(Color::White, true));
    assert!(!after.castling_rights().has(Color::White, false));
    // Black's rights are untouched.
    assert!(after.castling_rights().has(Color::Black, true));
}

#[test]
fn queenside_castle_hops_the_rook() {
    let b = board("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
    let (after, _) = b.apply(mv("e8c8"));
    assert_eq!(after.get_piece(sq("c8")), Piece::BlackKing);
    assert_eq!(after.get_piece(sq("d8")), Piece::BlackRook);
    assert_eq!(after.get_piece(sq("a8")), Piece::Empty);
    assert!(!after.castling_rights().has(Color::Black, true));
    assert!(!after.castling_rights().has(Color::Black, false));
}

#[test]
fn plain_king_move_clears_both_rights() {
    let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let (after, _) = b.apply(mv("e1e2"));
    assert!(!after.castling_rights().has(Color::White, true));
    assert!(!after.castling_rights().has(Color::White, false));
    assert!(after.castling_rights().has(Color::Black, true));
}

#[test]
fn rook_leaving_its_corner_clears_one_right() {
    let b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let (after, _) = b.apply(mv("h1h4"));
    assert!(!after.castling_rights().has(Color::White, true));
    assert!(after.castling_rights().has(Color::White, false));

    let (after, _) = b.apply(mv("a1a4"));
    assert!(after.castling_rights().has(Color::White, true));
    assert!(!after.castling_rights().has(Color::White, false));
}

#[test]
fn apply_does_not_validate_legality() {
    // Walking the king into a rook's line is accepted; legality is the
    // caller's concern.
    let b = board("4r2k/8/8/8/8/8/8/4K3 w - - 0 1");
    let (after, taken) = b.apply(mv("e1e2"));
    assert_eq!(taken, Piece::Empty);
    assert_eq!(after.get_piece(sq("e2")), Piece::WhiteKing);
}
