//! FEN parsing and emission tests.

use crate::board::{Board, Color, FenError, Piece};

use super::board_side;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[test]
fn startpos_round_trips() {
    let (board, side) = board_side(START_FEN);
    assert_eq!(side, Color::White);
    assert_eq!(board.to_fen(side), START_FEN);
}

#[test]
fn complex_position_round_trips() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let (board, side) = board_side(fen);
    assert_eq!(board.to_fen(side), fen);
}

#[test]
fn en_passant_field_round_trips() {
    let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
    let (board, side) = board_side(fen);
    assert_eq!(side, Color::Black);
    assert_eq!(board.en_passant_square().unwrap().to_string(), "e3");
    assert_eq!(board.to_fen(side), fen);
}

#[test]
fn partial_castling_rights_round_trip() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1";
    let (board, side) = board_side(fen);
    assert!(board.castling_rights().has(Color::White, true));
    assert!(!board.castling_rights().has(Color::White, false));
    assert!(!board.castling_rights().has(Color::Black, true));
    assert!(board.castling_rights().has(Color::Black, false));
    assert_eq!(board.to_fen(side), fen);
}

#[test]
fn move_clocks_are_parsed_but_unused() {
    let with_clocks = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - - 57 93").unwrap().0;
    let without = Board::from_fen("8/8/8/8/8/8/8/K1k5 w - -").unwrap().0;
    assert_eq!(with_clocks, without);
    assert_eq!(with_clocks.to_fen(Color::White), "8/8/8/8/8/8/8/K1k5 w - - 0 1");
}

#[test]
fn pieces_land_on_the_right_squares() {
    let (board, _) = board_side(START_FEN);
    assert_eq!(board.get_piece("a1".parse().unwrap()), Piece::WhiteRook);
    assert_eq!(board.get_piece("e1".parse().unwrap()), Piece::WhiteKing);
    assert_eq!(board.get_piece("d8".parse().unwrap()), Piece::BlackQueen);
    assert_eq!(board.get_piece("h8".parse().unwrap()), Piece::BlackRook);
    assert_eq!(board.get_piece("e4".parse().unwrap()), Piece::Empty);
    assert_eq!(board.piece_count(), 32);
}

#[test]
fn rejects_malformed_fens() {
    assert!(matches!(
        Board::from_fen("8/8/8"),
        Err(FenError::TooFewFields { found: 3 })
    ));
    assert!(matches!(
        Board::from_fen("8/8/8/8/8/8/8/X7 w - - 0 1"),
        Err(FenError::InvalidPiece { ch: 'X' })
    ));
    assert!(matches!(
        Board::from_fen("8/8/8/8/8/8/8/K1k5 x - - 0 1"),
        Err(FenError::InvalidSideToMove { .. })
    ));
    assert!(matches!(
        Board::from_fen("8/8/8/8/8/8/8/K1k5 w Z - 0 1"),
        Err(FenError::InvalidCastling { ch: 'Z' })
    ));
    assert!(matches!(
        Board::from_fen("8/8/8/8/8/8/8/K1k5 w - e9 0 1"),
        Err(FenError::InvalidEnPassant { .. })
    ));
}

#[test]
fn apply_then_fen_equals_fen_of_applied() {
    let (board, side) = board_side(START_FEN);
    let (after, _) = board.apply("e2e4".parse().unwrap());
    let fen = after.to_fen(side.opposite());
    let (reloaded, _) = board_side(&fen);
    assert_eq!(after, reloaded);
    assert_eq!(
        reloaded.en_passant_square(),
        after.en_passant_square(),
        "en passant survives the round trip"
    );
}
