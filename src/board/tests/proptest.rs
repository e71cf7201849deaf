//! Property-based board tests: random legal walks from the starting
//! position must preserve the packing invariants.

use proptest::prelude::*;

use crate::board::{Board, Piece, Square};
use crate::game::Game;

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=30usize
}

fn assert_packed(b: &Board) {
    let count = b.piece_count();
    assert!(count <= 32);
    let mut idx = 0;
    for s in 0..64u8 {
        let square = Square::from_index(s);
        if b.occupied(square) {
            let pc = b.piece_at_index(idx);
            assert_ne!(pc, Piece::Empty);
            assert_eq!(pc, b.get_piece(square));
            idx += 1;
        }
    }
    assert_eq!(idx, count);
    if count < 32 {
        assert_eq!(b.pieces >> (4 * count), 0);
    }
}

proptest! {
    /// The piece list stays in lockstep with the occupancy bitmap over
    /// arbitrary legal games.
    #[test]
    fn prop_piece_list_matches_occupancy(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let mut game = Game::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = game.valid_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            game.exec_move(mv);
            assert_packed(&game.current);
        }
    }

    /// Applying a move drops occupancy by exactly one on capture and by
    /// nothing otherwise.
    #[test]
    fn prop_apply_popcount_law(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let mut game = Game::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = game.valid_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            let before = game.current.piece_count();
            let (after, taken) = game.current.apply(mv);
            if taken == Piece::Empty {
                prop_assert_eq!(after.piece_count(), before);
            } else {
                prop_assert_eq!(after.piece_count(), before - 1);
            }
            game.exec_move(mv);
        }
    }

    /// Castling rights never come back.
    #[test]
    fn prop_castling_rights_monotonic(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let mut game = Game::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut previous = game.current.castling_rights().as_u8();

        for _ in 0..num_moves {
            let moves = game.valid_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            game.exec_move(mv);
            let now = game.current.castling_rights().as_u8();
            prop_assert_eq!(now & !previous, 0, "a castling right reappeared");
            previous = now;
        }
    }

    /// FEN round-trips from any reachable position.
    #[test]
    fn prop_fen_round_trip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        use rand::prelude::*;

        let mut game = Game::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 0..num_moves {
            let moves = game.valid_moves();
            if moves.is_empty() {
                break;
            }
            game.exec_move(moves[rng.gen_range(0..moves.len())]);
        }

        let fen = game.current.to_fen(game.side_to_move);
        let (reloaded, side) = Board::from_fen(&fen).expect("emitted FEN parses");
        prop_assert_eq!(reloaded, game.current);
        prop_assert_eq!(side, game.side_to_move);
        prop_assert_eq!(reloaded.castling_rights(), game.current.castling_rights());
        prop_assert_eq!(reloaded.en_passant_square(), game.current.en_passant_square());
    }
}
