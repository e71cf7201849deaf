//! Plain negamax with alpha-beta pruning.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::board::{Board, Color, Move, Piece, KING_VALUE};

use super::{EvalResult, SearchOptions, SearchStats};

/// Search `board` to `depth` plies with the window `(alpha, beta)` from
/// `side`'s point of view.
///
/// `white_mc` and `black_mc` are the mobility counts carried forward from
/// the parent ply; when mobility scoring is enabled their difference
/// perturbs leaf evaluations. Checkmate shows up as a king capture one
/// ply later and short-circuits with a mate score signed by the
/// remaining depth, so faster mates outrank slower ones. When every move
/// loses the king, a depth-1 null-move probe with the opponent to move
/// distinguishes stalemate (score 0) from mate.
///
/// The halt flag is polled after every child; once raised, the best
/// result so far (possibly the sentinel) is returned immediately.
#[allow(clippy::too_many_arguments)]
pub fn negamax(
    depth: u16,
    board: &Board,
    mut alpha: i32,
    beta: i32,
    side: Color,
    white_mc: i16,
    black_mc: i16,
    opts: &SearchOptions,
    stats: &mut SearchStats,
    halt: &AtomicBool,
) -> EvalResult {
    let white = side.is_white();
    if depth == 0 {
        stats.evals += 1;
        let mut result = EvalResult::sentinel();
        result.score = if opts.mate_search {
            0
        } else {
            board.material_eval()
        };
        if opts.pos_score {
            result.score += i32::from(white_mc) - i32::from(black_mc);
        }
        if !white {
            result.score = -result.score;
        }
        result.depth = 0;
        return result;
    }

    let (moves, opponent) = board.moves_with_opponent(side);
    let mut result = EvalResult::sentinel();

    // Moves landing on an opponent piece; becomes the mover's mobility
    // count for the child plies.
    let mut threats: i16 = 0;
    if opts.pos_score {
        for &m in moves.iter() {
            if opponent & (1u64 << m.to().index()) != 0 {
                threats += 1;
            }
        }
    }

    for &m in moves.iter() {
        let (child_board, taken) = board.apply(m);

        if taken.is_king() {
            // Sign the score by remaining depth so nearer mates win.
            let mut score = -taken.value() - if white { -i32::from(depth) } else { i32::from(depth) };
            if !white {
                score = -score;
            }
            result.score = score;
            result.mv = m;
            result.lot[depth as usize] = m;
            result.depth = depth;
            for slot in &mut result.lot[..depth as usize] {
                *slot = Move::NULL;
            }
            stats.checks += 1;
            stats.evals += 1;
            return result;
        }

        let child = negamax(
            depth - 1,
            &child_board,
            -beta,
            -alpha,
            side.opposite(),
            if white { threats } else { white_mc },
            if white { black_mc } else { threats },
            opts,
            stats,
            halt,
        );
        if -child.score > result.score {
            result.score = -child.score;
            result.depth = child.depth;
            result.mv = m;
            result.lot[depth as usize] = m;
            result.lot[..depth as usize].copy_from_slice(&child.lot[..depth as usize]);
            alpha = alpha.max(result.score);
            if alpha >= beta - opts.cut_slack {
                stats.cuts += 1;
                return result;
            }
        }
        if halt.load(Ordering::Relaxed) {
            return result;
        }
    }

    maybe_stalemate(depth, board, side, &mut result, opts, stats, halt);
    result
}

/// If every move loses the king on the very next ply, probe the position
/// with the opponent to move: when their best reply does not capture our
/// king, no move of ours is actually forced into capture range -- the
/// position is stalemate, not mate.
pub(crate) fn maybe_stalemate(
    depth: u16,
    board: &Board,
    side: Color,
    result: &mut EvalResult,
    opts: &SearchOptions,
    stats: &mut SearchStats,
    halt: &AtomicBool,
) {
    if result.score <= -KING_VALUE && depth - result.depth == 1 {
        let probe = negamax(
            1,
            board,
            i32::MIN + 1,
            i32::MAX,
            side.opposite(),
            0,
            0,
            opts,
            stats,
            halt,
        );
        let (_, taken) = board.apply(probe.mv);
        if taken != Piece::king_of(side) {
            stats.stales += 1;
            result.score = 0;
            result.mv = Move::NULL;
            result.depth = depth;
            for slot in &mut result.lot[..depth as usize] {
                *slot = Move::NULL;
            }
        }
    }
}
