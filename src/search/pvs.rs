//! Principal-variation search.
//!
//! Identical contract to `negamax`, but after the first child every move
//! is probed with a null window around alpha and only re-searched with
//! the full window when the probe lands inside (alpha, beta).

use std::sync::atomic::{AtomicBool, Ordering};

use crate::board::{Board, Color, Move};

use super::negamax::maybe_stalemate;
use super::{EvalResult, SearchOptions, SearchStats};

/// Principal-variation search over `board` to `depth` plies.
///
/// See `negamax` for the shared contract (mate short-circuit, stalemate
/// disambiguation, mobility threading, halt polling).
#[allow(clippy::too_many_arguments)]
pub fn pvs(
    depth: u16,
    board: &Board,
    mut alpha: i32,
    beta: i32,
    side: Color,
    mut white_mc: i16,
    mut black_mc: i16,
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

    // The mover's threat count replaces its mobility slot for the
    // children below.
    if opts.pos_score {
        let threats = moves
            .iter()
            .filter(|m| opponent & (1u64 << m.to().index()) != 0)
            .count() as i16;
        if white {
            white_mc = threats;
        } else {
            black_mc = threats;
        }
    }

    for (i, &m) in moves.iter().enumerate() {
        let (child_board, taken) = board.apply(m);

        if taken.is_king() {
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

        let child = if i == 0 {
            pvs(
                depth - 1,
                &child_board,
                -beta,
                -alpha,
                side.opposite(),
                white_mc,
                black_mc,
                opts,
                stats,
                halt,
            )
        } else {
            // Null-window probe; full re-search only on a fail-high
            // inside the window.
            let probe = pvs(
                depth - 1,
                &child_board,
                -alpha - 1,
                -alpha,
                side.opposite(),
                white_mc,
                black_mc,
                opts,
                stats,
                halt,
            );
            let score = -probe.score;
            if alpha < score && score < beta {
                pvs(
                    depth - 1,
                    &child_board,
                    -beta,
                    -alpha,
                    side.opposite(),
                    white_mc,
                    black_mc,
                    opts,
                    stats,
                    halt,
                )
            } else {
                probe
            }
        };

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
