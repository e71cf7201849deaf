//! Game state: the current position, its history, and the move-selection
//! policy applied on top of raw search scores.

use log::debug;

use crate::board::{
    Board, Color, FenError, Move, MoveList, Piece, Square, BLACK_OO, BLACK_OOO, KING_VALUE,
    WHITE_OO, WHITE_OOO,
};
use crate::search::{
    Dispatcher, EvalResult, SearchOptions, SearchTask, LOT_STALE, LOT_ERR, MAX_DEPTH,
};

/// A running game: the root position the engine searches from, plus the
/// move/board/evaluation histories that feed the anti-repetition policy.
pub struct Game {
    pub initial: Board,
    pub current: Board,
    pub side_to_move: Color,
    /// Which side made (or will make) the first move of this game.
    pub first_mover: Color,
    pub move_history: Vec<Move>,
    pub board_history: Vec<Board>,
    pub eval_history: Vec<EvalResult>,
    /// Root results of the most recent finished search epoch.
    pub last_search_result: Vec<EvalResult>,
}

impl Game {
    /// A game from the standard starting position.
    #[must_use]
    pub fn new() -> Game {
        Game::from_position(Board::startpos(), Color::White)
    }

    /// A game rooted at an arbitrary position.
    #[must_use]
    pub fn from_position(board: Board, side_to_move: Color) -> Game {
        Game {
            initial: board,
            current: board,
            side_to_move,
            first_mover: side_to_move,
            move_history: Vec::new(),
            board_history: Vec::new(),
            eval_history: Vec::new(),
            last_search_result: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Game, FenError> {
        let (board, side) = Board::from_fen(fen)?;
        Ok(Game::from_position(board, side))
    }

    /// Reset the game to the position in `fen`, clearing all history.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Game::from_fen(fen)?;
        Ok(())
    }

    /// Play a move: record it, advance the position, flip the side.
    pub fn exec_move(&mut self, m: Move) {
        let mut er = EvalResult::sentinel();
        er.mv = m;
        er.score = 0;
        self.exec_result(er);
    }

    /// Play a move keeping its search result in the history.
    pub fn exec_result(&mut self, er: EvalResult) {
        if self.board_history.is_empty() {
            self.current = self.initial;
        }
        self.move_history.push(er.mv);
        self.eval_history.push(er);
        self.current = self.current.apply(er.mv).0;
        self.board_history.push(self.current);
        self.side_to_move = self.side_to_move.opposite();
    }

    /// Fully legal moves in the current position.
    #[must_use]
    pub fn valid_moves(&self) -> MoveList {
        let mut moves = self.current.moves(self.side_to_move);
        self.current.remove_invalid(self.side_to_move, &mut moves, 0);
        moves
    }

    #[must_use]
    pub fn is_valid_move(&self, m: Move) -> bool {
        self.valid_moves().contains(m)
    }

    /// No legal move and the king is attacked.
    #[must_use]
    pub fn is_mate(&self) -> bool {
        if !self.valid_moves().is_empty() {
            return false;
        }
        !self.is_stalemate()
    }

    /// No legal move, but no opponent reply would capture our king.
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        if !self.valid_moves().is_empty() {
            return false;
        }
        let opponent = self.side_to_move.opposite();
        let mut replies = self.current.moves(opponent);
        self.current.remove_invalid(opponent, &mut replies, 0);
        let own_king = Piece::king_of(self.side_to_move);
        for &m in replies.iter() {
            let (_, taken) = self.current.apply(m);
            if taken == own_king {
                return false;
            }
        }
        true
    }

    /// How often the current position already occurred, not counting the
    /// occurrence that produced it.
    #[must_use]
    pub fn repetition_count(&self) -> usize {
        let count = self
            .board_history
            .iter()
            .filter(|&&b| b == self.current)
            .count();
        count.saturating_sub(1)
    }

    /// Queue one search task per legal root move (or per `searchmoves`
    /// entry) on the dispatcher. A running epoch is cancelled first.
    pub fn start_search(
        &mut self,
        dispatcher: &mut Dispatcher,
        depth: u16,
        opts: SearchOptions,
        searchmoves: &[Move],
    ) {
        dispatcher.stop();
        self.last_search_result.clear();
        let depth = depth.max(1);

        let roots = self.valid_moves();
        let mut tasks = Vec::new();
        for &m in roots.iter() {
            if !searchmoves.is_empty() && !searchmoves.contains(&m) {
                continue;
            }
            let (child, _) = self.current.apply(m);
            tasks.push((
                m,
                SearchTask {
                    board: child,
                    side: self.side_to_move.opposite(),
                    depth: depth - 1,
                    mate_search: opts.mate_search,
                    pos_score: opts.pos_score,
                },
            ));
        }
        dispatcher.begin(tasks);
    }

    /// One controller poll cycle: pump the dispatcher and absorb any
    /// finished root moves. Returns true when the whole epoch is done.
    pub fn process_search_queue(&mut self, dispatcher: &mut Dispatcher) -> bool {
        let finished = dispatcher.process_once();
        for completed in dispatcher.drain_completed() {
            let mut result = completed.reply.best;
            // The task was searched from the opponent's perspective.
            result.score = -result.score;
            result.mv = completed.mv;
            result.lot[completed.depth as usize + 1] = completed.mv;
            self.fix_lot(&mut result);
            debug!(
                "root {} scored {} ({} evals, {} ms)",
                completed.mv, result.score, completed.reply.evals, completed.reply.elapsed_ms
            );
            self.last_search_result.push(result);
        }
        finished
    }

    /// Rewalk a search result's line of thought from the current root,
    /// truncating where it stops making sense: a mate ends the line, a
    /// stalemate ends it with the STALE sentinel (and a draw score), and
    /// a stored move that is not legal on replay marks the ERR sentinel.
    pub fn fix_lot(&self, r: &mut EvalResult) {
        let mut d = MAX_DEPTH - 1;
        while d > 0 && r.lot[d].is_null() {
            d -= 1;
        }
        let mut scratch = Game::from_position(self.current, self.side_to_move);
        for j in (1..=d).rev() {
            let next = r.lot[j];
            if scratch.is_mate() {
                r.lot[j] = Move::NULL;
                break;
            }
            if scratch.is_stalemate() {
                r.lot[j] = LOT_STALE;
                r.score = 0;
                break;
            }
            if !scratch.is_valid_move(next) {
                r.lot[j - 1] = LOT_ERR;
                break;
            }
            scratch.exec_move(next);
        }
    }

    /// Pick the move to play from the root results.
    ///
    /// In mate-search mode the raw search order decides. Otherwise the
    /// scores get reweighted: castling into or through check is penalized
    /// (otherwise slightly rewarded), pawn pushes get a small nudge, and
    /// with material-only scoring a mobility-difference tiebreak is added. The
    /// final index is the repetition count, so a position seen twice
    /// picks the third-best move to steer away from threefold repetition.
    #[must_use]
    pub fn select_move(&self, results: &[EvalResult], opts: &SearchOptions) -> EvalResult {
        if results.is_empty() {
            return EvalResult {
                score: 0,
                ..EvalResult::sentinel()
            };
        }

        let mut ranked: Vec<EvalResult> = results.to_vec();

        if opts.mate_search {
            ranked.sort_by(|a, b| b.score.cmp(&a.score));
            return ranked[0];
        }

        // Castling: simulate the king on the traversed squares and test
        // for check; penalizing here is cheaper than filtering the move
        // out during generation.
        for e in &mut ranked {
            let adjustment = if e.mv == *WHITE_OO {
                Some((Piece::WhiteKing, Color::White, [Square::new(0, 5), Square::new(0, 6)]))
            } else if e.mv == *WHITE_OOO {
                Some((Piece::WhiteKing, Color::White, [Square::new(0, 2), Square::new(0, 3)]))
            } else if e.mv == *BLACK_OO {
                Some((Piece::BlackKing, Color::Black, [Square::new(7, 5), Square::new(7, 6)]))
            } else if e.mv == *BLACK_OOO {
                Some((Piece::BlackKing, Color::Black, [Square::new(7, 2), Square::new(7, 3)]))
            } else {
                None
            };
            if let Some((king, color, squares)) = adjustment {
                let mut c = self.current;
                let _ = c.insert(king, squares[0]);
                let _ = c.insert(king, squares[1]);
                let bonus = if c.is_check(color) { -KING_VALUE } else { 10 };
                e.score = e.score.saturating_add(bonus);
            }
        }

        // Small bonus for advancing pawns.
        let own_pawn = match self.side_to_move {
            Color::White => Piece::WhitePawn,
            Color::Black => Piece::BlackPawn,
        };
        for e in &mut ranked {
            if self.current.get_piece(e.mv.from()) == own_pawn {
                e.score += 2;
            }
        }

        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        // Material-only scoring leaves many ties; break them by the
        // legal-mobility difference after the move.
        if !opts.pos_score {
            for e in &mut ranked {
                let (c, _) = self.current.apply(e.mv);
                let mut own = c.moves(self.side_to_move);
                c.remove_invalid(self.side_to_move, &mut own, 0);
                e.score += own.len() as i32;
                let mut theirs = c.moves(self.side_to_move.opposite());
                c.remove_invalid(self.side_to_move.opposite(), &mut theirs, 0);
                e.score -= theirs.len() as i32;
            }
            ranked.sort_by(|a, b| b.score.cmp(&a.score));
        }

        // Dodge threefold repetition by stepping down the ranking as the
        // position keeps reappearing; clamp to the worst move.
        let desired = self.repetition_count();
        for e in &ranked {
            debug!("candidate {} : {}", self.current.move_to_uci(e.mv), e.score);
        }
        ranked[desired.min(ranked.len() - 1)]
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_has_twenty_moves() {
        let game = Game::new();
        assert_eq!(game.valid_moves().len(), 20);
        assert!(!game.is_mate());
        assert!(!game.is_stalemate());
    }

    #[test]
    fn exec_move_flips_side_and_records_history() {
        let mut game = Game::new();
        let m: Move = "e2e4".parse().unwrap();
        game.exec_move(m);
        assert_eq!(game.side_to_move, Color::Black);
        assert_eq!(game.move_history.len(), 1);
        assert_eq!(game.board_history.len(), 1);
        assert_eq!(game.current, game.board_history[0]);
    }

    #[test]
    fn fools_mate_is_mate() {
        let mut game = Game::new();
        for s in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            let m = s.parse().unwrap();
            assert!(game.is_valid_move(m), "{s} should be legal");
            game.exec_move(m);
        }
        assert!(game.is_mate());
        assert!(!game.is_stalemate());
    }

    #[test]
    fn smothered_queen_stalemate() {
        // Black to move with no legal move and no check.
        let game = Game::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        assert!(game.valid_moves().is_empty());
        assert!(game.is_stalemate());
        assert!(!game.is_mate());
    }

    #[test]
    fn repetition_count_tracks_recurring_positions() {
        let mut game = Game::new();
        assert_eq!(game.repetition_count(), 0);
        for _ in 0..2 {
            for s in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                game.exec_move(s.parse().unwrap());
            }
        }
        // Startpos has now been reproduced twice after the initial one.
        assert_eq!(game.repetition_count(), 1);
    }

    #[test]
    fn selection_prefers_higher_scores() {
        let game = Game::new();
        let mut a = EvalResult::sentinel();
        a.mv = "e2e4".parse().unwrap();
        a.score = 50;
        let mut b = EvalResult::sentinel();
        b.mv = "d2d4".parse().unwrap();
        b.score = 400;
        let opts = SearchOptions {
            pos_score: true,
            ..SearchOptions::default()
        };
        let picked = game.select_move(&[a, b], &opts);
        assert_eq!(picked.mv, b.mv);
    }

    #[test]
    fn selection_steps_down_on_repetition() {
        let mut game = Game::new();
        for _ in 0..2 {
            for s in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                game.exec_move(s.parse().unwrap());
            }
        }
        assert_eq!(game.repetition_count(), 1);
        let mut a = EvalResult::sentinel();
        a.mv = "e2e4".parse().unwrap();
        a.score = 400;
        let mut b = EvalResult::sentinel();
        b.mv = "d2d4".parse().unwrap();
        b.score = 50;
        let opts = SearchOptions {
            pos_score: true,
            ..SearchOptions::default()
        };
        // Second-best on the first repetition.
        let picked = game.select_move(&[a, b], &opts);
        assert_eq!(picked.mv, b.mv);
    }

    #[test]
    fn selection_returns_null_for_empty_results() {
        let game = Game::new();
        let picked = game.select_move(&[], &SearchOptions::default());
        assert!(picked.mv.is_null());
        assert_eq!(picked.score, 0);
    }

    #[test]
    fn fix_lot_marks_illegal_continuations() {
        let game = Game::new();
        let mut r = EvalResult::sentinel();
        r.score = 123;
        r.lot[3] = "e2e4".parse().unwrap();
        r.lot[2] = "e7e5".parse().unwrap();
        r.lot[1] = "a1a5".parse().unwrap(); // not legal after 1. e4 e5
        game.fix_lot(&mut r);
        assert_eq!(r.lot[3], "e2e4".parse().unwrap());
        assert_eq!(r.lot[2], "e7e5".parse().unwrap());
        assert_eq!(r.lot[0], LOT_ERR);
    }

    #[test]
    fn fix_lot_flags_stalemate_lines_as_draws() {
        // Qb6 stalemates immediately; a line continuing past it must be
        // cut and rescored to 0.
        let game = Game::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        let mut r = EvalResult::sentinel();
        r.score = 900;
        r.lot[2] = "h1g1".parse().unwrap();
        r.lot[1] = "g1f1".parse().unwrap();
        game.fix_lot(&mut r);
        assert_eq!(r.lot[2], LOT_STALE);
        assert_eq!(r.score, 0);
    }
}
