//! Board pretty-printing and coordinate-notation helpers.

use std::fmt;

use super::types::{Color, Move, MoveList, Piece, Square};
use super::Board;

impl Board {
    /// Coordinate notation for a move on this board, with the trailing
    /// `q` when a pawn promotes. The null move and sentinels render as
    /// `0000`.
    #[must_use]
    pub fn move_to_uci(&self, m: Move) -> String {
        if m.is_null() || m.raw() >= 0xFF00 {
            return "0000".to_string();
        }
        let pc = self.get_piece(m.from());
        let promotes = (pc == Piece::WhitePawn && m.to().rank() == 7)
            || (pc == Piece::BlackPawn && m.to().rank() == 0);
        if promotes {
            format!("{m}q")
        } else {
            m.to_string()
        }
    }

    /// Find the legal move matching a coordinate string (`e2e4`,
    /// `e7e8q`), if any. Case of a trailing promotion letter is ignored.
    #[must_use]
    pub fn parse_uci_move(&self, side: Color, s: &str) -> Option<Move> {
        let wanted = s.to_ascii_lowercase();
        let mut candidates = self.moves(side);
        self.remove_invalid(side, &mut candidates, 0);
        candidates
            .iter()
            .copied()
            .find(|&m| self.move_to_uci(m) == wanted)
    }

    /// Multi-line dump with figurines, one rank per line, used by the
    /// `d` debug command and the self-play driver.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            out.push((b'1' + rank) as char);
            out.push(' ');
            for file in 0..8 {
                out.push(self.get_piece(Square::new(rank, file)).to_unicode());
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        out
    }

    /// One-line status summary: evaluation, check state and legal move
    /// count per side, en passant and castling state.
    #[must_use]
    pub fn status_line(&self) -> String {
        let count = |side: Color| {
            let mut list: MoveList = self.moves(side);
            self.remove_invalid(side, &mut list, 0);
            list.len()
        };
        let ep = match self.en_passant_square() {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };
        format!(
            "Eval: {} Check W: {} Check B: {} Moves W: {} Moves B: {} Enpassant: {} Castling: {:04b}",
            self.material_eval(),
            self.is_check(Color::White),
            self.is_check(Color::Black),
            count(Color::White),
            count(Color::Black),
            ep,
            self.flags.as_u8(),
        )
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
