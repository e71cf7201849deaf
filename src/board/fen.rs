//! FEN parsing and emission.

use super::error::FenError;
use super::state::EN_PASSANT_NONE;
use super::types::{CastlingRights, Color, Piece, Square};
use super::Board;

impl Board {
    /// Parse a FEN string into a board plus the side to move.
    ///
    /// The halfmove clock and fullmove number (fields 5 and 6) are
    /// accepted but ignored; this engine tracks repetition by comparing
    /// board snapshots instead.
    pub fn from_fen(fen: &str) -> Result<(Board, Color), FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewFields { found: parts.len() });
        }

        let mut board = Board::empty();

        // 1. Piece placement, rank 8 down to rank 1.
        for (rank_idx, rank_str) in parts[0].split('/').enumerate() {
            if rank_idx >= 8 {
                return Err(FenError::TooManyRanks);
            }
            let rank = 7 - rank_idx as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(d) = c.to_digit(10) {
                    file += d as u8;
                } else {
                    let pc = Piece::from_fen_char(c).ok_or(FenError::InvalidPiece { ch: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles { rank: rank_idx });
                    }
                    let _ = board.insert(pc, Square::new(rank, file));
                    file += 1;
                }
            }
            if file > 8 {
                return Err(FenError::TooManyFiles { rank: rank_idx });
            }
        }

        // 2. Active color.
        let side = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        // 3. Castling availability.
        let mut rights = CastlingRights::none();
        for c in parts[2].chars() {
            match c {
                'K' => rights.set(Color::White, true),
                'Q' => rights.set(Color::White, false),
                'k' => rights.set(Color::Black, true),
                'q' => rights.set(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { ch: c }),
            }
        }
        board.flags = rights;

        // 4. En passant square.
        board.en_passant = if parts[3] == "-" {
            EN_PASSANT_NONE
        } else {
            let sq: Square = parts[3].parse().map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            sq.index()
        };

        // Fields 5 and 6 (halfmove clock, fullmove number) are unused.

        Ok((board, side))
    }

    /// Emit the position as a FEN string. The halfmove clock and fullmove
    /// number are not tracked and render as "0 1".
    #[must_use]
    pub fn to_fen(&self, side: Color) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let pc = self.get_piece(Square::new(rank, file));
                if pc == Piece::Empty {
                    empty += 1;
                } else {
                    if empty > 0 {
                        placement.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placement.push(pc.to_fen_char());
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let active = if side.is_white() { "w" } else { "b" };

        let mut castling = String::new();
        if self.flags.has(Color::White, true) {
            castling.push('K');
        }
        if self.flags.has(Color::White, false) {
            castling.push('Q');
        }
        if self.flags.has(Color::Black, true) {
            castling.push('k');
        }
        if self.flags.has(Color::Black, false) {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = match self.en_passant_square() {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!("{placement} {active} {castling} {en_passant} 0 1")
    }
}
