//! Error types for board operations.

use std::fmt;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs at least 4)
    TooFewFields { found: usize },
    /// Invalid piece character in the placement field
    InvalidPiece { ch: char },
    /// Invalid castling character
    InvalidCastling { ch: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// More than eight ranks in the placement field
    TooManyRanks,
    /// A rank describes more than eight files
    TooManyFiles { rank: usize },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewFields { found } => {
                write!(f, "FEN must have at least 4 fields, found {found}")
            }
            FenError::InvalidPiece { ch } => {
                write!(f, "Invalid piece character '{ch}' in FEN")
            }
            FenError::InvalidCastling { ch } => {
                write!(f, "Invalid castling character '{ch}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::TooManyRanks => write!(f, "More than 8 ranks in FEN"),
            FenError::TooManyFiles { rank } => {
                write!(f, "More than 8 files in FEN rank {rank}")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for coordinate-move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    BadLength { len: usize },
    /// Invalid square notation in the move
    BadSquare { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::BadLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::BadSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareParseError {
    pub notation: String,
}

impl fmt::Display for SquareParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid square notation '{}'", self.notation)
    }
}

impl std::error::Error for SquareParseError {}
