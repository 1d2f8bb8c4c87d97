//! Error types for FEN parsing, board validation, and move application.

use crate::color::Color;
use crate::square::Square;

/// Why a FEN string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 4 or 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount { found: usize },
    /// `rank_index` counts from the top of the board, as FEN lists ranks.
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength { rank_index: usize, length: usize },
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar { character: char },
    #[error("invalid active color: \"{found}\"")]
    InvalidColor { found: String },
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar { character: char },
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant { found: String },
    /// `field` is `"halfmove clock"` or `"fullmove number"`.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },
    /// Fields parsed but the board breaks a structural invariant.
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardError),
}

/// Structural invariant violations of a [`Position`](crate::position::Position).
///
/// These are internal-consistency failures, never user mistakes: a
/// position built through FEN validation and legal play cannot produce them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("expected 1 king for {color}, found {count}")]
    InvalidKingCount { color: &'static str, count: usize },
    /// A pawn stands on the first or eighth rank.
    #[error("pawns found on back rank")]
    PawnsOnBackRank,
    /// The side that just moved is still in check, so its king could be captured.
    #[error("the side not to move is in check")]
    OpponentInCheck,
    /// A king-relative query found no king of the given color.
    #[error("no {} king on the board", .0.name())]
    MissingKing(Color),
}

/// Failures of real (history-recording) move application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayError {
    /// A move was attempted while a promotion choice is outstanding.
    #[error("a promotion on {to} is waiting for a piece choice")]
    PromotionPending {
        /// Destination of the pending promotion.
        to: Square,
    },
    /// A promotion piece was supplied with no promotion pending.
    #[error("no promotion is pending")]
    NoPendingPromotion,
    /// The coordinate pair is not a legal move in the current position.
    #[error("illegal move {from}-{to}")]
    IllegalMove {
        /// Origin square.
        from: Square,
        /// Destination square.
        to: Square,
    },
    /// The position violates a structural invariant.
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[cfg(test)]
mod tests {
    use super::{BoardError, FenError, PlayError};
    use crate::color::Color;
    use crate::square::Square;

    #[test]
    fn fen_error_display() {
        let err = FenError::WrongFieldCount { found: 2 };
        assert_eq!(err.to_string(), "expected 4 or 6 FEN fields, found 2");
    }

    #[test]
    fn fen_error_wraps_board_error() {
        let err: FenError = BoardError::PawnsOnBackRank.into();
        assert!(matches!(err, FenError::InvalidBoard(BoardError::PawnsOnBackRank)));
        assert_eq!(err.to_string(), "invalid board: pawns found on back rank");
    }

    #[test]
    fn missing_king_names_color() {
        assert_eq!(
            BoardError::MissingKing(Color::Black).to_string(),
            "no Black king on the board"
        );
    }

    #[test]
    fn play_error_display() {
        let err = PlayError::IllegalMove { from: Square::E1, to: Square::E8 };
        assert_eq!(err.to_string(), "illegal move e1-e8");
        let wrapped: PlayError = BoardError::MissingKing(Color::White).into();
        assert_eq!(wrapped.to_string(), "no White king on the board");
    }
}
