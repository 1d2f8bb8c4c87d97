//! Terminal state detection: check, checkmate, stalemate.

use std::fmt;

use crate::attacks::{attackers, is_attacked};
use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::BoardError;
use crate::movegen::has_legal_move;
use crate::position::Position;

/// The state of the game from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    /// Return `true` for checkmate and stalemate.
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        };
        f.write_str(text)
    }
}

impl Position {
    /// Return `true` if `color`'s king is attacked.
    pub fn is_check(&self, color: Color) -> Result<bool, BoardError> {
        let king_sq = self.king_square(color)?;
        Ok(is_attacked(self, king_sq, color.flip()))
    }

    /// Return `true` if `color` is in check and none of its pieces has a
    /// legal move. Does not depend on whose turn it is.
    pub fn is_checkmate(&self, color: Color) -> Result<bool, BoardError> {
        Ok(self.is_check(color)? && !has_legal_move(self, color)?)
    }

    /// Return `true` if it is `color`'s turn, `color` is not in check, and
    /// none of its pieces has a legal move.
    pub fn is_stalemate(&self, color: Color) -> Result<bool, BoardError> {
        if self.side_to_move() != color || self.is_check(color)? {
            return Ok(false);
        }
        Ok(!has_legal_move(self, color)?)
    }

    /// The opponent pieces attacking `color`'s king, for highlighting.
    pub fn checkers(&self, color: Color) -> Result<Bitboard, BoardError> {
        let king_sq = self.king_square(color)?;
        Ok(attackers(self, king_sq, color.flip()))
    }

    /// Classify the position for the side to move.
    pub fn status(&self) -> Result<GameStatus, BoardError> {
        let us = self.side_to_move();
        let in_check = self.is_check(us)?;
        let can_move = has_legal_move(self, us)?;
        Ok(match (in_check, can_move) {
            (true, false) => GameStatus::Checkmate,
            (true, true) => GameStatus::Check,
            (false, false) => GameStatus::Stalemate,
            (false, true) => GameStatus::Ongoing,
        })
    }
}
