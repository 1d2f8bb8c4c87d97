//! Real play: a position, its coordinate history, and promotion interception.

use tracing::debug;

use crate::bitboard::Bitboard;
use crate::chess_move::{CoordMove, Move, PromotionPiece};
use crate::color::Color;
use crate::error::{BoardError, PlayError};
use crate::movegen::{find_move, legal_destinations};
use crate::position::Position;
use crate::square::Square;
use crate::status::GameStatus;

/// A pawn move to the last rank waiting for its piece choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPromotion {
    pub from: Square,
    pub to: Square,
    pub color: Color,
    mv: Move,
}

impl PendingPromotion {
    /// The intercepted move descriptor.
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// What happened to a move handed to [`Game::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied and the turn passed.
    Played(Move),
    /// The move promotes; the board is untouched until [`Game::promote`].
    AwaitingPromotion(PendingPromotion),
}

/// An independent copy of a game's position and history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub position: Position,
    pub history: Vec<CoordMove>,
}

/// A game in progress: the working position, the moves that led to it,
/// and any promotion still waiting for a piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    position: Position,
    history: Vec<CoordMove>,
    pending: Option<PendingPromotion>,
}

impl Game {
    /// A game at the standard starting position.
    pub fn new() -> Game {
        Game::from_position(Position::starting_position())
    }

    /// A game starting from an arbitrary position with an empty history.
    pub fn from_position(position: Position) -> Game {
        Game {
            position,
            history: Vec::new(),
            pending: None,
        }
    }

    /// The current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Moves applied so far, in order.
    pub fn history(&self) -> &[CoordMove] {
        &self.history
    }

    /// The promotion waiting for a piece choice, if any.
    pub fn pending_promotion(&self) -> Option<&PendingPromotion> {
        self.pending.as_ref()
    }

    /// Return `true` at the starting position with nothing played.
    pub fn is_at_start(&self) -> bool {
        self.history.is_empty() && self.pending.is_none() && self.position == Position::starting_position()
    }

    /// Apply the legal move `from`→`to` for the side to move.
    ///
    /// The move is appended to the history first. A promoting pawn move is
    /// then intercepted: the board and turn stay as they are until
    /// [`Game::promote`] supplies the piece.
    pub fn play(&mut self, from: Square, to: Square) -> Result<MoveOutcome, PlayError> {
        if let Some(pending) = self.pending {
            return Err(PlayError::PromotionPending { to: pending.to });
        }
        let mv = find_move(&self.position, from, to)?.ok_or(PlayError::IllegalMove { from, to })?;

        self.history.push(mv.coords());

        if self.position.is_promotion(mv) {
            let pending = PendingPromotion {
                from,
                to,
                color: self.position.side_to_move(),
                mv,
            };
            debug!(%from, %to, "promotion pending");
            self.pending = Some(pending);
            return Ok(MoveOutcome::AwaitingPromotion(pending));
        }

        self.position = self.position.make_move(mv, None);
        debug!(mv = %mv, "move applied");
        Ok(MoveOutcome::Played(mv))
    }

    /// Complete the pending promotion with `piece`.
    pub fn promote(&mut self, piece: PromotionPiece) -> Result<Move, PlayError> {
        let pending = self.pending.take().ok_or(PlayError::NoPendingPromotion)?;
        self.position = self.position.make_move(pending.mv, Some(piece));
        debug!(mv = %pending.mv, %piece, "promotion completed");
        Ok(pending.mv)
    }

    /// Drop the pending promotion as if the move had never been tried.
    ///
    /// The history entry pushed for it is removed; the board was never
    /// changed. Returns the abandoned promotion, or `None` if none was pending.
    pub fn abandon_promotion(&mut self) -> Option<PendingPromotion> {
        let pending = self.pending.take()?;
        self.history.pop();
        debug!(from = %pending.from, to = %pending.to, "promotion abandoned");
        Some(pending)
    }

    /// Back to the starting position with an empty history.
    pub fn reset(&mut self) {
        *self = Game::new();
    }

    /// Copy the position and history.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.position,
            history: self.history.clone(),
        }
    }

    /// Replace the position and history with `snapshot`. Any pending
    /// promotion is discarded.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.position = snapshot.position;
        self.history = snapshot.history;
        self.pending = None;
    }

    /// Legal destinations of the piece on `sq` for the side to move. Empty
    /// while a promotion is pending.
    pub fn legal_destinations(&self, sq: Square) -> Result<Bitboard, BoardError> {
        if self.pending.is_some() {
            return Ok(Bitboard::EMPTY);
        }
        legal_destinations(&self.position, sq)
    }

    /// Status of the current position for the side to move.
    pub fn status(&self) -> Result<GameStatus, BoardError> {
        self.position.status()
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
