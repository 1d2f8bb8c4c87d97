//! Edit mode: both sides are played by the user and every move is recorded.

use repertoire_core::{Bitboard, CoordMove, Game, Move, MoveOutcome, PendingPromotion, PlayError, PromotionPiece, Square};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::recorder::LineRecorder;

/// Result of a move handed to [`EditSession::play`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Applied and recorded; carries the SAN of the new move.
    Played(String),
    /// Recorded, waiting for [`EditSession::promote`].
    AwaitingPromotion(PendingPromotion),
    /// Not a legal move for the piece on the origin square. Nothing changed.
    Ignored,
}

/// A line being recorded.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    recorder: LineRecorder,
}

impl EditSession {
    /// Start recording. Only allowed from the untouched starting position.
    pub fn enter(game: &Game) -> Result<EditSession, SessionError> {
        if !game.is_at_start() {
            return Err(SessionError::NotAtStart);
        }
        info!("entered edit mode");
        Ok(EditSession::default())
    }

    /// Legal destinations of the piece on `sq`.
    pub fn select(&self, game: &Game, sq: Square) -> Result<Bitboard, SessionError> {
        Ok(game.legal_destinations(sq)?)
    }

    /// Apply and record `from`-`to`.
    pub fn play(&mut self, game: &mut Game, from: Square, to: Square) -> Result<EditOutcome, SessionError> {
        let pre = game.snapshot();
        let outcome = match game.play(from, to) {
            Ok(outcome) => outcome,
            Err(PlayError::IllegalMove { .. }) => {
                debug!(%from, %to, "illegal move ignored");
                return Ok(EditOutcome::Ignored);
            }
            Err(e) => return Err(e.into()),
        };

        self.recorder.record(pre, CoordMove::new(from, to));
        match outcome {
            MoveOutcome::Played(_) => {
                self.recorder.rebuild();
                Ok(EditOutcome::Played(self.last_san()))
            }
            MoveOutcome::AwaitingPromotion(pending) => Ok(EditOutcome::AwaitingPromotion(pending)),
        }
    }

    /// Complete a pending promotion, patch the recorded entry, and rebuild.
    pub fn promote(&mut self, game: &mut Game, piece: PromotionPiece) -> Result<(Move, String), SessionError> {
        let mv = game.promote(piece)?;
        self.recorder.set_promotion(piece);
        self.recorder.rebuild();
        Ok((mv, self.last_san()))
    }

    /// Take back the last recorded move, or a pending promotion.
    pub fn undo(&mut self, game: &mut Game) -> bool {
        self.recorder.undo(game)
    }

    /// Back to the starting position with an empty line.
    pub fn clear(&mut self, game: &mut Game) {
        game.reset();
        self.recorder.clear();
        debug!("line cleared");
    }

    /// The finished line as coordinate and SAN lists, ready to save.
    pub fn finished_line(&self, game: &Game) -> Result<(Vec<String>, Vec<String>), SessionError> {
        if let Some(pending) = game.pending_promotion() {
            return Err(PlayError::PromotionPending { to: pending.to }.into());
        }
        if self.recorder.is_empty() {
            return Err(SessionError::EmptyLine);
        }
        Ok((self.recorder.coords(), self.recorder.san().to_vec()))
    }

    /// SAN of the line so far.
    pub fn san(&self) -> &[String] {
        self.recorder.san()
    }

    pub fn recorder(&self) -> &LineRecorder {
        &self.recorder
    }

    fn last_san(&self) -> String {
        self.recorder.san().last().cloned().unwrap_or_default()
    }
}
