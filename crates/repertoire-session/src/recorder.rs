//! The line recorder: recorded moves, their undo snapshots, and the SAN
//! rendering of the whole line.

use repertoire_core::{CoordMove, Game, Position, PromotionPiece, Snapshot, find_move, san};
use tracing::{debug, warn};

/// One recorded real move and the position it was played from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMove {
    pub coords: CoordMove,
    pub pre: Position,
    /// Set once a pending promotion resolves.
    pub promotion: Option<PromotionPiece>,
}

/// Append-only log of recorded moves paired 1:1 with undo snapshots.
#[derive(Debug, Clone, Default)]
pub struct LineRecorder {
    entries: Vec<RecordedMove>,
    undo_stack: Vec<Snapshot>,
    san: Vec<String>,
}

impl LineRecorder {
    /// An empty recorder.
    pub fn new() -> LineRecorder {
        LineRecorder::default()
    }

    /// Log a move applied from `pre`.
    ///
    /// The SAN list is not touched; call [`LineRecorder::rebuild`] once the
    /// move is complete.
    pub fn record(&mut self, pre: Snapshot, coords: CoordMove) {
        debug!(%coords, ply = self.entries.len() + 1, "move recorded");
        self.entries.push(RecordedMove {
            coords,
            pre: pre.position,
            promotion: None,
        });
        self.undo_stack.push(pre);
    }

    /// Patch the promotion piece into the most recent entry.
    ///
    /// Returns `false` if nothing has been recorded.
    pub fn set_promotion(&mut self, piece: PromotionPiece) -> bool {
        match self.entries.last_mut() {
            Some(entry) => {
                entry.promotion = Some(piece);
                true
            }
            None => false,
        }
    }

    /// Recompute the SAN of every entry, in order, from its own pre-move
    /// position.
    ///
    /// A scratch position is advanced alongside the log; a mismatch with the
    /// next entry's recorded position is logged. Moves that cannot be
    /// replayed fall back to their coordinate text.
    pub fn rebuild(&mut self) {
        let mut san_list = Vec::with_capacity(self.entries.len());
        let mut working: Option<Position> = None;

        for (ply, entry) in self.entries.iter().enumerate() {
            if let Some(expected) = working {
                if expected != entry.pre {
                    warn!(ply = ply + 1, coords = %entry.coords, "replayed position diverges from recorded one");
                }
            }

            let text = match find_move(&entry.pre, entry.coords.from, entry.coords.to) {
                Ok(Some(mv)) => match san(&entry.pre, mv, entry.promotion) {
                    Ok(text) => {
                        working = Some(entry.pre.make_move(mv, entry.promotion));
                        text
                    }
                    Err(e) => {
                        warn!(error = %e, coords = %entry.coords, "cannot encode recorded move");
                        working = None;
                        entry.coords.to_string()
                    }
                },
                Ok(None) => {
                    warn!(coords = %entry.coords, "recorded move is not legal in its position");
                    working = None;
                    entry.coords.to_string()
                }
                Err(e) => {
                    warn!(error = %e, coords = %entry.coords, "cannot replay recorded move");
                    working = None;
                    entry.coords.to_string()
                }
            };
            san_list.push(text);
        }

        debug!(plies = san_list.len(), "line rebuilt");
        self.san = san_list;
    }

    /// Undo the most recent move: restore its snapshot into `game`, drop the
    /// entry, and rebuild. Returns `false` with nothing to undo.
    pub fn undo(&mut self, game: &mut Game) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        game.restore(snapshot);
        if let Some(entry) = self.entries.pop() {
            debug!(coords = %entry.coords, "move undone");
        }
        self.rebuild();
        true
    }

    /// Forget everything recorded.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.undo_stack.clear();
        self.san.clear();
    }

    /// Recorded entries, oldest first.
    pub fn entries(&self) -> &[RecordedMove] {
        &self.entries
    }

    /// Coordinate text of every recorded move.
    pub fn coords(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.coords.to_string()).collect()
    }

    /// SAN of every recorded move as of the last rebuild.
    pub fn san(&self) -> &[String] {
        &self.san
    }

    /// Number of undo snapshots held.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repertoire_core::MoveOutcome;

    /// Play `coords` on `game`, recording each move and completing any
    /// promotion with `promotion`.
    fn record_all(game: &mut Game, rec: &mut LineRecorder, coords: &[&str], promotion: PromotionPiece) {
        for text in coords {
            let mv = CoordMove::parse(text).unwrap();
            let pre = game.snapshot();
            let outcome = game.play(mv.from, mv.to).unwrap();
            rec.record(pre, mv);
            if let MoveOutcome::AwaitingPromotion(_) = outcome {
                game.promote(promotion).unwrap();
                rec.set_promotion(promotion);
            }
            rec.rebuild();
        }
    }

    #[test]
    fn rebuild_produces_san() {
        let mut game = Game::new();
        let mut rec = LineRecorder::new();
        record_all(&mut game, &mut rec, &["e2-e4", "e7-e5", "g1-f3"], PromotionPiece::Queen);
        assert_eq!(rec.san(), ["e4", "e5", "Nf3"]);
        assert_eq!(rec.coords(), ["e2-e4", "e7-e5", "g1-f3"]);
        assert_eq!(rec.undo_depth(), 3);
    }

    #[test]
    fn rebuild_is_idempotent_with_castle_and_promotion() {
        let pos: Position = "4k3/1P6/8/8/8/8/8/4K2R w K - 0 1".parse().unwrap();
        let mut game = Game::from_position(pos);
        let mut rec = LineRecorder::new();
        record_all(
            &mut game,
            &mut rec,
            &["e1-g1", "e8-d7", "b7-b8", "d7-e6"],
            PromotionPiece::Knight,
        );
        let first = rec.san().to_vec();
        assert_eq!(first, ["O-O", "Kd7", "b8=N+", "Ke6"]);
        rec.rebuild();
        assert_eq!(rec.san(), first.as_slice());
        rec.rebuild();
        assert_eq!(rec.san(), first.as_slice());
    }

    #[test]
    fn rebuild_does_not_touch_the_game() {
        let mut game = Game::new();
        let mut rec = LineRecorder::new();
        record_all(&mut game, &mut rec, &["d2-d4", "d7-d5"], PromotionPiece::Queen);
        let before = game.clone();
        rec.rebuild();
        assert_eq!(game, before);
    }

    #[test]
    fn undo_restores_exact_snapshot() {
        let mut game = Game::new();
        let mut rec = LineRecorder::new();
        record_all(&mut game, &mut rec, &["e2-e4", "c7-c5", "g1-f3"], PromotionPiece::Queen);
        let before_last = rec.entries()[2].pre;

        assert!(rec.undo(&mut game));
        assert_eq!(*game.position(), before_last);
        assert_eq!(game.history().len(), 2);
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.undo_depth(), 2);
        assert_eq!(rec.san(), ["e4", "c5"]);
    }

    #[test]
    fn undo_with_nothing_recorded() {
        let mut game = Game::new();
        let mut rec = LineRecorder::new();
        assert!(!rec.undo(&mut game));
        assert!(game.is_at_start());
    }

    #[test]
    fn undo_during_pending_promotion() {
        let pos: Position = "4k3/1P6/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let mut game = Game::from_position(pos);
        let mut rec = LineRecorder::new();
        let mv = CoordMove::parse("b7-b8").unwrap();
        let pre = game.snapshot();
        game.play(mv.from, mv.to).unwrap();
        rec.record(pre, mv);
        assert!(game.pending_promotion().is_some());

        assert!(rec.undo(&mut game));
        assert!(game.pending_promotion().is_none());
        assert_eq!(*game.position(), pos);
        assert!(game.history().is_empty());
        assert!(rec.is_empty());
    }

    #[test]
    fn unreplayable_entry_falls_back_to_coordinates() {
        let mut rec = LineRecorder::new();
        let game = Game::new();
        rec.record(game.snapshot(), CoordMove::parse("e2-e5").unwrap());
        rec.rebuild();
        assert_eq!(rec.san(), ["e2-e5"]);
    }

    #[test]
    fn set_promotion_on_empty_recorder() {
        let mut rec = LineRecorder::new();
        assert!(!rec.set_promotion(PromotionPiece::Queen));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut game = Game::new();
        let mut rec = LineRecorder::new();
        record_all(&mut game, &mut rec, &["e2-e4"], PromotionPiece::Queen);
        rec.clear();
        assert!(rec.is_empty());
        assert!(rec.san().is_empty());
        assert_eq!(rec.undo_depth(), 0);
    }
}
