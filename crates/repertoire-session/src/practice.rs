//! Practice mode: the user plays one side of a saved line and the other
//! side is replayed from it.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use repertoire_core::{
    Color, CoordMove, Game, MoveOutcome, PendingPromotion, PlayError, PromotionPiece, Snapshot, Square,
};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::repertoire::SavedLine;

/// How an attempted move was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The expected move; the replay side answered with `reply`.
    Correct { reply: CoordMove },
    /// The line is finished. `reply` is the closing replay move, if any.
    Completed { reply: Option<CoordMove> },
    /// Not the expected move. It stays on the board until [`PracticeSession::undo`].
    Wrong { expected: CoordMove },
    /// The expected promoting move; waiting for [`PracticeSession::promote`].
    AwaitingPromotion(PendingPromotion),
    /// A wrong move is still on the board.
    WaitingForUndo,
    /// Not a legal move, or the line is already finished. Nothing changed.
    Ignored,
}

/// One run through a saved line.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    name: String,
    line: Vec<CoordMove>,
    /// Promotion piece for each ply, taken from the saved SAN.
    promotions: Vec<Option<PromotionPiece>>,
    player: Color,
    index: usize,
    wrong_pre: Option<Snapshot>,
}

impl PracticeSession {
    /// Reset `game` and start practicing `line` as `player`.
    ///
    /// When the player has Black the replay side makes the first move.
    pub fn start(game: &mut Game, line: &SavedLine, player: Color) -> Result<PracticeSession, SessionError> {
        if line.moves.is_empty() {
            return Err(SessionError::EmptyLine);
        }
        let moves = line
            .moves
            .iter()
            .map(|text| CoordMove::parse(text).ok_or_else(|| SessionError::CorruptLine { text: text.clone() }))
            .collect::<Result<Vec<_>, _>>()?;
        let promotions = (0..moves.len())
            .map(|i| line.san.get(i).and_then(|san| promotion_in_san(san)))
            .collect();

        game.reset();
        let mut session = PracticeSession {
            name: line.name.clone(),
            line: moves,
            promotions,
            player,
            index: 0,
            wrong_pre: None,
        };
        info!(name = %session.name, ?player, plies = session.line.len(), "practice started");

        if player == Color::Black {
            session.replay_next(game)?;
        }
        Ok(session)
    }

    /// Judge the player's move `from`-`to`.
    pub fn attempt(&mut self, game: &mut Game, from: Square, to: Square) -> Result<Verdict, SessionError> {
        if self.is_complete() {
            return Ok(Verdict::Ignored);
        }
        if self.wrong_pre.is_some() {
            return Ok(Verdict::WaitingForUndo);
        }

        let pre = game.snapshot();
        let outcome = match game.play(from, to) {
            Ok(outcome) => outcome,
            Err(PlayError::IllegalMove { .. }) => return Ok(Verdict::Ignored),
            Err(e) => return Err(e.into()),
        };

        let expected = self.line[self.index];
        if expected == CoordMove::new(from, to) {
            return match outcome {
                MoveOutcome::AwaitingPromotion(pending) => Ok(Verdict::AwaitingPromotion(pending)),
                MoveOutcome::Played(_) => {
                    self.index += 1;
                    self.after_player_move(game)
                }
            };
        }

        if let MoveOutcome::AwaitingPromotion(_) = outcome {
            game.promote(PromotionPiece::Queen)?;
        }
        self.wrong_pre = Some(pre);
        debug!(%from, %to, %expected, "wrong move");
        Ok(Verdict::Wrong { expected })
    }

    /// Complete the player's pending promotion. Any piece is accepted.
    pub fn promote(&mut self, game: &mut Game, piece: PromotionPiece) -> Result<Verdict, SessionError> {
        game.promote(piece)?;
        self.index += 1;
        self.after_player_move(game)
    }

    /// Take back a wrong move, or a pending promotion.
    ///
    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self, game: &mut Game) -> bool {
        if let Some(snapshot) = self.wrong_pre.take() {
            game.restore(snapshot);
            debug!("wrong move taken back");
            return true;
        }
        game.abandon_promotion().is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.line.len()
    }

    pub fn is_waiting_for_undo(&self) -> bool {
        self.wrong_pre.is_some()
    }

    /// The next move of the line, if any.
    pub fn expected(&self) -> Option<CoordMove> {
        self.line.get(self.index).copied()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn player(&self) -> Color {
        self.player
    }

    /// Plies of the line played so far.
    pub fn progress(&self) -> (usize, usize) {
        (self.index, self.line.len())
    }

    fn after_player_move(&mut self, game: &mut Game) -> Result<Verdict, SessionError> {
        if self.is_complete() {
            info!(name = %self.name, "practice line completed");
            return Ok(Verdict::Completed { reply: None });
        }
        let reply = self.replay_next(game)?;
        if self.is_complete() {
            info!(name = %self.name, "practice line completed");
            return Ok(Verdict::Completed { reply: Some(reply) });
        }
        Ok(Verdict::Correct { reply })
    }

    /// Play the line's next move for the replay side.
    fn replay_next(&mut self, game: &mut Game) -> Result<CoordMove, SessionError> {
        let mv = self.line[self.index];
        let outcome = game.play(mv.from, mv.to).map_err(|e| match e {
            PlayError::IllegalMove { .. } => SessionError::CorruptLine { text: mv.to_string() },
            other => other.into(),
        })?;
        if let MoveOutcome::AwaitingPromotion(_) = outcome {
            let piece = self.promotions[self.index].unwrap_or(PromotionPiece::Queen);
            game.promote(piece)?;
        }
        self.index += 1;
        debug!(%mv, "replayed");
        Ok(mv)
    }
}

/// The piece after `=` in a SAN move, if any.
fn promotion_in_san(san: &str) -> Option<PromotionPiece> {
    let (_, rest) = san.split_once('=')?;
    rest.chars().next().and_then(PromotionPiece::from_char)
}

/// The order saved lines are offered for practice.
#[derive(Debug, Clone)]
pub struct PracticeQueue {
    order: VecDeque<usize>,
    rng: StdRng,
    shuffle: bool,
}

impl PracticeQueue {
    /// A queue drawing in shuffled order when `shuffle` is set. `seed`
    /// makes the order reproducible.
    pub fn new(seed: Option<u64>, shuffle: bool) -> PracticeQueue {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        PracticeQueue {
            order: VecDeque::new(),
            rng,
            shuffle,
        }
    }

    /// The next line index out of `len` saved lines, refilling the queue
    /// once every line has been drawn. `None` when there are no lines.
    pub fn next(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        // Lines may have been deleted since the queue was filled.
        self.order.retain(|&i| i < len);
        if self.order.is_empty() {
            let mut fresh: Vec<usize> = (0..len).collect();
            if self.shuffle {
                fresh.shuffle(&mut self.rng);
            }
            self.order.extend(fresh);
        }
        self.order.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(moves: &[&str], san: &[&str]) -> SavedLine {
        SavedLine {
            name: String::from("Test"),
            moves: moves.iter().map(|m| m.to_string()).collect(),
            san: san.iter().map(|m| m.to_string()).collect(),
            created: 0,
        }
    }

    fn italian() -> SavedLine {
        saved(
            &["e2-e4", "e7-e5", "g1-f3", "b8-c6", "f1-c4"],
            &["e4", "e5", "Nf3", "Nc6", "Bc4"],
        )
    }

    fn attempt(session: &mut PracticeSession, game: &mut Game, coords: &str) -> Verdict {
        let mv = CoordMove::parse(coords).unwrap();
        session.attempt(game, mv.from, mv.to).unwrap()
    }

    fn cm(coords: &str) -> CoordMove {
        CoordMove::parse(coords).unwrap()
    }

    #[test]
    fn white_plays_through_line() {
        let mut game = Game::new();
        let mut session = PracticeSession::start(&mut game, &italian(), Color::White).unwrap();
        assert_eq!(session.expected(), Some(cm("e2-e4")));

        assert_eq!(attempt(&mut session, &mut game, "e2-e4"), Verdict::Correct { reply: cm("e7-e5") });
        assert_eq!(attempt(&mut session, &mut game, "g1-f3"), Verdict::Correct { reply: cm("b8-c6") });
        assert_eq!(attempt(&mut session, &mut game, "f1-c4"), Verdict::Completed { reply: None });
        assert!(session.is_complete());
        assert_eq!(attempt(&mut session, &mut game, "e1-e2"), Verdict::Ignored);
        assert_eq!(game.history().len(), 5);
    }

    #[test]
    fn black_lets_replay_side_move_first() {
        let mut game = Game::new();
        let mut session = PracticeSession::start(&mut game, &italian(), Color::Black).unwrap();
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.position().side_to_move(), Color::Black);

        assert_eq!(attempt(&mut session, &mut game, "e7-e5"), Verdict::Correct { reply: cm("g1-f3") });
        assert_eq!(
            attempt(&mut session, &mut game, "b8-c6"),
            Verdict::Completed { reply: Some(cm("f1-c4")) }
        );
        assert_eq!(session.progress(), (5, 5));
    }

    #[test]
    fn wrong_move_waits_for_undo() {
        let mut game = Game::new();
        let mut session = PracticeSession::start(&mut game, &italian(), Color::White).unwrap();
        let start = game.snapshot();

        assert_eq!(attempt(&mut session, &mut game, "d2-d4"), Verdict::Wrong { expected: cm("e2-e4") });
        // The wrong move is shown on the board.
        assert_eq!(game.history().len(), 1);
        assert!(session.is_waiting_for_undo());

        assert!(session.undo(&mut game));
        assert_eq!(game.snapshot(), start);
        assert!(!session.undo(&mut game));
        assert_eq!(attempt(&mut session, &mut game, "e2-e4"), Verdict::Correct { reply: cm("e7-e5") });
    }

    #[test]
    fn wrong_attempts_do_not_chain() {
        let mut game = Game::new();
        let mut session = PracticeSession::start(&mut game, &italian(), Color::White).unwrap();
        attempt(&mut session, &mut game, "e2-e4");
        let before_wrong = game.snapshot();

        assert!(matches!(attempt(&mut session, &mut game, "d2-d4"), Verdict::Wrong { .. }));
        let after_wrong = game.snapshot();
        // A second attempt is refused and leaves the wrong move on the board.
        assert_eq!(attempt(&mut session, &mut game, "e5-d4"), Verdict::WaitingForUndo);
        assert_eq!(game.snapshot(), after_wrong);

        // One undo restores the position before the first wrong move.
        assert!(session.undo(&mut game));
        assert_eq!(game.snapshot(), before_wrong);
        assert!(!session.is_waiting_for_undo());
    }

    #[test]
    fn illegal_attempt_is_ignored() {
        let mut game = Game::new();
        let mut session = PracticeSession::start(&mut game, &italian(), Color::White).unwrap();
        assert_eq!(attempt(&mut session, &mut game, "e2-e5"), Verdict::Ignored);
        assert!(game.is_at_start());
        assert!(!session.is_waiting_for_undo());
    }

    #[test]
    fn start_rejects_corrupt_lines() {
        let mut game = Game::new();
        let bad = saved(&["e2-e4", "zz"], &["e4", "?"]);
        assert!(matches!(
            PracticeSession::start(&mut game, &bad, Color::White),
            Err(SessionError::CorruptLine { .. })
        ));
        let unplayable = saved(&["e2-e5"], &["e5"]);
        assert!(matches!(
            PracticeSession::start(&mut game, &unplayable, Color::Black),
            Err(SessionError::CorruptLine { .. })
        ));
        assert!(matches!(
            PracticeSession::start(&mut game, &saved(&[], &[]), Color::White),
            Err(SessionError::EmptyLine)
        ));
    }

    #[test]
    fn promotion_san_parsing() {
        assert_eq!(promotion_in_san("b8=N+"), Some(PromotionPiece::Knight));
        assert_eq!(promotion_in_san("exd8=Q#"), Some(PromotionPiece::Queen));
        assert_eq!(promotion_in_san("Nf3"), None);
    }

    #[test]
    fn replay_side_promotes_to_saved_piece() {
        // White pushes a7-a8 and promotes; Black is the player, so White is replayed.
        let line = saved(
            &["a2-a4", "h7-h6", "a4-a5", "h6-h5", "a5-a6", "h5-h4", "a6-b7", "h4-h3", "b7-a8"],
            &["a4", "h6", "a5", "h5", "a6", "h4", "axb7", "h3", "bxa8=N"],
        );
        let mut game = Game::new();
        let mut session = PracticeSession::start(&mut game, &line, Color::Black).unwrap();
        for mv in ["h7-h6", "h6-h5", "h5-h4"] {
            assert!(matches!(attempt(&mut session, &mut game, mv), Verdict::Correct { .. }));
        }
        let verdict = attempt(&mut session, &mut game, "h4-h3");
        assert_eq!(verdict, Verdict::Completed { reply: Some(cm("b7-a8")) });
        let a8 = Square::from_algebraic("a8").unwrap();
        let piece = game.position().piece_on(a8).unwrap();
        assert_eq!(piece.kind, PromotionPiece::Knight.to_piece_kind());
        assert_eq!(piece.color, Color::White);
    }

    #[test]
    fn player_promotion_waits_for_choice() {
        let line = saved(
            &["a2-a4", "h7-h6", "a4-a5", "h6-h5", "a5-a6", "h5-h4", "a6-b7", "h4-h3", "b7-a8"],
            &["a4", "h6", "a5", "h5", "a6", "h4", "axb7", "h3", "bxa8=Q"],
        );
        let mut game = Game::new();
        let mut session = PracticeSession::start(&mut game, &line, Color::White).unwrap();
        for mv in ["a2-a4", "a4-a5", "a5-a6", "a6-b7"] {
            assert!(matches!(attempt(&mut session, &mut game, mv), Verdict::Correct { .. }));
        }
        assert!(matches!(attempt(&mut session, &mut game, "b7-a8"), Verdict::AwaitingPromotion(_)));
        // Abandoning and retrying is allowed.
        assert!(session.undo(&mut game));
        assert!(matches!(attempt(&mut session, &mut game, "b7-a8"), Verdict::AwaitingPromotion(_)));
        let verdict = session.promote(&mut game, PromotionPiece::Rook).unwrap();
        assert_eq!(verdict, Verdict::Completed { reply: None });
    }

    #[test]
    fn queue_visits_every_line_before_repeating() {
        let mut queue = PracticeQueue::new(Some(42), true);
        let mut first: Vec<usize> = (0..5).map(|_| queue.next(5).unwrap()).collect();
        first.sort_unstable();
        assert_eq!(first, [0, 1, 2, 3, 4]);
        assert!(queue.next(5).is_some());
        assert_eq!(queue.next(0), None);
    }

    #[test]
    fn queue_is_reproducible_with_seed() {
        let mut a = PracticeQueue::new(Some(7), true);
        let mut b = PracticeQueue::new(Some(7), true);
        let seq_a: Vec<_> = (0..10).map(|_| a.next(4)).collect();
        let seq_b: Vec<_> = (0..10).map(|_| b.next(4)).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn unshuffled_queue_keeps_saved_order() {
        let mut queue = PracticeQueue::new(None, false);
        let order: Vec<_> = (0..4).map(|_| queue.next(3).unwrap()).collect();
        assert_eq!(order, [0, 1, 2, 0]);
    }

    #[test]
    fn queue_drops_deleted_indices() {
        let mut queue = PracticeQueue::new(None, false);
        assert_eq!(queue.next(4), Some(0));
        assert_eq!(queue.next(2), Some(1));
        assert_eq!(queue.next(2), Some(0));
    }
}
