//! The interactive loop: reads commands, drives the game in the active mode,
//! and reports back as text.

use std::io::{BufRead, Write};

use repertoire_core::{Color, CoordMove, Game, GameStatus, MoveOutcome, PlayError, PromotionPiece, Square};
use tracing::{debug, info, warn};

use crate::command::{Command, parse_command};
use crate::config::AppConfig;
use crate::editor::{EditOutcome, EditSession};
use crate::error::SessionError;
use crate::practice::{PracticeQueue, PracticeSession, Verdict};
use crate::repertoire::{Repertoire, SavedLine};

const HELP: &str = "\
commands:
  edit                      record a new line from the starting position
  exit                      leave edit or practice mode
  select <sq>               legal destinations of the piece on <sq>
  move <from> <to>          play a move (also `e2-e4` on its own)
  promote <q|r|b|n>         choose the piece for a pending promotion
  undo                      take back the last move
  clear                     restart the line being recorded
  save [name]               store the recorded line
  lines                     list saved lines
  show <n>                  print saved line <n>
  delete <n>                remove saved line <n>
  practice <white|black> [n]  practice line <n> or the next one
  reset                     back to the starting position
  board                     print the board
  fen                       print the position as FEN
  quit                      leave";

/// What the application is doing with the board.
enum Mode {
    /// Free play, nothing recorded.
    Idle,
    Edit(EditSession),
    Practice(PracticeSession),
}

impl Mode {
    fn name(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Edit(_) => "edit",
            Mode::Practice(_) => "practice",
        }
    }
}

/// Whether the loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The application state: one board shared by every mode.
pub struct App<W: Write> {
    game: Game,
    mode: Mode,
    repertoire: Repertoire,
    queue: PracticeQueue,
    out: W,
}

impl<W: Write> App<W> {
    /// Create the application writing its replies to `out`.
    pub fn new(repertoire: Repertoire, config: &AppConfig, out: W) -> Self {
        Self {
            game: Game::new(),
            mode: Mode::Idle,
            repertoire,
            queue: PracticeQueue::new(config.seed, config.shuffle_practice),
            out,
        }
    }

    /// Read commands from `input` until `quit` or end of input.
    ///
    /// Command and session errors are reported and the loop carries on;
    /// only I/O failures end it.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), SessionError> {
        writeln!(self.out, "Opening repertoire trainer. Type `help` for commands.")?;
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!(cmd = %trimmed, "received command");

            let cmd = match parse_command(trimmed) {
                Ok(cmd) => cmd,
                Err(e) => {
                    warn!(error = %e, "command parse error");
                    writeln!(self.out, "error: {e}")?;
                    continue;
                }
            };
            match self.handle(cmd) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e @ SessionError::Io { .. }) => return Err(e),
                Err(e) => {
                    warn!(error = %e, mode = self.mode.name(), "command rejected");
                    writeln!(self.out, "error: {e}")?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Execute one command.
    pub fn handle(&mut self, cmd: Command) -> Result<Flow, SessionError> {
        match cmd {
            Command::Edit => self.handle_edit()?,
            Command::Exit => self.handle_exit()?,
            Command::Select(sq) => self.handle_select(sq)?,
            Command::Move(mv) => self.handle_move(mv)?,
            Command::Promote(piece) => self.handle_promote(piece)?,
            Command::Undo => self.handle_undo()?,
            Command::Clear => self.handle_clear()?,
            Command::Save(name) => self.handle_save(name.as_deref())?,
            Command::Lines => self.handle_lines()?,
            Command::Show(n) => self.handle_show(n)?,
            Command::Delete(n) => self.handle_delete(n)?,
            Command::Practice { player, line } => self.handle_practice(player, line)?,
            Command::Reset => self.handle_reset()?,
            Command::Board => writeln!(self.out, "{}", self.game.position().pretty())?,
            Command::Fen => writeln!(self.out, "{}", self.game.position())?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(word) => {
                if !word.is_empty() {
                    warn!(command = %word, "unknown command");
                    writeln!(self.out, "unknown command: {word} (type `help`)")?;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn handle_edit(&mut self) -> Result<(), SessionError> {
        match self.mode {
            Mode::Edit(_) => writeln!(self.out, "already in edit mode")?,
            Mode::Practice(_) => return Err(SessionError::ModeConflict { active: "practice" }),
            Mode::Idle => {
                self.mode = Mode::Edit(EditSession::enter(&self.game)?);
                writeln!(self.out, "edit mode: play both sides, then `save [name]`")?;
            }
        }
        Ok(())
    }

    fn handle_exit(&mut self) -> Result<(), SessionError> {
        match &self.mode {
            Mode::Idle => return Err(SessionError::WrongMode { required: "edit or practice" }),
            Mode::Edit(session) => {
                if !session.recorder().is_empty() {
                    writeln!(self.out, "unsaved line discarded")?;
                }
            }
            Mode::Practice(_) => {}
        }
        info!(mode = self.mode.name(), "mode exited");
        self.mode = Mode::Idle;
        self.game.reset();
        writeln!(self.out, "back to free play")?;
        Ok(())
    }

    fn handle_select(&mut self, sq: Square) -> Result<(), SessionError> {
        let dests = match &self.mode {
            Mode::Edit(session) => session.select(&self.game, sq)?,
            _ => self.game.legal_destinations(sq)?,
        };
        if dests.is_empty() {
            writeln!(self.out, "no legal moves from {sq}")?;
        } else {
            let list: Vec<String> = dests.squares().map(|s| s.to_string()).collect();
            writeln!(self.out, "{sq}: {}", list.join(" "))?;
        }
        Ok(())
    }

    fn handle_move(&mut self, mv: CoordMove) -> Result<(), SessionError> {
        match &mut self.mode {
            Mode::Edit(session) => match session.play(&mut self.game, mv.from, mv.to)? {
                EditOutcome::Played(san) => {
                    let ply = session.recorder().len();
                    writeln!(self.out, "{}", numbered(ply - 1, &san))?;
                }
                EditOutcome::AwaitingPromotion(_) => writeln!(self.out, "promote to? (q, r, b, n)")?,
                EditOutcome::Ignored => writeln!(self.out, "illegal move {mv}")?,
            },
            Mode::Practice(session) => {
                let verdict = session.attempt(&mut self.game, mv.from, mv.to)?;
                report_verdict(&mut self.out, verdict)?;
            }
            Mode::Idle => match self.game.play(mv.from, mv.to) {
                Ok(MoveOutcome::Played(_)) => writeln!(self.out, "played {mv}")?,
                Ok(MoveOutcome::AwaitingPromotion(_)) => writeln!(self.out, "promote to? (q, r, b, n)")?,
                Err(PlayError::IllegalMove { .. }) => writeln!(self.out, "illegal move {mv}")?,
                Err(e) => return Err(e.into()),
            },
        }
        self.report_status()
    }

    fn handle_promote(&mut self, piece: PromotionPiece) -> Result<(), SessionError> {
        match &mut self.mode {
            Mode::Edit(session) => {
                let (_, san) = session.promote(&mut self.game, piece)?;
                let ply = session.recorder().len();
                writeln!(self.out, "{}", numbered(ply - 1, &san))?;
            }
            Mode::Practice(session) => {
                let verdict = session.promote(&mut self.game, piece)?;
                report_verdict(&mut self.out, verdict)?;
            }
            Mode::Idle => {
                let mv = self.game.promote(piece)?;
                let letter = piece.to_piece_kind().fen_char().to_ascii_uppercase();
                writeln!(self.out, "played {}={letter}", mv.coords())?;
            }
        }
        self.report_status()
    }

    fn handle_undo(&mut self) -> Result<(), SessionError> {
        let undone = match &mut self.mode {
            Mode::Edit(session) => session.undo(&mut self.game),
            Mode::Practice(session) => session.undo(&mut self.game),
            Mode::Idle => return Err(SessionError::WrongMode { required: "edit or practice" }),
        };
        if undone {
            writeln!(self.out, "undone")?;
        } else {
            writeln!(self.out, "nothing to undo")?;
        }
        Ok(())
    }

    fn handle_clear(&mut self) -> Result<(), SessionError> {
        let Mode::Edit(session) = &mut self.mode else {
            return Err(SessionError::WrongMode { required: "edit" });
        };
        session.clear(&mut self.game);
        writeln!(self.out, "line cleared")?;
        Ok(())
    }

    fn handle_save(&mut self, name: Option<&str>) -> Result<(), SessionError> {
        let Mode::Edit(session) = &self.mode else {
            return Err(SessionError::WrongMode { required: "edit" });
        };
        let (moves, san) = session.finished_line(&self.game)?;
        let saved = self.repertoire.add(name, moves, san)?;
        writeln!(self.out, "saved \"{}\" ({} plies)", saved.name, saved.moves.len())?;

        self.mode = Mode::Idle;
        self.game.reset();
        info!("edit mode exited after save");
        Ok(())
    }

    fn handle_lines(&mut self) -> Result<(), SessionError> {
        if self.repertoire.is_empty() {
            writeln!(self.out, "no saved lines")?;
            return Ok(());
        }
        for (i, line) in self.repertoire.lines().iter().enumerate() {
            writeln!(self.out, "{}. {}: {}", i + 1, line.name, movetext(&line.san))?;
        }
        Ok(())
    }

    fn handle_show(&mut self, number: usize) -> Result<(), SessionError> {
        let line = self.line_at(number)?.clone();
        writeln!(self.out, "{}", line.name)?;
        writeln!(self.out, "  {}", movetext(&line.san))?;
        writeln!(self.out, "  {}", line.moves.join(" "))?;
        Ok(())
    }

    fn handle_delete(&mut self, number: usize) -> Result<(), SessionError> {
        let index = number.checked_sub(1).ok_or(SessionError::NoSuchLine { number })?;
        match self.repertoire.delete(index)? {
            Some(removed) => writeln!(self.out, "deleted \"{}\"", removed.name)?,
            None => writeln!(self.out, "no saved lines")?,
        }
        Ok(())
    }

    fn handle_practice(&mut self, player: Color, number: Option<usize>) -> Result<(), SessionError> {
        if let Mode::Edit(_) = self.mode {
            return Err(SessionError::ModeConflict { active: "edit" });
        }
        if self.repertoire.is_empty() {
            return Err(SessionError::EmptyRepertoire);
        }
        let number = match number {
            Some(n) => n,
            None => self.queue.next(self.repertoire.len()).ok_or(SessionError::EmptyRepertoire)? + 1,
        };
        let line = self.line_at(number)?.clone();

        let session = PracticeSession::start(&mut self.game, &line, player)?;
        writeln!(
            self.out,
            "practicing \"{}\" as {} ({} plies)",
            line.name,
            player.name(),
            line.moves.len()
        )?;
        if let Some(first) = self.game.history().first() {
            writeln!(self.out, "opponent plays {first}")?;
        }
        if session.is_complete() {
            writeln!(self.out, "line complete")?;
        } else {
            writeln!(self.out, "your move")?;
        }
        self.mode = Mode::Practice(session);
        Ok(())
    }

    fn handle_reset(&mut self) -> Result<(), SessionError> {
        if !matches!(self.mode, Mode::Idle) {
            return Err(SessionError::ModeConflict { active: self.mode.name() });
        }
        self.game.reset();
        writeln!(self.out, "board reset")?;
        Ok(())
    }

    fn line_at(&self, number: usize) -> Result<&SavedLine, SessionError> {
        number
            .checked_sub(1)
            .and_then(|i| self.repertoire.get(i))
            .ok_or(SessionError::NoSuchLine { number })
    }

    /// Announce check, mate or stalemate in the current position.
    fn report_status(&mut self) -> Result<(), SessionError> {
        if self.game.pending_promotion().is_some() {
            return Ok(());
        }
        match self.game.status()? {
            GameStatus::Ongoing => {}
            status => writeln!(self.out, "{status}")?,
        }
        Ok(())
    }
}

fn report_verdict<W: Write>(out: &mut W, verdict: Verdict) -> Result<(), SessionError> {
    match verdict {
        Verdict::Correct { reply } => writeln!(out, "correct; opponent plays {reply}")?,
        Verdict::Completed { reply: Some(reply) } => {
            writeln!(out, "correct; opponent plays {reply}")?;
            writeln!(out, "line complete")?;
        }
        Verdict::Completed { reply: None } => writeln!(out, "correct; line complete")?,
        Verdict::Wrong { expected } => writeln!(out, "wrong, expected {expected}; `undo` to try again")?,
        Verdict::AwaitingPromotion(_) => writeln!(out, "promote to? (q, r, b, n)")?,
        Verdict::WaitingForUndo => writeln!(out, "undo the wrong move first")?,
        Verdict::Ignored => writeln!(out, "move ignored")?,
    }
    Ok(())
}

/// SAN with its move number, `1. e4` or `1... e5`, for zero-based `ply`.
fn numbered(ply: usize, san: &str) -> String {
    let number = ply / 2 + 1;
    if ply % 2 == 0 {
        format!("{number}. {san}")
    } else {
        format!("{number}... {san}")
    }
}

/// A SAN list as movetext: `1. e4 e5 2. Nf3`.
fn movetext(san: &[String]) -> String {
    let mut parts = Vec::with_capacity(san.len() + san.len() / 2 + 1);
    for (ply, mv) in san.iter().enumerate() {
        if ply % 2 == 0 {
            parts.push(format!("{}.", ply / 2 + 1));
        }
        parts.push(mv.clone());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repertoire::MemoryStore;

    fn app() -> App<Vec<u8>> {
        let config = AppConfig {
            seed: Some(1),
            ..AppConfig::default()
        };
        let repertoire = Repertoire::load(Box::new(MemoryStore::new()), &config);
        App::new(repertoire, &config, Vec::new())
    }

    /// Run a script and return everything printed.
    fn run(app: &mut App<Vec<u8>>, script: &str) -> String {
        app.out.clear();
        app.run(script.as_bytes()).unwrap();
        String::from_utf8(app.out.clone()).unwrap()
    }

    #[test]
    fn record_and_save_a_line() {
        let mut app = app();
        let out = run(&mut app, "edit\ne2-e4\ne7-e5\nmove g1 f3\nsave Open game\nlines\n");
        assert!(out.contains("1. e4"));
        assert!(out.contains("1... e5"));
        assert!(out.contains("2. Nf3"));
        assert!(out.contains("saved \"Open game\" (3 plies)"));
        assert!(out.contains("1. Open game: 1. e4 e5 2. Nf3"));
        assert!(matches!(app.mode, Mode::Idle));
        assert!(app.game.is_at_start());
    }

    #[test]
    fn modes_are_exclusive() {
        let mut app = app();
        run(&mut app, "edit\ne2-e4\nsave\n");
        let out = run(&mut app, "practice white 1\nedit\n");
        assert!(out.contains("exit practice mode first"));
        assert!(matches!(app.mode, Mode::Practice(_)));

        let out = run(&mut app, "exit\nedit\npractice black\n");
        assert!(out.contains("exit edit mode first"));
        assert!(matches!(app.mode, Mode::Edit(_)));
    }

    #[test]
    fn edit_requires_starting_position() {
        let mut app = app();
        let out = run(&mut app, "e2-e4\nedit\n");
        assert!(out.contains("initial position"));
        let out = run(&mut app, "reset\nedit\n");
        assert!(out.contains("edit mode"));
        assert!(matches!(app.mode, Mode::Edit(_)));
    }

    #[test]
    fn practice_round() {
        let mut app = app();
        run(&mut app, "edit\ne2-e4\ne7-e5\ng1-f3\nsave\n");
        let out = run(&mut app, "practice white 1\nd2-d4\ne2-e4\nundo\ne2-e4\ng1-f3\n");
        assert!(out.contains("wrong, expected e2-e4"));
        assert!(out.contains("undo the wrong move first"));
        assert!(out.contains("correct; opponent plays e7-e5"));
        assert!(out.contains("line complete"));
    }

    #[test]
    fn practice_names_the_side_played() {
        let mut app = app();
        run(&mut app, "edit\ne2-e4\ne7-e5\nsave\n");
        let out = run(&mut app, "practice white 1\n");
        assert!(out.contains("practicing \"Line 1\" as White (2 plies)"));
        assert!(out.contains("your move"));
        let out = run(&mut app, "exit\npractice black 1\n");
        assert!(out.contains("as Black"));
        assert!(out.contains("opponent plays e2-e4"));
    }

    #[test]
    fn opening_reply_can_finish_the_line() {
        let mut app = app();
        run(&mut app, "edit\ne2-e4\nsave\n");
        let out = run(&mut app, "practice black 1\n");
        assert!(out.contains("opponent plays e2-e4"));
        assert!(out.contains("line complete"));
        assert!(!out.contains("your move"));
    }

    #[test]
    fn empty_and_duplicate_saves() {
        let mut app = app();
        let out = run(&mut app, "edit\nsave\n");
        assert!(out.contains("no moves to save"));
        let out = run(&mut app, "e2-e4\nsave\nedit\ne2-e4\nsave\n");
        assert!(out.contains("saved \"Line 1\""));
        assert!(out.contains("already exists"));
        assert_eq!(app.repertoire.len(), 1);
    }

    #[test]
    fn delete_and_show() {
        let mut app = app();
        run(&mut app, "edit\ne2-e4\nsave\nedit\nd2-d4\nsave\n");
        let out = run(&mut app, "show 1\nshow 2\ndelete 1\nlines\nshow 5\n");
        assert!(out.contains("Line 1\n  1. e4\n  e2-e4\n"));
        assert!(out.contains("Line 2\n  1. d4\n  d2-d4"));
        assert!(out.contains("deleted \"Line 1\""));
        assert!(out.contains("1. Line 1: 1. d4"));
        assert!(out.contains("no saved line number 5"));
    }

    #[test]
    fn promotion_in_edit_mode_via_commands() {
        let mut app = app();
        let script = "edit\na2-a4\nh7-h6\na4-a5\nh6-h5\na5-a6\nh5-h4\na6-b7\nh4-h3\nb7-a8\npromote n\nundo\n";
        let out = run(&mut app, script);
        assert!(out.contains("promote to?"));
        assert!(out.contains("5. bxa8=N"));
        assert!(out.contains("undone"));
        let Mode::Edit(session) = &app.mode else {
            panic!("expected edit mode");
        };
        assert_eq!(session.recorder().len(), 8);
    }

    #[test]
    fn idle_promotion_prints_uppercase_piece() {
        let mut app = app();
        let script = "a2-a4\nh7-h6\na4-a5\nh6-h5\na5-a6\nh5-h4\na6-b7\nh4-h3\nb7-a8\npromote q\n";
        let out = run(&mut app, script);
        assert!(out.contains("promote to?"));
        assert!(out.contains("played b7-a8=Q"));
    }

    #[test]
    fn errors_do_not_stop_the_loop() {
        let mut app = app();
        let out = run(&mut app, "bogus\nmove e2\nselect z9\nundo\nboard\nquit\nfen\n");
        assert!(out.contains("unknown command: bogus"));
        assert!(out.contains("error: invalid square"));
        assert!(out.contains("not in edit or practice mode"));
        assert!(out.contains("a b c d e f g h"));
        // Nothing after `quit` runs.
        assert!(!out.contains("rnbqkbnr/pppppppp"));
    }

    #[test]
    fn checkmate_is_announced() {
        let mut app = app();
        let out = run(&mut app, "f2-f3\ne7-e5\ng2-g4\nd8-h4\n");
        assert!(out.contains("checkmate"));
    }

    #[test]
    fn select_lists_destinations() {
        let mut app = app();
        let out = run(&mut app, "select g1\nselect e4\n");
        assert!(out.contains("g1: f3 h3"));
        assert!(out.contains("no legal moves from e4"));
    }

    #[test]
    fn movetext_numbers_moves() {
        let san: Vec<String> = ["e4", "c5", "Nf3"].iter().map(|s| s.to_string()).collect();
        assert_eq!(movetext(&san), "1. e4 c5 2. Nf3");
        assert_eq!(numbered(0, "e4"), "1. e4");
        assert_eq!(numbered(3, "Nc6"), "2... Nc6");
    }
}
