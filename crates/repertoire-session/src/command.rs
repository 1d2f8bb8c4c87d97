//! Interactive command parsing.

use repertoire_core::{Color, CoordMove, PromotionPiece, Square};

use crate::error::CommandError;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `edit` -- start recording a line.
    Edit,
    /// `exit` -- leave edit or practice mode.
    Exit,
    /// `select <sq>` -- list the legal destinations of a piece.
    Select(Square),
    /// `move <from> <to>`, `move e2-e4`, or a bare `e2-e4`.
    Move(CoordMove),
    /// `promote <q|r|b|n>` -- choose the piece for a pending promotion.
    Promote(PromotionPiece),
    /// `undo` -- take back the last move.
    Undo,
    /// `clear` -- reset the board and the line being recorded.
    Clear,
    /// `save [name...]` -- store the recorded line.
    Save(Option<String>),
    /// `lines` -- list saved lines.
    Lines,
    /// `show <n>` -- print saved line `n` (one-based).
    Show(usize),
    /// `delete <n>` -- remove saved line `n` (one-based).
    Delete(usize),
    /// `practice <white|black> [n]` -- practice line `n`, or the next queued one.
    Practice { player: Color, line: Option<usize> },
    /// `reset` -- back to the starting position.
    Reset,
    /// `board` -- print the board.
    Board,
    /// `fen` -- print the position as FEN.
    Fen,
    /// `help` -- list commands.
    Help,
    /// `quit` -- leave the program.
    Quit,
    /// Unrecognized command, ignored.
    Unknown(String),
}

/// Parse one input line into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(Command::Unknown(String::new()));
    }

    match tokens[0] {
        "edit" => Ok(Command::Edit),
        "exit" => Ok(Command::Exit),
        "undo" => Ok(Command::Undo),
        "clear" => Ok(Command::Clear),
        "lines" => Ok(Command::Lines),
        "reset" => Ok(Command::Reset),
        "board" => Ok(Command::Board),
        "fen" => Ok(Command::Fen),
        "help" => Ok(Command::Help),
        "quit" => Ok(Command::Quit),
        "select" => {
            let text = tokens.get(1).ok_or(CommandError::MissingArgument {
                command: "select",
                what: "square",
            })?;
            Ok(Command::Select(parse_square(text)?))
        }
        "move" => parse_move(&tokens[1..]),
        "promote" => parse_promote(&tokens[1..]),
        "save" => {
            let name = tokens[1..].join(" ");
            Ok(Command::Save((!name.is_empty()).then_some(name)))
        }
        "show" => Ok(Command::Show(parse_number(tokens.get(1), "show")?)),
        "delete" => Ok(Command::Delete(parse_number(tokens.get(1), "delete")?)),
        "practice" => parse_practice(&tokens[1..]),
        other => match CoordMove::parse(other) {
            Some(mv) if tokens.len() == 1 => Ok(Command::Move(mv)),
            _ => Ok(Command::Unknown(other.to_string())),
        },
    }
}

/// Parse `move` arguments: `<from> <to>` or `<from>-<to>`.
fn parse_move(tokens: &[&str]) -> Result<Command, CommandError> {
    match tokens {
        [] => Err(CommandError::MissingArgument {
            command: "move",
            what: "squares",
        }),
        [coords] => CoordMove::parse(coords)
            .map(Command::Move)
            .ok_or_else(|| CommandError::InvalidSquare {
                text: coords.to_string(),
            }),
        [from, to, ..] => Ok(Command::Move(CoordMove::new(parse_square(from)?, parse_square(to)?))),
    }
}

/// Parse `promote` arguments. Full piece names are accepted too.
fn parse_promote(tokens: &[&str]) -> Result<Command, CommandError> {
    let text = tokens.first().ok_or(CommandError::MissingArgument {
        command: "promote",
        what: "piece",
    })?;
    let piece = match text.to_ascii_lowercase().as_str() {
        "q" | "queen" => PromotionPiece::Queen,
        "r" | "rook" => PromotionPiece::Rook,
        "b" | "bishop" => PromotionPiece::Bishop,
        "n" | "knight" => PromotionPiece::Knight,
        _ => {
            return Err(CommandError::InvalidPromotion {
                text: text.to_string(),
            });
        }
    };
    Ok(Command::Promote(piece))
}

/// Parse `practice` arguments: a color and an optional line number.
fn parse_practice(tokens: &[&str]) -> Result<Command, CommandError> {
    let text = tokens.first().ok_or(CommandError::MissingArgument {
        command: "practice",
        what: "color",
    })?;
    let player = match text.to_ascii_lowercase().as_str() {
        "white" | "w" => Color::White,
        "black" | "b" => Color::Black,
        _ => {
            return Err(CommandError::InvalidColor {
                text: text.to_string(),
            });
        }
    };
    let line = match tokens.get(1) {
        Some(_) => Some(parse_number(tokens.get(1), "practice")?),
        None => None,
    };
    Ok(Command::Practice { player, line })
}

fn parse_square(text: &str) -> Result<Square, CommandError> {
    Square::from_algebraic(text).ok_or_else(|| CommandError::InvalidSquare {
        text: text.to_string(),
    })
}

/// Parse a one-based line number.
fn parse_number(token: Option<&&str>, command: &'static str) -> Result<usize, CommandError> {
    let text = token.ok_or(CommandError::MissingArgument {
        command,
        what: "line number",
    })?;
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidNumber {
            text: text.to_string(),
        }),
    }
}
