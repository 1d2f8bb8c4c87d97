//! Session, storage, and command errors.

use repertoire_core::{BoardError, PlayError};

/// Failures of the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A value could not be encoded or the backing file is not a JSON object.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },
}

/// Failures of edit and practice sessions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Edit mode can only be entered from the untouched starting position.
    #[error("edit mode can only be entered from the initial position; use reset first")]
    NotAtStart,

    /// The other mode is active.
    #[error("exit {active} mode first")]
    ModeConflict {
        /// The mode currently active.
        active: &'static str,
    },

    /// The command needs a mode that is not active.
    #[error("not in {required} mode")]
    WrongMode {
        /// The mode the command needs.
        required: &'static str,
    },

    /// Saving a line with no moves.
    #[error("no moves to save")]
    EmptyLine,

    /// Saving a line whose moves are already stored.
    #[error("this line already exists in the repertoire")]
    DuplicateLine,

    /// No saved line at the given position.
    #[error("no saved line number {number}")]
    NoSuchLine {
        /// One-based line number as the user typed it.
        number: usize,
    },

    /// The repertoire has no lines to practice.
    #[error("no saved lines; record some in edit mode first")]
    EmptyRepertoire,

    /// A stored move could not be parsed or replayed.
    #[error("saved line has an unplayable move \"{text}\"")]
    CorruptLine {
        /// The offending move text.
        text: String,
    },

    /// Real move application failed.
    #[error(transparent)]
    Play(#[from] PlayError),

    /// The position violates a structural invariant.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Persisting the repertoire failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reading commands or writing output failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// Malformed commands typed into the interactive loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// A command needs an argument that was not given.
    #[error("{command}: missing {what}")]
    MissingArgument {
        /// The command name.
        command: &'static str,
        /// What was expected.
        what: &'static str,
    },

    /// A square could not be parsed.
    #[error("invalid square: {text}")]
    InvalidSquare {
        /// The text that failed to parse.
        text: String,
    },

    /// A promotion piece letter could not be parsed.
    #[error("invalid promotion piece: {text} (expected q, r, b or n)")]
    InvalidPromotion {
        /// The text that failed to parse.
        text: String,
    },

    /// A line number could not be parsed.
    #[error("invalid line number: {text}")]
    InvalidNumber {
        /// The text that failed to parse.
        text: String,
    },

    /// A color could not be parsed.
    #[error("invalid color: {text} (expected white or black)")]
    InvalidColor {
        /// The text that failed to parse.
        text: String,
    },
}
