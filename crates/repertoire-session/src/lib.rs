//! Recording, storing, and practicing opening lines on top of the rules core.

mod app;
mod command;
mod config;
mod editor;
mod error;
mod practice;
mod recorder;
mod repertoire;

pub use app::{App, Flow};
pub use command::{Command, parse_command};
pub use config::AppConfig;
pub use editor::{EditOutcome, EditSession};
pub use error::{CommandError, SessionError, StoreError};
pub use practice::{PracticeQueue, PracticeSession, Verdict};
pub use recorder::{LineRecorder, RecordedMove};
pub use repertoire::{FileStore, KeyValueStore, MemoryStore, Repertoire, SavedLine};
