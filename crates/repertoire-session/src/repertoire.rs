//! Saved lines and the key-value store they persist to.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{SessionError, StoreError};

/// A recorded opening line as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedLine {
    pub name: String,
    /// Coordinate moves (`e2-e4`).
    pub moves: Vec<String>,
    pub san: Vec<String>,
    /// Creation time in unix milliseconds.
    pub created: u64,
}

/// A durable string-to-string store.
pub trait KeyValueStore {
    /// The value under `key`, or `None` if unset.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// A store that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// A store backed by a JSON object file. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> FileStore {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        // An unreadable file is overwritten rather than blocking every save.
        let mut values = self.read_all().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "replacing unreadable store file");
            HashMap::new()
        });
        values.insert(key.to_string(), value);
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

/// The saved lines, mirrored to a [`KeyValueStore`] after every change.
pub struct Repertoire {
    store: Box<dyn KeyValueStore>,
    key: String,
    auto_name_prefix: String,
    lines: Vec<SavedLine>,
}

impl Repertoire {
    /// Load the lines stored under the configured key.
    ///
    /// Missing, unreadable, or corrupt data yields an empty repertoire.
    pub fn load(store: Box<dyn KeyValueStore>, config: &AppConfig) -> Repertoire {
        let lines = match store.get(&config.repertoire_key) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(error = %e, "stored repertoire is corrupt, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "cannot read repertoire store, starting empty");
                Vec::new()
            }
        };
        info!(lines = lines.len(), "repertoire loaded");
        Repertoire {
            store,
            key: config.repertoire_key.clone(),
            auto_name_prefix: config.auto_name_prefix.clone(),
            lines,
        }
    }

    /// Save a new line and persist.
    ///
    /// An empty or blank `name` gets the next auto name. A line whose moves
    /// are already stored is rejected.
    pub fn add(&mut self, name: Option<&str>, moves: Vec<String>, san: Vec<String>) -> Result<&SavedLine, SessionError> {
        if moves.is_empty() {
            return Err(SessionError::EmptyLine);
        }
        if self.lines.iter().any(|line| line.moves == moves) {
            return Err(SessionError::DuplicateLine);
        }

        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.auto_name(self.lines.len()),
        };
        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        self.lines.push(SavedLine { name, moves, san, created });
        if let Err(e) = persist(self.store.as_mut(), &self.key, &self.lines) {
            self.lines.pop();
            return Err(e.into());
        }

        let index = self.lines.len() - 1;
        info!(name = %self.lines[index].name, plies = self.lines[index].moves.len(), "line saved");
        Ok(&self.lines[index])
    }

    /// Remove the line at `index` and renumber auto-named lines.
    ///
    /// Deleting from an empty repertoire is a no-op returning `Ok(None)`.
    pub fn delete(&mut self, index: usize) -> Result<Option<SavedLine>, SessionError> {
        if self.lines.is_empty() {
            return Ok(None);
        }
        if index >= self.lines.len() {
            return Err(SessionError::NoSuchLine { number: index + 1 });
        }

        // Renumber a copy so a failed write leaves the repertoire as it was.
        let mut remaining = self.lines.clone();
        let removed = remaining.remove(index);
        for (i, line) in remaining.iter_mut().enumerate() {
            if self.is_auto_name(&line.name) {
                line.name = self.auto_name(i);
            }
        }
        persist(self.store.as_mut(), &self.key, &remaining)?;
        self.lines = remaining;
        info!(name = %removed.name, "line deleted");
        Ok(Some(removed))
    }

    pub fn lines(&self) -> &[SavedLine] {
        &self.lines
    }

    pub fn get(&self, index: usize) -> Option<&SavedLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Auto name for the line at zero-based `index`.
    fn auto_name(&self, index: usize) -> String {
        format!("{} {}", self.auto_name_prefix, index + 1)
    }

    /// `true` for names of the form `<prefix> <number>`.
    fn is_auto_name(&self, name: &str) -> bool {
        name.strip_prefix(self.auto_name_prefix.as_str())
            .and_then(|rest| rest.strip_prefix(' '))
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
    }
}

/// Write `lines` under `key`.
fn persist(store: &mut dyn KeyValueStore, key: &str, lines: &[SavedLine]) -> Result<(), StoreError> {
    let text = serde_json::to_string(lines)?;
    store.set(key, text)
}
