//! # Local Store
//!
//! String key-value store mirroring part of the session.
//!
//! ## Keys
//! - `nova-theme`: `dark` | `light`
//! - `nova-fingerprint-verified`: `1` | `0`
//! - `nova-face-verified`: `1` | `0`
//! - `nova-voted`: `1` | `0`
//! - `nova-choice`: raw candidate id, removed when nothing is selected
//!
//! Read once at startup, written after every state change. No schema
//! versioning: anything unrecognised falls back to the default.
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use bank::candidates::Roster;
use tracing::{debug, warn};

use crate::{
    error::BallotError,
    state::{AuthFlags, SessionState, Theme},
};

pub const THEME_KEY: &str = "nova-theme";
pub const FINGERPRINT_KEY: &str = "nova-fingerprint-verified";
pub const FACE_KEY: &str = "nova-face-verified";
pub const VOTED_KEY: &str = "nova-voted";
pub const CHOICE_KEY: &str = "nova-choice";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), BallotError>;

    fn remove(&mut self, key: &str) -> Result<(), BallotError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BallotError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BallotError> {
        self.values.remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BallotError> {
        let path = path.as_ref().to_path_buf();

        let values = match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!("Ignoring malformed store {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), BallotError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BallotError> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }

        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), BallotError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }

        Ok(())
    }
}

/// What survives a restart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersistedRecord {
    pub theme: Option<Theme>,
    pub auth: AuthFlags,
    pub has_voted: bool,
    pub choice: Option<String>,
}

impl PersistedRecord {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, roster: &Roster) -> Self {
        let flag = |key: &str| store.get(key).as_deref() == Some("1");

        let choice = store.get(CHOICE_KEY).filter(|id| {
            let known = roster.contains(id);
            if !known {
                debug!("Discarding persisted choice {id}");
            }
            known
        });

        Self {
            theme: store.get(THEME_KEY).and_then(|theme| theme.parse().ok()),
            auth: AuthFlags {
                fingerprint: flag(FINGERPRINT_KEY),
                face: flag(FACE_KEY),
            },
            has_voted: flag(VOTED_KEY),
            choice,
        }
    }
}

fn bit(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

pub fn save_session<S: KeyValueStore + ?Sized>(
    store: &mut S,
    state: &SessionState,
) -> Result<(), BallotError> {
    store.set(FINGERPRINT_KEY, bit(state.auth.fingerprint))?;
    store.set(FACE_KEY, bit(state.auth.face))?;
    store.set(VOTED_KEY, bit(state.user.has_voted()))?;

    match &state.user.selected {
        Some(id) => store.set(CHOICE_KEY, id),
        None => store.remove(CHOICE_KEY),
    }
}

pub fn save_theme<S: KeyValueStore + ?Sized>(store: &mut S, theme: Theme) -> Result<(), BallotError> {
    store.set(THEME_KEY, theme.as_str())
}
