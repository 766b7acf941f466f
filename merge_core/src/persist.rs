use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{CellCoord, GeoPosition};
use crate::spawn::Token;
use crate::state::{GameState, MovementMode};

/// One overridden cell as written to the save record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverrideRecord {
    pub i: i32,
    pub j: i32,
    pub value: Option<u32>,
}

/// The persisted shape of a save slot: position, hand, every override in
/// coordinate order, and the active movement mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub lat: f64,
    pub lon: f64,
    pub held: Option<u32>,
    pub overrides: Vec<OverrideRecord>,
    #[serde(default)]
    pub mode: MovementMode,
}

impl SaveRecord {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            lat: state.position.lat,
            lon: state.position.lon,
            held: state.held.map(Token::value),
            overrides: state
                .overrides
                .sorted_entries()
                .into_iter()
                .map(|(coord, value)| OverrideRecord {
                    i: coord.i,
                    j: coord.j,
                    value: value.map(Token::value),
                })
                .collect(),
            mode: state.mode,
        }
    }

    pub fn into_state(self) -> GameState {
        GameState {
            position: GeoPosition::new(self.lat, self.lon),
            held: self.held.map(Token),
            overrides: self
                .overrides
                .into_iter()
                .map(|record| (CellCoord::new(record.i, record.j), record.value.map(Token)))
                .collect(),
            mode: self.mode,
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to read save slot {slot:?}: {source}")]
    Read {
        slot: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to write save slot {slot:?}: {source}")]
    Write {
        slot: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode save record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Client-local key-value storage for save slots.
pub trait SaveStore {
    fn read(&self, slot: &str) -> Result<Option<String>, SaveError>;
    fn write(&mut self, slot: &str, payload: &str) -> Result<(), SaveError>;
    fn clear(&mut self, slot: &str) -> Result<(), SaveError>;
}

/// One JSON file per slot under a directory.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    dir: PathBuf,
}

impl FileSaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SaveStore for FileSaveStore {
    fn read(&self, slot: &str) -> Result<Option<String>, SaveError> {
        match std::fs::read_to_string(self.slot_path(slot)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SaveError::Read {
                slot: slot.to_string(),
                source,
            }),
        }
    }

    fn write(&mut self, slot: &str, payload: &str) -> Result<(), SaveError> {
        let wrap = |source: io::Error| SaveError::Write {
            slot: slot.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(wrap)?;
        std::fs::write(self.slot_path(slot), payload).map_err(wrap)
    }

    fn clear(&mut self, slot: &str) -> Result<(), SaveError> {
        match std::fs::remove_file(self.slot_path(slot)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SaveError::Write {
                slot: slot.to_string(),
                source,
            }),
        }
    }
}

/// In-memory store for tests and headless embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    slots: HashMap<String, String>,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemorySaveStore {
    fn read(&self, slot: &str) -> Result<Option<String>, SaveError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, payload: &str) -> Result<(), SaveError> {
        self.slots.insert(slot.to_string(), payload.to_string());
        Ok(())
    }

    fn clear(&mut self, slot: &str) -> Result<(), SaveError> {
        self.slots.remove(slot);
        Ok(())
    }
}

/// Write the state to a slot. Callers treat failure as non-fatal; the
/// in-memory state stays authoritative either way.
pub fn save_game(store: &mut dyn SaveStore, slot: &str, state: &GameState) -> Result<(), SaveError> {
    let payload = serde_json::to_string(&SaveRecord::from_state(state))?;
    store.write(slot, &payload)
}

/// Restore a slot. An absent record, unreadable storage, or a malformed
/// payload all mean "no saved game": the fresh-game defaults come back and
/// the cause is logged, never raised.
pub fn load_game(store: &dyn SaveStore, slot: &str) -> GameState {
    match store.read(slot) {
        Ok(Some(payload)) => match serde_json::from_str::<SaveRecord>(&payload) {
            Ok(record) => record.into_state(),
            Err(err) => {
                tracing::warn!(
                    target: "geomerge::persist",
                    slot,
                    error = %err,
                    "save.record_malformed"
                );
                GameState::fresh()
            }
        },
        Ok(None) => GameState::fresh(),
        Err(err) => {
            tracing::warn!(
                target: "geomerge::persist",
                slot,
                error = %err,
                "save.read_failed"
            );
            GameState::fresh()
        }
    }
}
