use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use campus_core::constants::{MAX_UPGRADE_LEVEL, STARTING_MONEY};
use campus_core::types::BuildingId;

use crate::economy::BuildingState;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save storage error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode save data: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("save record is not a JSON object")]
    Corrupt,
    #[error("save storage unavailable")]
    Unavailable,
}

/// The single persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub money: f64,
    pub students: u32,
    /// Written for readers of the file; recomputed from `buildings` on load.
    pub sustainability: u32,
    pub buildings: BTreeMap<BuildingId, BuildingState>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            money: STARTING_MONEY,
            students: 0,
            sustainability: 0,
            buildings: BTreeMap::new(),
            timestamp: 0,
        }
    }
}

impl SaveData {
    /// Best-effort read: every missing or malformed field falls back to its
    /// session default instead of failing the whole record.
    pub fn from_json_value(value: &Value) -> Result<Self, PersistenceError> {
        let Some(object) = value.as_object() else {
            return Err(PersistenceError::Corrupt);
        };
        let defaults = SaveData::default();

        let money = object
            .get("money")
            .and_then(Value::as_f64)
            .filter(|money| money.is_finite() && *money >= 0.0)
            .unwrap_or(defaults.money);
        let students = object
            .get("students")
            .and_then(lenient_u64)
            .map(|n| n.min(u64::from(u32::MAX)) as u32)
            .unwrap_or(defaults.students);
        let sustainability = object
            .get("sustainability")
            .and_then(lenient_u64)
            .map(|n| n.min(100) as u32)
            .unwrap_or(defaults.sustainability);
        let timestamp = object
            .get("timestamp")
            .and_then(Value::as_u64)
            .unwrap_or(defaults.timestamp);

        let buildings = object
            .get("buildings")
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(id, state)| {
                        lenient_building(state).map(|state| (BuildingId::new(id.as_str()), state))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            money,
            students,
            sustainability,
            buildings,
            timestamp,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, PersistenceError> {
        let value: Value = serde_json::from_str(json).map_err(|_| PersistenceError::Corrupt)?;
        Self::from_json_value(&value)
    }
}

/// Accepts integers and non-negative floats (floored).
fn lenient_u64(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(|n| n.floor() as u64)
    })
}

fn lenient_level(value: Option<&Value>) -> u8 {
    value
        .and_then(lenient_u64)
        .map(|n| n.min(u64::from(MAX_UPGRADE_LEVEL)) as u8)
        .unwrap_or(0)
}

fn lenient_building(value: &Value) -> Option<BuildingState> {
    let object = value.as_object()?;
    Some(BuildingState {
        unlocked: object
            .get("unlocked")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        course_level: lenient_level(object.get("course_level")),
        infra_level: lenient_level(object.get("infra_level")),
        sustain_level: lenient_level(object.get("sustain_level")),
    })
}

pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Storage for the single save record. A missing record is `Ok(None)`, not
/// an error.
pub trait SaveStore {
    fn save(&mut self, data: &SaveData) -> Result<(), PersistenceError>;
    fn load(&self) -> Result<Option<SaveData>, PersistenceError>;
    fn has_save(&self) -> bool;
    fn clear(&mut self) -> Result<(), PersistenceError>;
}

/// JSON file at `<dir>/<slot>.json`.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    dir: PathBuf,
    slot: String,
}

impl FileSaveStore {
    pub fn new(dir: impl Into<PathBuf>, slot: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            slot: slot.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        save_path(&self.dir, &self.slot)
    }
}

fn save_path(dir: &Path, slot: &str) -> PathBuf {
    dir.join(format!("{slot}.json"))
}

fn io_error(path: &Path, source: io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SaveStore for FileSaveStore {
    fn save(&mut self, data: &SaveData) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.path();
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))?;
        debug!(target: "sim.persistence", path = %path.display(), "save written");
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveData>, PersistenceError> {
        let path = self.path();
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, e)),
        };
        SaveData::from_json_str(&json).map(Some)
    }

    fn has_save(&self) -> bool {
        self.path().is_file()
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(&path).map_err(|e| io_error(&path, e))?;
        }
        Ok(())
    }
}

/// In-process store. Holds the record as JSON text so loads go through the
/// same lenient parser as files.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    record: Option<String>,
    /// When set, every write fails with `Unavailable`.
    pub fail_writes: bool,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemorySaveStore {
    fn save(&mut self, data: &SaveData) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Unavailable);
        }
        self.record = Some(serde_json::to_string(data)?);
        Ok(())
    }

    fn load(&self) -> Result<Option<SaveData>, PersistenceError> {
        self.record
            .as_deref()
            .map(SaveData::from_json_str)
            .transpose()
    }

    fn has_save(&self) -> bool {
        self.record.is_some()
    }

    fn clear(&mut self) -> Result<(), PersistenceError> {
        self.record = None;
        Ok(())
    }
}

/// Periodic save. Failure is logged and reported as "not saved"; the next
/// periodic attempt is the retry.
pub fn autosave(store: &mut dyn SaveStore, data: &SaveData) -> bool {
    match store.save(data) {
        Ok(()) => {
            info!(target: "sim.persistence", money = data.money, students = data.students, "autosaved");
            true
        }
        Err(error) => {
            warn!(target: "sim.persistence", %error, "autosave failed");
            false
        }
    }
}
