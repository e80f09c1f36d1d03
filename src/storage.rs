use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, warn};

use crate::error::TaskError;
use crate::models::{Profile, Task};

pub const TASKS_KEY: &str = "tasks";
pub const PROFILE_KEY: &str = "profile";
pub const AVATAR_KEY: &str = "avatarUri";
pub const DARK_MODE_KEY: &str = "darkMode";

/// Flat string key-value persistence, the only thing the core needs from
/// the device.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, TaskError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), TaskError>;
    fn remove(&mut self, key: &str) -> Result<(), TaskError>;
}

/// Returns the data directory.
///
/// The path is determined in the following order:
/// 1. `QARA_DATA_DIR` environment variable.
/// 2. `~/.local/share/qara` (on Linux).
/// 3. `./qara` (fallback).
pub fn data_dir() -> PathBuf {
    std::env::var("QARA_DATA_DIR").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("qara");
        p
    })
}

/// Stores each key as `<dir>/<key>.json`, overwritten whole on every write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, TaskError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!("FileStore::open: dir={}", dir.display());
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, TaskError> {
        let path = self.path_for(key);
        let mut f = match OpenOptions::new().read(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        Ok(Some(s))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TaskError> {
        let path = self.path_for(key);
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        f.write_all(value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), TaskError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, TaskError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TaskError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), TaskError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Reads and writes the task collection as one unit, plus the independent
/// profile and preference keys.
///
/// Last write wins. There is no merge and no batching across keys.
#[derive(Debug, Clone)]
pub struct TaskStore<S> {
    store: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(store: S) -> Self {
        TaskStore { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Loads the saved collection, failing if the stored JSON is malformed.
    ///
    /// A missing key is an empty collection, not an error.
    pub fn try_load(&self) -> Result<Vec<Task>, TaskError> {
        match self.store.get(TASKS_KEY)? {
            Some(s) => Ok(serde_json::from_str(&s)?),
            None => Ok(Vec::new()),
        }
    }

    /// Loads the saved collection.
    ///
    /// Returns an empty vector if nothing is stored or it cannot be read;
    /// the failure is logged as a warning.
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(tasks) => {
                debug!("TaskStore::load: count={}", tasks.len());
                tasks
            }
            Err(e) => {
                warn!("TaskStore::load: treating stored tasks as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Saves the given collection, replacing any prior value.
    pub fn save(&mut self, tasks: &[Task]) -> Result<(), TaskError> {
        let s = serde_json::to_string(tasks)?;
        self.store.set(TASKS_KEY, &s).inspect_err(|e| {
            error!("TaskStore::save: write failed: {}", e);
        })?;
        debug!("TaskStore::save: count={}", tasks.len());
        Ok(())
    }

    /// Deletes the stored collection.
    pub fn clear(&mut self) -> Result<(), TaskError> {
        self.store.remove(TASKS_KEY)
    }

    /// Loads the profile, falling back to the default one.
    pub fn profile(&self) -> Profile {
        match self.store.get(PROFILE_KEY) {
            Ok(Some(s)) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!("TaskStore::profile: malformed profile: {}", e);
                Profile::default()
            }),
            Ok(None) => Profile::default(),
            Err(e) => {
                warn!("TaskStore::profile: read failed: {}", e);
                Profile::default()
            }
        }
    }

    pub fn save_profile(&mut self, profile: &Profile) -> Result<(), TaskError> {
        let s = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &s)
    }

    /// Reads the avatar reference. Values written as a bare string are
    /// returned as-is.
    pub fn avatar_uri(&self) -> Result<Option<String>, TaskError> {
        Ok(self
            .store
            .get(AVATAR_KEY)?
            .map(|s| serde_json::from_str(&s).unwrap_or(s)))
    }

    pub fn set_avatar_uri(&mut self, uri: &str) -> Result<(), TaskError> {
        let s = serde_json::to_string(uri)?;
        self.store.set(AVATAR_KEY, &s)
    }

    /// Reads the dark mode flag. Anything other than `"true"` is off.
    pub fn dark_mode(&self) -> Result<bool, TaskError> {
        Ok(self.store.get(DARK_MODE_KEY)?.as_deref() == Some("true"))
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<(), TaskError> {
        self.store.set(DARK_MODE_KEY, if enabled { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tasks_key_is_empty() {
        let store = TaskStore::new(MemoryStore::new());
        assert!(store.try_load().unwrap().is_empty());
    }

    #[test]
    fn test_dark_mode_reads_only_true() {
        let mut store = TaskStore::new(MemoryStore::new());
        store.inner_mut().set(DARK_MODE_KEY, "yes").unwrap();
        assert!(!store.dark_mode().unwrap());
        store.set_dark_mode(true).unwrap();
        assert_eq!(store.inner().get(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));
    }
}
