//! Persistence of profile settings.
//!
//! Writes are debounced: a save only updates memory and (re)schedules the
//! write, so callers must not assume durability until [`JsonSettingsStore::tick`]
//! fires or [`JsonSettingsStore::flush`] is called.

pub mod debounce;

pub use debounce::Debouncer;

use crate::error::{ProfileError, ProfileResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Delay between the last change and the write to disk.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_secs(2);

/// Keyed settings storage used by run profiles.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn save(&mut self, key: &str, value: Value);
}

/// Settings kept only in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySettingsStore {
    values: BTreeMap<String, Value>,
    saves: usize,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls received so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }

    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: Value) {
        self.saves += 1;
        self.values.insert(key.to_string(), value);
    }
}

/// Settings stored as a flat JSON object in a file.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
    debouncer: Debouncer,
    dirty: bool,
}

impl JsonSettingsStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> ProfileResult<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(data) if data.trim().is_empty() => BTreeMap::new(),
            Ok(data) => serde_json::from_str(&data)
                .map_err(|err| ProfileError::io("E_PROTOCOL", "failed to parse settings", err))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(ProfileError::io(
                    "E_IO",
                    "failed to read settings file",
                    err,
                ))
            }
        };
        Ok(Self {
            path,
            values,
            debouncer: Debouncer::new(DEFAULT_SAVE_DELAY),
            dirty: false,
        })
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.debouncer = Debouncer::new(delay);
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// When the pending write becomes due, if any.
    #[must_use]
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn save_at(&mut self, key: &str, value: Value, now: Instant) {
        self.values.insert(key.to_string(), value);
        self.dirty = true;
        self.debouncer.schedule(now);
        debug!(key, path = %self.path.display(), "settings write scheduled");
    }

    /// Writes pending changes if the debounce deadline has passed.
    /// Returns whether a write happened.
    pub fn tick(&mut self, now: Instant) -> ProfileResult<bool> {
        if !self.dirty || !self.debouncer.is_due(now) {
            return Ok(false);
        }
        self.write()?;
        Ok(true)
    }

    /// Writes pending changes immediately.
    pub fn flush(&mut self) -> ProfileResult<()> {
        if self.dirty {
            self.write()?;
        }
        Ok(())
    }

    fn write(&mut self) -> ProfileResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                ProfileError::io("E_IO", "failed to create settings directory", err)
            })?;
        }
        let data = serde_json::to_vec_pretty(&self.values)
            .map_err(|err| ProfileError::io("E_PROTOCOL", "failed to serialize settings", err))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)
            .map_err(|err| ProfileError::io("E_IO", "failed to write settings file", err))?;
        fs::rename(&tmp, &self.path)
            .map_err(|err| ProfileError::io("E_IO", "failed to replace settings file", err))?;
        self.dirty = false;
        self.debouncer.clear();
        debug!(path = %self.path.display(), "settings written");
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: Value) {
        self.save_at(key, value, Instant::now());
    }
}

impl Drop for JsonSettingsStore {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            warn!(path = %self.path.display(), error = %err, "failed to flush settings on shutdown");
        }
    }
}
