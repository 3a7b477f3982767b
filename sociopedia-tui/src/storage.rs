use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Synchronous string key-value capability backing client-side caches
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Durable store: one JSON object on disk holding every key.
///
/// Writes go through a temporary file and a rename so a crash never leaves a
/// half-written file behind.
#[derive(Debug)]
pub struct FileKeyValueStore {
    file_path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.file_path.exists() {
            return Ok(BTreeMap::new());
        }

        let json = fs::read_to_string(&self.file_path)
            .context("Failed to read local storage file")?;

        match serde_json::from_str(&json) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                log::warn!(
                    "Local storage file {} is corrupted, starting empty: {}",
                    self.file_path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).context("Failed to create local storage directory")?;
        }

        let json = serde_json::to_string_pretty(entries)
            .context("Failed to serialize local storage")?;

        let temp_path = self.file_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .context("Failed to create temporary local storage file")?;
        file.write_all(json.as_bytes())
            .context("Failed to write local storage")?;
        file.sync_all()
            .context("Failed to sync local storage to disk")?;
        drop(file);

        fs::rename(&temp_path, &self.file_path)
            .context("Failed to rename temporary local storage file")?;

        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        log::debug!("Stored key '{}' in {}", key, self.file_path.display());
        Ok(())
    }
}
