//! Durable preference store - dismissal flags that survive restarts
//!
//! The gate only ever needs booleans, so the contract is deliberately narrow:
//! `get_bool` cannot fail (unreadable storage reads as the default) and
//! `set_bool` has flushed to durable storage by the time it returns.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::warn;

/// Durable key-value storage for dismissal flags.
///
/// `set_bool` must not return before the value is safe against a process
/// crash; callers rely on that to avoid re-prompting after a crash that loses
/// only in-memory state.
pub trait PreferenceStore: Send + Sync {
    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn set_bool(&self, key: &str, value: bool) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PrefEntry {
    value: bool,
    updated_at: DateTime<Utc>,
}

/// File-backed store: a single JSON map, rewritten atomically on every set.
///
/// Writes take an exclusive lock on the live file, land in a temp file that is
/// synced to disk, and replace the live file with a rename. Readers never
/// lock; the rename guarantees they see either the old or the new map.
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user config directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("compat-notify")
            .join("prefs.json")
    }

    fn load(&self) -> HashMap<String, PrefEntry> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&content) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable preference file, treating as empty");
                HashMap::new()
            }
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.load().get(key).map(|e| e.value).unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        use fs2::FileExt;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        // The lock handle is the live file itself; writers serialize on it
        // while readers go through the atomic rename below.
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        lock_file.lock_exclusive()?;

        let result = (|| -> Result<()> {
            let mut map = self.load();
            map.insert(
                key.to_string(),
                PrefEntry {
                    value,
                    updated_at: Utc::now(),
                },
            );

            let temp_path = self.path.with_extension("tmp");
            {
                let mut temp_file = File::create(&temp_path)?;
                temp_file.write_all(serde_json::to_string(&map)?.as_bytes())?;
                // Flushed before the caller is acknowledged.
                temp_file.sync_all()?;
            }
            fs::rename(&temp_path, &self.path)?;
            Ok(())
        })();

        lock_file.unlock()?;
        result
    }
}

/// In-memory store for tests and embedders that keep their own durable layer.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, bool>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FilePreferenceStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        (dir, store)
    }

    #[test]
    fn test_get_bool_missing_file_returns_default() {
        let (_dir, store) = temp_store();
        assert!(!store.get_bool("power_exemption_prompt_dismissed", false));
        assert!(store.get_bool("power_exemption_prompt_dismissed", true));
    }

    #[test]
    fn test_set_then_get() {
        let (_dir, store) = temp_store();
        store.set_bool("dismissed", true).unwrap();
        assert!(store.get_bool("dismissed", false));

        store.set_bool("dismissed", false).unwrap();
        assert!(!store.get_bool("dismissed", true));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = FilePreferenceStore::new(&path);
        store.set_bool("dismissed", true).unwrap();
        drop(store);

        // Fresh instance over the same file simulates a process restart.
        let reopened = FilePreferenceStore::new(&path);
        assert!(reopened.get_bool("dismissed", false));
    }

    #[test]
    fn test_set_preserves_other_keys() {
        let (_dir, store) = temp_store();
        store.set_bool("a", true).unwrap();
        store.set_bool("b", false).unwrap();
        assert!(store.get_bool("a", false));
        assert!(!store.get_bool("b", true));
    }

    #[test]
    fn test_garbage_file_reads_as_empty() {
        let (_dir, store) = temp_store();
        fs::write(&store.path, "not json").unwrap();
        assert!(!store.get_bool("dismissed", false));

        // And a set over garbage recovers the file.
        store.set_bool("dismissed", true).unwrap();
        assert!(store.get_bool("dismissed", false));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryPreferenceStore::new();
        assert!(!store.get_bool("k", false));
        store.set_bool("k", true).unwrap();
        assert!(store.get_bool("k", false));
    }
}
