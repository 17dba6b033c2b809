//! File-backed local cache.
//!
//! Keeps every entry in a single JSON document, each value stamped with the
//! time it was written. The file is replaced on every change by writing a
//! sibling temporary file and renaming it over the original.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::ports::{CacheError, LocalCache};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedEntry {
    value: String,
    updated_at: DateTime<Utc>,
}

type Entries = BTreeMap<String, CachedEntry>;

/// JSON file cache
#[derive(Debug)]
pub struct JsonFileCache {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When `key` was last written, if present.
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, CacheError> {
        Ok(self.load()?.get(key).map(|e| e.updated_at))
    }

    fn load(&self) -> Result<Entries, CacheError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Entries::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, entries: &Entries) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Entries)) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        f(&mut entries);
        self.store(&entries)
    }
}

impl LocalCache for JsonFileCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.load()?.remove(key).map(|e| e.value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        tracing::debug!(key, path = %self.path.display(), "Writing cache entry");
        self.update(|entries| {
            entries.insert(
                key.to_string(),
                CachedEntry {
                    value: value.to_string(),
                    updated_at: Utc::now(),
                },
            );
        })
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> JsonFileCache {
        JsonFileCache::new(dir.path().join("nested").join("cache.json"))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        assert_eq!(cache.get("theme-preference").unwrap(), None);
    }

    #[test]
    fn values_survive_a_new_instance() {
        let dir = TempDir::new().unwrap();
        cache_in(&dir).set("theme-preference", "dark").unwrap();

        let reopened = cache_in(&dir);
        assert_eq!(
            reopened.get("theme-preference").unwrap().as_deref(),
            Some("dark")
        );
        assert!(reopened.updated_at("theme-preference").unwrap().is_some());
    }

    #[test]
    fn overwrite_and_remove() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.set("k", "1").unwrap();
        cache.set("k", "2").unwrap();
        cache.set("other", "x").unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("2"));

        cache.remove("k").unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
        assert_eq!(cache.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileCache::new(&path).get("k").unwrap_err();
        assert!(matches!(err, CacheError::Serialization(_)));
    }

    #[test]
    fn interrupted_write_leaves_previous_content_readable() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.set("theme-preference", "dark").unwrap();

        // A crash mid-write only ever leaves the temporary sibling behind.
        fs::write(cache.path().with_extension("json.tmp"), "{\"theme-pref").unwrap();

        assert_eq!(
            cache.get("theme-preference").unwrap().as_deref(),
            Some("dark")
        );
        cache.set("userProfile", "{}").unwrap();
        assert_eq!(
            cache.get("theme-preference").unwrap().as_deref(),
            Some("dark")
        );
        assert!(!cache.path().with_extension("json.tmp").exists());
    }
}
