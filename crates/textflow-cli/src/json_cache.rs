//! A JSON file acting as the shared external cache tier.
//!
//! Entries carry an absolute expiry (unix seconds). Expired entries are
//! dropped on open and ignored on lookup. Writes stay in memory until
//! [`JsonFileCache::flush`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use textflow_session::ExternalCache;

#[derive(Debug, thiserror::Error)]
pub enum CacheFileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid cache file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    value: String,
    expires_at: u64,
}

pub struct JsonFileCache {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, StoredEntry>>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl JsonFileCache {
    /// Open `path`; a missing file is an empty cache.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheFileError> {
        let path = path.into();
        let mut entries: BTreeMap<String, StoredEntry> = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        let now = now_secs();
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        debug!(
            path = %path.display(),
            loaded = entries.len(),
            expired = before - entries.len(),
            "cache file opened"
        );
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Write all live entries back to disk (via a temp file and rename).
    pub fn flush(&self) -> Result<(), CacheFileError> {
        let json = {
            let entries = self.entries.lock();
            serde_json::to_string_pretty(&*entries)?
        };
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ExternalCache for JsonFileCache {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        (entry.expires_at > now_secs()).then(|| entry.value.clone())
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        let entry = StoredEntry {
            value: value.to_string(),
            expires_at: now_secs().saturating_add(ttl.as_secs()),
        };
        self.entries.lock().insert(key.to_string(), entry);
    }
}
