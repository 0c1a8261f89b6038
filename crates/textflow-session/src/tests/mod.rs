mod basic;
mod markup;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use textflow_core::language::LanguageCode;
use textflow_core::pattern::{MemoryPatternStore, Pattern, PatternStore, StoreError};
use textflow_core::settings::{parse_settings_toml, Settings, DEFAULT_SETTINGS_TOML};

use super::{ExternalCache, HyphenationSession};

pub(super) const GERMAN: &[&str] = &["kon", "fig", "ent", "wick", "lung", "bei", "spiel", "text"];
pub(super) const ENGLISH: &[&str] = &["hy", "phen", "ation"];

pub(super) fn test_settings() -> Settings {
    parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap()
}

pub(super) fn make_test_store() -> Arc<MemoryPatternStore> {
    let mut store = MemoryPatternStore::with_language("de", GERMAN);
    store.extend(ENGLISH.iter().map(|t| Pattern::new("en", *t)));
    Arc::new(store)
}

pub(super) fn make_session() -> HyphenationSession {
    session_with(make_test_store())
}

pub(super) fn session_with(store: Arc<dyn PatternStore>) -> HyphenationSession {
    HyphenationSession::builder(store)
        .settings(test_settings())
        .build()
}

/// Always fails, like a database that is down.
pub(super) struct FailingStore;

impl PatternStore for FailingStore {
    fn find_patterns_for_language(
        &self,
        _language: &LanguageCode,
    ) -> Result<Vec<Pattern>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// In-memory stand-in for a shared cache backend.
#[derive(Default)]
pub(super) struct MapCache {
    pub(super) entries: Mutex<HashMap<String, (String, Duration)>>,
}

impl ExternalCache for MapCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).map(|(v, _)| v.clone())
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        self.entries
            .lock()
            .insert(key.to_string(), (value.to_string(), ttl));
    }
}
