//! Two-tier result cache.
//!
//! The in-process tier holds compiled pattern sets per language and break
//! offsets per (language, folded word). Entries never expire; `clear()` is
//! the only invalidation. Word offsets are written through to an optional
//! [`ExternalCache`] that carries its own TTL, so several processes can
//! share hyphenation work. External keys carry a scope naming the settings
//! the offsets were computed with.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use textflow_core::language::LanguageCode;
use textflow_core::pattern::PatternSet;

/// A shared key/value store living outside the process (memcached, a file,
/// a CMS cache framework...).
pub trait ExternalCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, ttl: Duration);
}

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }
}

/// Break offsets of one word, in characters.
pub type Offsets = Arc<[usize]>;

type WordMap = HashMap<LanguageCode, HashMap<String, CacheEntry<Offsets>>>;

pub struct ResultCache {
    pattern_sets: RwLock<HashMap<LanguageCode, CacheEntry<Arc<PatternSet>>>>,
    words: RwLock<WordMap>,
    external: Option<Arc<dyn ExternalCache>>,
    external_ttl: Duration,
    scope: String,
}

impl ResultCache {
    pub fn new(external: Option<Arc<dyn ExternalCache>>, external_ttl: Duration) -> Self {
        Self {
            pattern_sets: RwLock::new(HashMap::new()),
            words: RwLock::new(HashMap::new()),
            external,
            external_ttl,
            scope: String::new(),
        }
    }

    /// Namespace external keys, typically with
    /// [`HyphenationSettings::cache_scope`](textflow_core::settings::HyphenationSettings::cache_scope).
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn pattern_set(&self, language: &LanguageCode) -> Option<Arc<PatternSet>> {
        self.pattern_sets
            .read()
            .get(language)
            .map(|e| Arc::clone(&e.value))
    }

    /// Last value wins; concurrent loaders produce equal sets.
    pub fn insert_pattern_set(&self, set: Arc<PatternSet>) {
        self.pattern_sets
            .write()
            .insert(set.language().clone(), CacheEntry::new(set));
    }

    /// Offsets for `folded`, checking the in-process tier first.
    ///
    /// An external hit is promoted into the in-process tier.
    pub fn word_offsets(&self, language: &LanguageCode, folded: &str) -> Option<Offsets> {
        let local = self
            .words
            .read()
            .get(language)
            .and_then(|m| m.get(folded))
            .map(|e| Arc::clone(&e.value));
        if local.is_some() {
            return local;
        }

        let external = self.external.as_ref()?;
        let raw = external.get(&self.external_key(language, folded))?;
        let Some(offsets) = decode_offsets(&raw) else {
            debug!(%language, word = folded, "ignoring malformed external cache entry");
            return None;
        };
        let offsets: Offsets = offsets.into();
        self.insert_local(language, folded, Arc::clone(&offsets));
        Some(offsets)
    }

    pub fn insert_word_offsets(
        &self,
        language: &LanguageCode,
        folded: &str,
        offsets: Vec<usize>,
    ) -> Offsets {
        if let Some(external) = &self.external {
            external.set(
                &self.external_key(language, folded),
                &encode_offsets(&offsets),
                self.external_ttl,
            );
        }
        let offsets: Offsets = offsets.into();
        self.insert_local(language, folded, Arc::clone(&offsets));
        offsets
    }

    fn external_key(&self, language: &LanguageCode, folded: &str) -> String {
        if self.scope.is_empty() {
            format!("textflow:{language}:{folded}")
        } else {
            format!("textflow:{language}:{}:{folded}", self.scope)
        }
    }

    fn insert_local(&self, language: &LanguageCode, folded: &str, offsets: Offsets) {
        self.words
            .write()
            .entry(language.clone())
            .or_default()
            .insert(folded.to_string(), CacheEntry::new(offsets));
    }

    /// Drop every in-process entry. External entries age out by TTL.
    pub fn clear(&self) {
        self.pattern_sets.write().clear();
        self.words.write().clear();
    }

    pub fn pattern_set_count(&self) -> usize {
        self.pattern_sets.read().len()
    }

    pub fn word_count(&self) -> usize {
        self.words.read().values().map(HashMap::len).sum()
    }
}

/// `"3,6"`; the empty string means "no break points".
pub(crate) fn encode_offsets(offsets: &[usize]) -> String {
    offsets
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn decode_offsets(raw: &str) -> Option<Vec<usize>> {
    if raw.is_empty() {
        return Some(Vec::new());
    }
    let offsets = raw
        .split(',')
        .map(|s| s.trim().parse().ok())
        .collect::<Option<Vec<usize>>>()?;
    offsets.windows(2).all(|w| w[0] < w[1]).then_some(offsets)
}
