//! Hyphenation session: the public entry point of the engine.
//!
//! `HyphenationSession` resolves the language for a call, loads the pattern
//! set through the result cache, and dispatches to either the flat word
//! pipeline or the structure-preserving markup walker. It never fails: any
//! degraded path returns the input unchanged and records why on the
//! [`HyphenationOutcome`].

mod cache;
mod dispatch;
mod language;
mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, debug_span, warn};

use textflow_core::config::HyphenationConfig;
use textflow_core::language::LanguageCode;
use textflow_core::pattern::{PatternSet, PatternStore};
use textflow_core::settings::Settings;

pub use cache::{CacheEntry, ExternalCache, Offsets, ResultCache};
pub use language::{FixedLanguageContext, LanguageContext, MappedLanguageContext};
pub use textflow_core::config::DebugLevel;
pub use types::{HyphenationError, HyphenationOutcome, HyphenationStatus, SessionStats};

use language::Resolution;
use types::Counters;

/// Thread-safe hyphenation service. Share it behind an `Arc`.
pub struct HyphenationSession {
    store: Arc<dyn PatternStore>,
    context: Option<Arc<dyn LanguageContext>>,
    cache: ResultCache,
    settings: Settings,
    counters: Counters,
}

/// Wires the collaborators of a [`HyphenationSession`].
pub struct SessionBuilder {
    store: Arc<dyn PatternStore>,
    context: Option<Arc<dyn LanguageContext>>,
    external: Option<Arc<dyn ExternalCache>>,
    settings: Option<Settings>,
}

impl SessionBuilder {
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self {
            store,
            context: None,
            external: None,
            settings: None,
        }
    }

    pub fn language_context(mut self, context: Arc<dyn LanguageContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn external_cache(mut self, cache: Arc<dyn ExternalCache>) -> Self {
        self.external = Some(cache);
        self
    }

    /// Defaults to the process-wide `settings()`.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn build(self) -> HyphenationSession {
        let settings = self.settings.unwrap_or_default();
        let ttl = Duration::from_secs(settings.cache.external_ttl_secs);
        HyphenationSession {
            store: self.store,
            context: self.context,
            cache: ResultCache::new(self.external, ttl)
                .with_scope(settings.hyphenation.cache_scope()),
            settings,
            counters: Counters::default(),
        }
    }
}

impl HyphenationSession {
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        SessionBuilder::new(store).build()
    }

    pub fn builder(store: Arc<dyn PatternStore>) -> SessionBuilder {
        SessionBuilder::new(store)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Hyphenate `text`. Always returns a string; degraded paths return the
    /// input unchanged.
    pub fn hyphenate(&self, text: &str, config: &HyphenationConfig) -> String {
        self.hyphenate_with_outcome(text, config).text
    }

    /// Like [`hyphenate`](Self::hyphenate), also reporting the path taken.
    pub fn hyphenate_with_outcome(
        &self,
        text: &str,
        config: &HyphenationConfig,
    ) -> HyphenationOutcome {
        let _span = debug_span!(
            "hyphenate",
            len = text.len(),
            preserve = config.preserve_structure,
            level = ?config.debug,
        )
        .entered();

        if text.is_empty() || !config.enabled {
            debug!("disabled");
            return HyphenationOutcome::unchanged(text, HyphenationStatus::Disabled);
        }

        let mut errors = Vec::new();
        let language = match self.resolve(config) {
            Resolution::Disabled => {
                debug!("language none");
                return HyphenationOutcome::unchanged(text, HyphenationStatus::Disabled);
            }
            Resolution::Language(language) => language,
            Resolution::Degraded {
                requested,
                language,
            } => {
                errors.push(HyphenationError::ConfigInvalid {
                    language: requested,
                });
                language
            }
        };

        let patterns = match self.load_patterns(&language) {
            Ok(patterns) => patterns,
            Err(e) => {
                warn!(error = %e, "passing text through");
                errors.push(e);
                return HyphenationOutcome {
                    text: text.to_string(),
                    status: HyphenationStatus::PatternsUnavailable,
                    language: Some(language),
                    errors,
                };
            }
        };

        let marker = self.settings.markers.for_level(config.debug);
        let (text, status) = if config.preserve_structure {
            match self.run_structured(text, &patterns, marker) {
                Ok(out) => (out, HyphenationStatus::Hyphenated),
                Err(e) => {
                    warn!(error = %e, "markup walk failed, passing text through");
                    errors.push(e.into());
                    (text.to_string(), HyphenationStatus::MarkupParseFailure)
                }
            }
        } else {
            (
                self.run_flat(text, &patterns, marker),
                HyphenationStatus::Hyphenated,
            )
        };

        HyphenationOutcome {
            text,
            status,
            language: Some(language),
            errors,
        }
    }

    /// Break offsets of a single word under `config`'s language, for
    /// diagnostics. Goes through the word cache like a regular call.
    pub fn break_points(
        &self,
        word: &str,
        config: &HyphenationConfig,
    ) -> Result<Vec<usize>, HyphenationError> {
        let language = match self.resolve(config) {
            Resolution::Disabled => return Ok(Vec::new()),
            Resolution::Language(language) | Resolution::Degraded { language, .. } => language,
        };
        let patterns = self.load_patterns(&language)?;
        Ok(self.word_offsets(word, &patterns).to_vec())
    }

    /// Language a call with `config` would use; `None` when disabled.
    pub fn resolve_language(&self, config: &HyphenationConfig) -> Option<LanguageCode> {
        match self.resolve(config) {
            Resolution::Disabled => None,
            Resolution::Language(language) | Resolution::Degraded { language, .. } => {
                Some(language)
            }
        }
    }

    fn resolve(&self, config: &HyphenationConfig) -> Resolution {
        language::resolve(
            config.language.as_ref(),
            self.context.as_deref(),
            &self.settings.language,
        )
    }

    /// Cached pattern set for `language`, loading it from the store on a miss.
    ///
    /// Empty sets are cached like any other; store errors are not, so the
    /// next call retries.
    pub fn load_patterns(
        &self,
        language: &LanguageCode,
    ) -> Result<Arc<PatternSet>, HyphenationError> {
        let set = match self.cache.pattern_set(language) {
            Some(set) => set,
            None => {
                let _span = debug_span!("load_patterns", %language).entered();
                self.counters.load();
                let patterns = self
                    .store
                    .find_patterns_for_language(language)
                    .map_err(|e| {
                        warn!(%language, error = %e, "pattern store failed");
                        HyphenationError::PatternsUnavailable {
                            language: language.clone(),
                        }
                    })?;
                let set = Arc::new(PatternSet::new(language.clone(), patterns));
                debug!(
                    patterns = set.len(),
                    distinct = set.distinct_count(),
                    "pattern set compiled"
                );
                self.cache.insert_pattern_set(Arc::clone(&set));
                set
            }
        };
        if set.is_empty() {
            return Err(HyphenationError::PatternsUnavailable {
                language: language.clone(),
            });
        }
        Ok(set)
    }

    pub fn stats(&self) -> SessionStats {
        self.counters.snapshot()
    }

    pub fn reset_stats(&self) {
        self.counters.reset();
    }

    /// Flush the in-process caches, e.g. after patterns changed.
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("caches cleared");
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}
