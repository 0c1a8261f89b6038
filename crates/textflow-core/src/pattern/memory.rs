use std::collections::BTreeMap;

use crate::language::LanguageCode;

use super::{Pattern, PatternStore, StoreError};

/// In-memory pattern store keyed by language.
///
/// Patterns filed under the `all` language are appended to every lookup.
///
/// Used by tests, the CLI (after parsing a pattern file), and hosts that
/// preload their pattern table once at startup.
#[derive(Debug, Default, Clone)]
pub struct MemoryPatternStore {
    by_language: BTreeMap<LanguageCode, Vec<Pattern>>,
}

impl MemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        let mut store = Self::new();
        store.extend(patterns);
        store
    }

    /// Convenience constructor for a single language.
    pub fn with_language(language: &str, texts: &[&str]) -> Self {
        Self::from_patterns(texts.iter().map(|t| Pattern::new(language, *t)))
    }

    pub fn insert(&mut self, pattern: Pattern) {
        self.by_language
            .entry(pattern.language.clone())
            .or_default()
            .push(pattern);
    }

    pub fn extend(&mut self, patterns: impl IntoIterator<Item = Pattern>) {
        for p in patterns {
            self.insert(p);
        }
    }

    /// Total number of patterns across all languages.
    pub fn len(&self) -> usize {
        self.by_language.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_language.is_empty()
    }

    /// `(language, pattern_count)` pairs, sorted by language.
    pub fn stats(&self) -> Vec<(LanguageCode, usize)> {
        self.by_language
            .iter()
            .map(|(lang, patterns)| (lang.clone(), patterns.len()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.by_language.values().flatten()
    }
}

impl PatternStore for MemoryPatternStore {
    fn find_patterns_for_language(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<Pattern>, StoreError> {
        let mut patterns = self.by_language.get(language).cloned().unwrap_or_default();
        if !language.is_all() {
            if let Some(shared) = self.by_language.get(&LanguageCode::all()) {
                patterns.extend(shared.iter().cloned());
            }
        }
        Ok(patterns)
    }

    fn languages(&self) -> Vec<LanguageCode> {
        self.by_language.keys().cloned().collect()
    }
}
