use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use textflow_core::language::LanguageCode;
use textflow_core::markup::MarkupError;

/// Why a call degraded. Never returned from `hyphenate`; collected on the
/// outcome and logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HyphenationError {
    #[error("no hyphenation patterns available for language {language}")]
    PatternsUnavailable { language: LanguageCode },

    #[error("markup could not be parsed: {0}")]
    MarkupParseFailure(#[from] MarkupError),

    #[error("unsupported language {language}, using the default")]
    ConfigInvalid { language: LanguageCode },
}

/// Which path a call took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HyphenationStatus {
    /// Patterns were applied (the text may still contain no break point).
    Hyphenated,
    /// Empty text, `enabled == false`, or language `none`.
    Disabled,
    /// No pattern set for the language; text returned unchanged.
    PatternsUnavailable,
    /// Structure-preserving walk failed; text returned unchanged.
    MarkupParseFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyphenationOutcome {
    pub text: String,
    pub status: HyphenationStatus,
    /// Language the patterns were looked up for, if it got that far.
    pub language: Option<LanguageCode>,
    pub errors: Vec<HyphenationError>,
}

impl HyphenationOutcome {
    pub(crate) fn unchanged(text: &str, status: HyphenationStatus) -> Self {
        Self {
            text: text.to_string(),
            status,
            language: None,
            errors: Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Snapshot of a session's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Words that went through the pattern scan.
    pub pattern_scans: u64,
    /// Words answered by the word cache (either tier).
    pub word_cache_hits: u64,
    /// Calls into the pattern store.
    pub pattern_loads: u64,
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pattern_scans: AtomicU64,
    word_cache_hits: AtomicU64,
    pattern_loads: AtomicU64,
}

impl Counters {
    pub(crate) fn scan(&self) {
        self.pattern_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn cache_hit(&self) {
        self.word_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn load(&self) {
        self.pattern_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SessionStats {
        SessionStats {
            pattern_scans: self.pattern_scans.load(Ordering::Relaxed),
            word_cache_hits: self.word_cache_hits.load(Ordering::Relaxed),
            pattern_loads: self.pattern_loads.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn reset(&self) {
        self.pattern_scans.store(0, Ordering::Relaxed);
        self.word_cache_hits.store(0, Ordering::Relaxed);
        self.pattern_loads.store(0, Ordering::Relaxed);
    }
}
