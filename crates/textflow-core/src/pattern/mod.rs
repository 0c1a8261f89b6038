//! Hyphenation patterns and the stores that supply them.
//!
//! `PatternStore` is the collaborator seam: a host backs it with a database,
//! a file, or memory. `PatternSet` is the compiled, read-only form the word
//! hyphenator matches against.

mod layered;
mod memory;
mod set;
pub mod source;

pub use layered::LayeredPatternStore;
pub use memory::MemoryPatternStore;
pub use set::PatternSet;

use serde::{Deserialize, Serialize};

use crate::language::LanguageCode;

/// A short substring observed within a padded, lower-cased word form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    pub text: String,
    pub language: LanguageCode,
}

impl Pattern {
    pub fn new(language: impl Into<LanguageCode>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pattern source error: {0}")]
    Source(#[from] source::SourceError),

    #[error("pattern store unavailable: {0}")]
    Unavailable(String),
}

/// Supplies patterns for a language.
///
/// Must be safe to call repeatedly and idempotent. An empty `Vec` means
/// "no patterns known"; an `Err` means the backing storage failed.
pub trait PatternStore: Send + Sync {
    fn find_patterns_for_language(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<Pattern>, StoreError>;

    /// Languages this store can answer for, when it knows them up front.
    fn languages(&self) -> Vec<LanguageCode> {
        Vec::new()
    }
}
