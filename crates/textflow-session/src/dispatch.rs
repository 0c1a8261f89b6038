use std::borrow::Cow;

use tracing::{debug, debug_span};

use textflow_core::hyphenator::{break_points, insert_markers};
use textflow_core::markup::{apply_preserving_structure, MarkupError};
use textflow_core::pattern::PatternSet;
use textflow_core::tokenizer::{map_words, TokenizeMode};
use textflow_core::unicode::fold_word;

use super::cache::Offsets;
use super::HyphenationSession;

impl HyphenationSession {
    /// Whole string through the tokenizer. `<...>` spans and character
    /// references are still split off so inline markup is never hyphenated.
    pub(super) fn run_flat(&self, text: &str, patterns: &PatternSet, marker: &str) -> String {
        let _span = debug_span!("run_flat").entered();
        map_words(text, TokenizeMode::Markup, |word| {
            self.hyphenate_word(word, patterns, marker)
        })
    }

    /// Only the text regions of `markup` go through the tokenizer.
    pub(super) fn run_structured(
        &self,
        markup: &str,
        patterns: &PatternSet,
        marker: &str,
    ) -> Result<String, MarkupError> {
        let _span = debug_span!("run_structured").entered();
        apply_preserving_structure(markup, |region| {
            map_words(region, TokenizeMode::Plain, |word| {
                self.hyphenate_word(word, patterns, marker)
            })
        })
    }

    fn hyphenate_word<'a>(&self, word: &'a str, patterns: &PatternSet, marker: &str) -> Cow<'a, str> {
        let offsets = self.word_offsets(word, patterns);
        if offsets.is_empty() {
            Cow::Borrowed(word)
        } else {
            Cow::Owned(insert_markers(word, &offsets, marker))
        }
    }

    /// Break offsets for `word`, from the word cache or a fresh scan.
    ///
    /// Words under the length floor are answered without touching the cache.
    pub(super) fn word_offsets(&self, word: &str, patterns: &PatternSet) -> Offsets {
        if word.chars().count() < self.settings.hyphenation.min_word_length {
            return Offsets::from([]);
        }
        let language = patterns.language();
        let folded = fold_word(word);
        if let Some(offsets) = self.cache.word_offsets(language, &folded) {
            self.counters.cache_hit();
            return offsets;
        }

        self.counters.scan();
        let offsets = break_points(word, patterns, &self.settings.hyphenation);
        debug!(word = folded.as_str(), ?offsets, "scanned");
        self.cache.insert_word_offsets(language, &folded, offsets)
    }
}
