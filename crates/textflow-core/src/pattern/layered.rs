use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::warn;

use crate::language::LanguageCode;

use super::{Pattern, PatternStore, StoreError};

/// A store that merges patterns from multiple layers.
///
/// Layers are queried in order and their patterns concatenated (e.g. shipped
/// patterns followed by site-specific additions). Any failing layer fails
/// the whole lookup, so callers never cache a set missing a layer.
pub struct LayeredPatternStore {
    layers: Vec<Arc<dyn PatternStore>>,
}

impl LayeredPatternStore {
    pub fn new(layers: Vec<Arc<dyn PatternStore>>) -> Self {
        Self { layers }
    }
}

impl PatternStore for LayeredPatternStore {
    fn find_patterns_for_language(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<Pattern>, StoreError> {
        let mut all = Vec::new();
        for (i, layer) in self.layers.iter().enumerate() {
            let patterns = layer.find_patterns_for_language(language).map_err(|e| {
                warn!(layer = i, %language, error = %e, "pattern layer failed");
                e
            })?;
            all.extend(patterns);
        }
        Ok(all)
    }

    fn languages(&self) -> Vec<LanguageCode> {
        let merged: BTreeSet<LanguageCode> =
            self.layers.iter().flat_map(|l| l.languages()).collect();
        merged.into_iter().collect()
    }
}
