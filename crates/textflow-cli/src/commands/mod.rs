pub mod config_ops;
pub mod hyphenate_ops;
pub mod pattern_ops;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use textflow_core::pattern::{LayeredPatternStore, PatternStore, StoreError};
use textflow_core::settings::{parse_settings_toml, Settings, SettingsError};
use textflow_session::{HyphenationError, HyphenationSession, SessionBuilder};

use crate::json_cache::{CacheFileError, JsonFileCache};
use crate::pattern_file::{FilePatternStore, PatternFormat};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("patterns: {0}")]
    Store(#[from] StoreError),

    #[error("cache: {0}")]
    Cache(#[from] CacheFileError),

    #[error("{0}")]
    Hyphenation(#[from] HyphenationError),

    #[error("no pattern file given")]
    NoPatterns,
}

/// Where a command gets its patterns, settings and cache from.
#[derive(Debug, Clone, Default)]
pub struct SessionSource {
    pub patterns: Vec<PathBuf>,
    pub format: PatternFormat,
    /// Language for list lines without one.
    pub default_language: Option<String>,
    pub settings: Option<PathBuf>,
    pub cache: Option<PathBuf>,
}

pub struct CliSession {
    pub session: HyphenationSession,
    pub cache: Option<Arc<JsonFileCache>>,
}

impl CliSession {
    /// Persist the external cache, if one is attached.
    pub fn flush(&self) -> Result<(), CacheFileError> {
        match &self.cache {
            Some(cache) => cache.flush(),
            None => Ok(()),
        }
    }
}

/// Settings from `path`, or the embedded defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(parse_settings_toml(&content)?)
        }
        None => Ok(Settings::default()),
    }
}

fn pattern_store(source: &SessionSource) -> Result<Arc<dyn PatternStore>, CliError> {
    let mut files: Vec<Arc<dyn PatternStore>> = source
        .patterns
        .iter()
        .map(|path| {
            let mut store = FilePatternStore::new(path, source.format);
            if let Some(lang) = &source.default_language {
                store = store.with_default_language(lang.as_str());
            }
            Arc::new(store) as Arc<dyn PatternStore>
        })
        .collect();
    match files.len() {
        0 => Err(CliError::NoPatterns),
        1 => Ok(files.remove(0)),
        _ => Ok(Arc::new(LayeredPatternStore::new(files))),
    }
}

pub fn open_session(source: &SessionSource) -> Result<CliSession, CliError> {
    let settings = load_settings(source.settings.as_deref())?;
    let mut builder = SessionBuilder::new(pattern_store(source)?).settings(settings);
    let cache = match &source.cache {
        Some(path) => {
            let cache = Arc::new(JsonFileCache::open(path)?);
            builder = builder.external_cache(cache.clone());
            Some(cache)
        }
        None => None,
    };
    Ok(CliSession {
        session: builder.build(),
        cache,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;

    pub(crate) const SQL: &str = "INSERT INTO tx_textflow_domain_model_pattern \
        (pid, language, pattern) VALUES \
        (0, 'de', 'kon'), (0, 'de', 'fig'), (0, 'de', 'ent'), (0, 'de', 'wick'), \
        (0, 'de', 'lung'), (0, 'en', 'hy'), (0, 'en', 'phen');\n";

    pub(crate) fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }
}
