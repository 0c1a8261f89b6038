//! Pattern files on disk as a [`PatternStore`].

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::debug;

use textflow_core::language::LanguageCode;
use textflow_core::pattern::source::{parse_pattern_list, parse_sql_dump};
use textflow_core::pattern::{Pattern, PatternStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PatternFormat {
    /// `.sql` extension or an `INSERT` statement means SQL, anything else a list.
    #[default]
    Auto,
    /// One pattern per line, optionally prefixed by its language.
    List,
    /// `INSERT INTO ... VALUES` dump.
    Sql,
}

impl PatternFormat {
    /// Resolve `Auto` for a concrete file.
    pub fn detect(self, path: &Path, content: &str) -> PatternFormat {
        match self {
            PatternFormat::Auto => {
                let is_sql_ext = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"));
                let has_insert = content
                    .lines()
                    .map(str::trim_start)
                    .any(|l| l.get(..6).is_some_and(|kw| kw.eq_ignore_ascii_case("insert")));
                if is_sql_ext || has_insert {
                    PatternFormat::Sql
                } else {
                    PatternFormat::List
                }
            }
            other => other,
        }
    }
}

/// Parse `content` in `format`. `default_language` applies to list lines that
/// carry no language of their own.
pub fn parse_patterns(
    content: &str,
    format: PatternFormat,
    path: &Path,
    default_language: Option<&LanguageCode>,
) -> Result<Vec<Pattern>, StoreError> {
    let patterns = match format.detect(path, content) {
        PatternFormat::Sql => parse_sql_dump(content)?,
        PatternFormat::List | PatternFormat::Auto => parse_pattern_list(content, default_language)?,
    };
    Ok(patterns)
}

/// A pattern file, re-read on every lookup.
///
/// The session caches compiled sets, so the file is read once per language.
#[derive(Debug, Clone)]
pub struct FilePatternStore {
    path: PathBuf,
    format: PatternFormat,
    default_language: Option<LanguageCode>,
}

impl FilePatternStore {
    pub fn new(path: impl Into<PathBuf>, format: PatternFormat) -> Self {
        Self {
            path: path.into(),
            format,
            default_language: None,
        }
    }

    pub fn with_default_language(mut self, language: impl Into<LanguageCode>) -> Self {
        self.default_language = Some(language.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Pattern>, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        let patterns = parse_patterns(
            &content,
            self.format,
            &self.path,
            self.default_language.as_ref(),
        )?;
        debug!(path = %self.path.display(), count = patterns.len(), "pattern file parsed");
        Ok(patterns)
    }
}

impl PatternStore for FilePatternStore {
    fn find_patterns_for_language(
        &self,
        language: &LanguageCode,
    ) -> Result<Vec<Pattern>, StoreError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|p| &p.language == language)
            .collect())
    }

    fn languages(&self) -> Vec<LanguageCode> {
        let Ok(patterns) = self.load() else {
            return Vec::new();
        };
        let languages: BTreeSet<LanguageCode> = patterns.into_iter().map(|p| p.language).collect();
        languages.into_iter().collect()
    }
}

/// Render patterns as a `language pattern` list, sorted and deduplicated.
pub fn format_pattern_list(patterns: &[Pattern]) -> String {
    let unique: BTreeSet<(&str, &str)> = patterns
        .iter()
        .map(|p| (p.language.as_str(), p.text.trim()))
        .filter(|(_, text)| !text.is_empty())
        .collect();
    let mut out = String::new();
    for (language, text) in unique {
        out.push_str(language);
        out.push(' ');
        out.push_str(text);
        out.push('\n');
    }
    out
}
