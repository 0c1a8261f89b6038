//! Language resolution: explicit config, then host context, then default.

use tracing::warn;

use textflow_core::language::LanguageCode;
use textflow_core::settings::LanguageSettings;

/// Supplies the language of the content currently being rendered.
pub trait LanguageContext: Send + Sync {
    fn current_language(&self) -> Option<LanguageCode>;
}

/// Always answers the same language.
#[derive(Debug, Clone)]
pub struct FixedLanguageContext(LanguageCode);

impl FixedLanguageContext {
    pub fn new(language: impl Into<LanguageCode>) -> Self {
        Self(language.into())
    }
}

impl LanguageContext for FixedLanguageContext {
    fn current_language(&self) -> Option<LanguageCode> {
        Some(self.0.clone())
    }
}

/// Maps a numeric host language id (e.g. a site language uid) through the
/// `[language.ids]` table.
#[derive(Debug, Clone)]
pub struct MappedLanguageContext {
    id: u32,
    languages: LanguageSettings,
}

impl MappedLanguageContext {
    pub fn new(id: u32, languages: LanguageSettings) -> Self {
        Self { id, languages }
    }
}

impl LanguageContext for MappedLanguageContext {
    fn current_language(&self) -> Option<LanguageCode> {
        self.languages.code_for_id(self.id).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    Disabled,
    Language(LanguageCode),
    /// The requested code is unsupported; `language` is the default.
    Degraded {
        requested: LanguageCode,
        language: LanguageCode,
    },
}

/// Empty and `all` defer to the next source.
fn concrete(code: LanguageCode) -> Option<LanguageCode> {
    (!code.is_empty() && !code.is_all()).then_some(code)
}

pub(crate) fn resolve(
    explicit: Option<&LanguageCode>,
    context: Option<&dyn LanguageContext>,
    languages: &LanguageSettings,
) -> Resolution {
    let code = explicit
        .cloned()
        .and_then(concrete)
        .or_else(|| context.and_then(|c| c.current_language()).and_then(concrete))
        .unwrap_or_else(|| languages.default_language());

    if code.is_disabled() {
        return Resolution::Disabled;
    }
    if !languages.is_supported(&code) {
        let language = languages.default_language();
        warn!(requested = %code, fallback = %language, "unsupported language, using default");
        return Resolution::Degraded {
            requested: code,
            language,
        };
    }
    Resolution::Language(code)
}
