//! Engine settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! Sessions take their own `Settings` value, so the singleton is only the
//! default a host gets when it does not pass one explicitly.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::config::DebugLevel;
use crate::language::{LanguageCode, ALL, NONE};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub hyphenation: HyphenationSettings,
    pub markers: MarkerSettings,
    pub cache: CacheSettings,
    pub language: LanguageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        settings().clone()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HyphenationSettings {
    pub min_word_length: usize,
    pub min_left_chars: usize,
    pub min_right_chars: usize,
    pub boundary_marker: char,
}

impl HyphenationSettings {
    /// Tag for every setting that changes break offsets, e.g. `5-2-2-5f`.
    ///
    /// Shared cache keys carry it so offsets computed under one set of
    /// margins are never replayed under another.
    pub fn cache_scope(&self) -> String {
        format!(
            "{}-{}-{}-{:x}",
            self.min_word_length,
            self.min_left_chars,
            self.min_right_chars,
            u32::from(self.boundary_marker)
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkerSettings {
    pub soft: String,
    pub text: String,
    pub obvious: String,
}

impl MarkerSettings {
    /// Marker string inserted at each break point for `level`.
    pub fn for_level(&self, level: DebugLevel) -> &str {
        match level {
            DebugLevel::Off => &self.soft,
            DebugLevel::TextMarker => &self.text,
            DebugLevel::ObviousMarker => &self.obvious,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub external_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageSettings {
    pub default: String,
    #[serde(default)]
    pub supported: Vec<String>,
    #[serde(default)]
    ids: HashMap<String, String>,
    /// Parsed id map: host language id → code.
    #[serde(skip)]
    ids_parsed: Vec<(u32, LanguageCode)>,
}

impl LanguageSettings {
    pub fn default_language(&self) -> LanguageCode {
        LanguageCode::new(&self.default)
    }

    /// Whether `code` may be used for pattern lookup. An empty list accepts all.
    pub fn is_supported(&self, code: &LanguageCode) -> bool {
        self.supported.is_empty()
            || self
                .supported
                .iter()
                .any(|s| s.eq_ignore_ascii_case(code.as_str()))
    }

    /// Map a host language id (e.g. a site language uid) to its code.
    pub fn code_for_id(&self, id: u32) -> Option<&LanguageCode> {
        self.ids_parsed
            .iter()
            .find_map(|(i, code)| (*i == id).then_some(code))
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    s.language.ids_parsed = parse_ids(&s.language.ids)?;
    Ok(s)
}

fn parse_ids(raw: &HashMap<String, String>) -> Result<Vec<(u32, LanguageCode)>, SettingsError> {
    let mut result = Vec::with_capacity(raw.len());
    for (id_str, code) in raw {
        let id: u32 = id_str.parse().map_err(|_| SettingsError::InvalidValue {
            field: format!("language.ids.{id_str}"),
            reason: "language id must be a u32 integer".to_string(),
        })?;
        let code = LanguageCode::new(code);
        if code.is_empty() || code.is_sentinel() {
            return Err(SettingsError::InvalidValue {
                field: format!("language.ids.{id_str}"),
                reason: "must name a concrete language".to_string(),
            });
        }
        result.push((id, code));
    }
    result.sort_by_key(|(id, _)| *id);
    Ok(result)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }

    check_positive!(hyphenation.min_word_length);
    check_positive!(hyphenation.min_left_chars);
    check_positive!(hyphenation.min_right_chars);
    if s.hyphenation.boundary_marker.is_alphabetic()
        || s.hyphenation.boundary_marker.is_whitespace()
    {
        return Err(SettingsError::InvalidValue {
            field: "hyphenation.boundary_marker".to_string(),
            reason: "must not be a letter or whitespace".to_string(),
        });
    }

    check_non_empty!(markers.soft);
    check_non_empty!(markers.text);
    check_non_empty!(markers.obvious);

    check_positive!(cache.external_ttl_secs);

    let default = LanguageCode::new(&s.language.default);
    if default.is_empty() || default.as_str() == ALL || default.as_str() == NONE {
        return Err(SettingsError::InvalidValue {
            field: "language.default".to_string(),
            reason: "must name a concrete language".to_string(),
        });
    }
    if !s.language.is_supported(&default) {
        return Err(SettingsError::InvalidValue {
            field: "language.default".to_string(),
            reason: "must be listed in language.supported".to_string(),
        });
    }

    Ok(())
}
