//! Per-call hyphenation configuration.
//!
//! Debug rendering is a field of the config rather than process-wide state,
//! so concurrent calls with different debug levels never interfere.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::language::LanguageCode;

/// How break points are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugLevel {
    /// Invisible soft hyphen.
    #[default]
    Off,
    /// Visible, unobtrusive marker.
    TextMarker,
    /// Visible, hard-to-miss marker.
    ObviousMarker,
}

impl DebugLevel {
    /// Numeric levels as used by host debug switches (`0`, `1`, `2+`).
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => DebugLevel::Off,
            1 => DebugLevel::TextMarker,
            _ => DebugLevel::ObviousMarker,
        }
    }

    pub fn is_on(self) -> bool {
        self != DebugLevel::Off
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown debug level: {0:?}")]
pub struct ParseDebugLevelError(String);

impl FromStr for DebugLevel {
    type Err = ParseDebugLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "off" | "false" | "no" => Ok(DebugLevel::Off),
            "text" | "text_marker" | "on" | "true" | "yes" => Ok(DebugLevel::TextMarker),
            "obvious" | "obvious_marker" => Ok(DebugLevel::ObviousMarker),
            other => other
                .parse::<u8>()
                .map(DebugLevel::from_level)
                .map_err(|_| ParseDebugLevelError(s.to_string())),
        }
    }
}

/// Supplied per call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyphenationConfig {
    pub enabled: bool,
    /// Explicit language. `None`, empty, or `all` resolve from context.
    pub language: Option<LanguageCode>,
    pub preserve_structure: bool,
    pub debug: DebugLevel,
}

impl Default for HyphenationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: None,
            preserve_structure: false,
            debug: DebugLevel::Off,
        }
    }
}

impl HyphenationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<LanguageCode>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn preserving_structure(mut self, preserve: bool) -> Self {
        self.preserve_structure = preserve;
        self
    }

    pub fn with_debug(mut self, debug: DebugLevel) -> Self {
        self.debug = debug;
        self
    }

    /// Build a config from content-record style fields.
    ///
    /// Recognized keys: `enable_textflow` (`none` disables, `all` or empty
    /// resolves from context, anything else is the language), `enable`,
    /// `preserveStructure` / `preserve_structure`, and `debug`. Unknown keys
    /// are ignored; unparsable debug values fall back to `Off`.
    pub fn from_record<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut config = Self::default();
        for (key, value) in fields {
            match key {
                "enable_textflow" => {
                    let code = LanguageCode::new(value);
                    if code.is_disabled() {
                        config.enabled = false;
                    } else if !code.is_empty() && !code.is_all() {
                        config.language = Some(code);
                    }
                }
                "enable" => {
                    if !is_truthy(value) {
                        config.enabled = false;
                    }
                }
                "preserveStructure" | "preserve_structure" => {
                    config.preserve_structure = is_truthy(value);
                }
                "debug" => config.debug = value.parse().unwrap_or_default(),
                _ => {}
            }
        }
        config
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
