//! Language codes and the two sentinel values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// "Resolve from context."
pub const ALL: &str = "all";
/// "Hyphenation disabled."
pub const NONE: &str = "none";

/// Short language identifier such as `de` or `en`.
///
/// Always stored trimmed and ASCII-lower-cased so that `"DE "` and `"de"`
/// address the same pattern set and cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_ascii_lowercase())
    }

    pub fn all() -> Self {
        Self(ALL.to_string())
    }

    pub fn none() -> Self {
        Self(NONE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_all(&self) -> bool {
        self.0 == ALL
    }

    pub fn is_disabled(&self) -> bool {
        self.0 == NONE
    }

    /// `all` or `none`: never valid for a pattern lookup.
    pub fn is_sentinel(&self) -> bool {
        self.is_all() || self.is_disabled()
    }
}

impl From<String> for LanguageCode {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for LanguageCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
