//! Supported languages: the one list the router, the translator and the
//! prompt fallback all read from.
//!
//! Adding a language means adding a variant here, a detector mapping in
//! `detector.rs`, a column in `i18n::tr`, and an entry in `prompts.json`.

use std::fmt;

pub mod detector;
pub mod router;

pub use detector::{LanguageDetector, WhatlangDetector};
pub use router::pick_language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Ru,
    En,
    Es,
}

impl Language {
    /// Primary, secondary, tertiary. Prompt lookups fall back in this order.
    pub const ALL: [Language; 3] = [Language::Ru, Language::En, Language::Es];

    pub const DEFAULT: Language = Language::Ru;

    pub fn code(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
            Language::Es => "es",
        }
    }

    /// Exact match on a normalized code (`"EN "` → `En`, `"en-US"` → `None`).
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_lowercase();
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Prefix match, used for UI locales such as `"es-MX"` or `"english"`.
    pub fn from_prefix(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_lowercase();
        Self::ALL.into_iter().find(|l| tag.starts_with(l.code()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of best-effort detection on user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedLanguage {
    Known(Language),
    /// Detection failed, was unreliable, or found an unsupported language.
    Unknown,
}

impl DetectedLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            DetectedLanguage::Known(lang) => lang.code(),
            DetectedLanguage::Unknown => "unknown",
        }
    }
}
