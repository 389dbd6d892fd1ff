//! User-facing message localization.

use crate::language::Language;

/// Picks the variant matching `ui_lang` by prefix (`"es-MX"` → Spanish).
/// Unrecognized or empty UI languages get the primary (Russian) variant.
///
/// Generic so that both static strings and formatted messages go through it.
pub fn tr<T>(ui_lang: &str, ru: T, en: T, es: T) -> T {
    match Language::from_prefix(ui_lang).unwrap_or(Language::DEFAULT) {
        Language::Ru => ru,
        Language::En => en,
        Language::Es => es,
    }
}
