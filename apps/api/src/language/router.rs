use super::{DetectedLanguage, Language};

/// Chooses the template language for a request.
///
/// A supported detected language always wins; otherwise the UI preference is
/// used if it is itself a supported code; otherwise `Language::DEFAULT`.
pub fn pick_language(detected: DetectedLanguage, ui_preference: &str) -> Language {
    match detected {
        DetectedLanguage::Known(lang) => lang,
        DetectedLanguage::Unknown => {
            Language::from_code(ui_preference).unwrap_or(Language::DEFAULT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_language_beats_ui_preference() {
        let lang = pick_language(DetectedLanguage::Known(Language::Es), "ru");
        assert_eq!(lang, Language::Es);
    }

    #[test]
    fn test_unknown_detection_uses_ui_preference() {
        assert_eq!(pick_language(DetectedLanguage::Unknown, "en"), Language::En);
        assert_eq!(pick_language(DetectedLanguage::Unknown, "es"), Language::Es);
    }

    #[test]
    fn test_unsupported_ui_preference_falls_back_to_default() {
        assert_eq!(pick_language(DetectedLanguage::Unknown, "de"), Language::Ru);
        assert_eq!(pick_language(DetectedLanguage::Unknown, ""), Language::Ru);
        // Regional tags are not exact codes.
        assert_eq!(pick_language(DetectedLanguage::Unknown, "en-GB"), Language::Ru);
    }
}
