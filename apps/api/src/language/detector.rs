//! Best-effort language detection on submitted text.
//!
//! `AppState` holds an `Arc<dyn LanguageDetector>`; most tests swap in a
//! fixed detector so routing tests do not depend on statistical detection.

use tracing::trace;
use whatlang::Lang;

use super::{DetectedLanguage, Language};

pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> DetectedLanguage;
}

/// Trigram detector backed by `whatlang`, restricted to the supported
/// languages so close neighbours (Portuguese for Spanish, Ukrainian for
/// Russian) cannot win.
///
/// Short or ambiguous input still comes back unreliable and is reported as
/// `Unknown`, which hands the decision to the UI preference.
pub struct WhatlangDetector {
    inner: whatlang::Detector,
}

impl WhatlangDetector {
    pub fn new() -> Self {
        let allowlist = Language::ALL.into_iter().map(to_whatlang).collect();
        Self {
            inner: whatlang::Detector::with_allowlist(allowlist),
        }
    }
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn to_whatlang(language: Language) -> Lang {
    match language {
        Language::Ru => Lang::Rus,
        Language::En => Lang::Eng,
        Language::Es => Lang::Spa,
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> DetectedLanguage {
        let Some(info) = self.inner.detect(text) else {
            return DetectedLanguage::Unknown;
        };

        trace!(
            lang = %info.lang().code(),
            confidence = info.confidence(),
            reliable = info.is_reliable(),
            "whatlang detection"
        );

        if !info.is_reliable() {
            return DetectedLanguage::Unknown;
        }

        Language::ALL
            .into_iter()
            .find(|l| to_whatlang(*l) == info.lang())
            .map_or(DetectedLanguage::Unknown, DetectedLanguage::Known)
    }
}
