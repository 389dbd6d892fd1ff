//! Fixtures shared by handler and pipeline tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::config::Config;
use crate::language::{DetectedLanguage, LanguageDetector};
use crate::llm_client::{LlmError, TextGenerator};
use crate::state::AppState;

/// Templates are named `<lang>-<scenario>` so tests can see which one was used.
pub const PROMPTS_RU_EN_ES: &str = r#"{
    "ru": {"reject": "ru-reject", "hire": "ru-hire", "remind": "ru-remind"},
    "en": {"reject": "en-reject", "hire": "en-hire", "remind": "en-remind"},
    "es": {"reject": "es-reject", "hire": "es-hire", "remind": "es-remind"}
}"#;

pub struct FixedDetector(pub DetectedLanguage);

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> DetectedLanguage {
        self.0
    }
}

type Reply = Box<dyn Fn() -> Result<String, LlmError> + Send + Sync>;

/// Canned `TextGenerator` that records every (system, user) pair it receives.
pub struct StubGenerator {
    reply: Reply,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Arc::new(Self {
            reply: Box::new(move || Ok(text.clone())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: fn() -> LlmError) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(move || Err(error())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    fn model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        (self.reply)()
    }
}

pub struct Fixture {
    pub state: AppState,
    /// Holds the prompts file alive for the duration of the test.
    pub dir: TempDir,
}

impl Fixture {
    pub fn prompts_path(&self) -> std::path::PathBuf {
        self.dir.path().join("prompts.json")
    }
}

pub fn state_with(
    prompts: &str,
    detected: DetectedLanguage,
    llm: Arc<StubGenerator>,
    banned_words: &[&str],
) -> Fixture {
    fixture(prompts, detected, llm, banned_words, 50)
}

pub fn fixture(
    prompts: &str,
    detected: DetectedLanguage,
    llm: Arc<StubGenerator>,
    banned_words: &[&str],
    rate_limit: usize,
) -> Fixture {
    fixture_with_detector(
        prompts,
        Arc::new(FixedDetector(detected)),
        llm,
        banned_words,
        rate_limit,
    )
}

pub fn fixture_with_detector(
    prompts: &str,
    detector: Arc<dyn LanguageDetector>,
    llm: Arc<StubGenerator>,
    banned_words: &[&str],
    rate_limit: usize,
) -> Fixture {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prompts.json");
    std::fs::write(&path, prompts).unwrap();

    let vars: HashMap<&str, String> = HashMap::from([
        ("PROMPTS_PATH", path.display().to_string()),
        ("BANNED_WORDS", banned_words.join(",")),
        ("RATE_LIMIT_REQUESTS", rate_limit.to_string()),
        ("OPENAI_API_KEY", "sk-test".to_string()),
    ]);
    let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

    let state = AppState::new(config, detector, llm);
    Fixture { state, dir }
}
