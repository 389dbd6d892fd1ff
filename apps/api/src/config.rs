use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{LlmSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_BANNED_WORDS: &str = "дурак,идиот";

/// Application configuration loaded from environment variables.
/// Everything has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub rate_limit_requests: usize,
    pub rate_limit_window: Duration,
    /// Lowercased, trimmed, never empty strings.
    pub banned_words: Vec<String>,
    pub prompts_path: PathBuf,
    pub prompts_reload: bool,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub openai_timeout: Duration,
    pub port: u16,
    pub debug: bool,
    pub rust_log: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let prompts_path = PathBuf::from(var("PROMPTS_PATH", "prompts.json"));
        // Resolve relative to the working directory so /debug/env shows where we look.
        let prompts_path = std::path::absolute(&prompts_path).unwrap_or(prompts_path);

        Ok(Config {
            rate_limit_requests: parse_var(&var("RATE_LIMIT_REQUESTS", "50"), "RATE_LIMIT_REQUESTS")?,
            rate_limit_window: Duration::from_secs(parse_var(
                &var("RATE_LIMIT_WINDOW", "60"),
                "RATE_LIMIT_WINDOW",
            )?),
            banned_words: parse_banned_words(&var("BANNED_WORDS", DEFAULT_BANNED_WORDS)),
            prompts_path,
            prompts_reload: var("PROMPTS_RELOAD", "1").trim() == "1",
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            openai_model: var("OPENAI_MODEL", DEFAULT_MODEL),
            openai_base_url: var("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            openai_timeout: Duration::from_secs(parse_var(
                &var("OPENAI_TIMEOUT_SECS", "60"),
                "OPENAI_TIMEOUT_SECS",
            )?),
            port: parse_var(&var("PORT", "5000"), "PORT")?,
            debug: var("APP_DEBUG", "1").trim() == "1",
            rust_log: lookup("RUST_LOG"),
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.openai_api_key.clone(),
            model: self.openai_model.clone(),
            base_url: self.openai_base_url.clone(),
            timeout: self.openai_timeout,
        }
    }
}

fn parse_var<T>(value: &str, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{value}'"))
}

fn parse_banned_words(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
