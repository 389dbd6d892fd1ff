//! The `/process` pipeline.
//!
//! Received → RateChecked → Validated → LanguageResolved → PromptResolved →
//! Generated → Responded. Any step can bail out with an `AppError`, which the
//! handler localizes.

use std::fmt;

use tracing::debug;

use crate::errors::AppError;
use crate::generation::validation::validate_input;
use crate::language::{pick_language, Language};
use crate::prompts::Scenario;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    RateChecked,
    Validated,
    LanguageResolved,
    PromptResolved,
    Generated,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One inbound request, already pulled out of the HTTP layer.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub text: String,
    pub scenario: String,
    pub ui_lang: String,
    pub client_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub text: String,
    pub language: Language,
    pub scenario: Scenario,
}

pub async fn run(state: &AppState, request: &GenerationRequest) -> Result<GenerationOutcome, AppError> {
    if !state.rate_limiter.check_and_record(&request.client_id) {
        return Err(AppError::RateLimited);
    }
    debug!(stage = %Stage::RateChecked, client = %request.client_id);

    let input = validate_input(&request.text, &request.scenario, &state.config.banned_words)?;
    debug!(stage = %Stage::Validated, scenario = %input.scenario);

    let detected = state.detector.detect(&input.text);
    let language = pick_language(detected, &request.ui_lang);
    debug!(
        stage = %Stage::LanguageResolved,
        detected = detected.as_str(),
        ui_lang = %request.ui_lang,
        language = %language
    );

    let system_prompt = state.prompts.get(language.code(), input.scenario)?;
    debug!(stage = %Stage::PromptResolved, prompt_chars = system_prompt.chars().count());

    let reply = state.llm.complete(&system_prompt, &input.text).await?;
    let text = reply.trim();
    if text.is_empty() {
        return Err(AppError::GenerationFailure(
            "Empty response from model".to_string(),
        ));
    }
    debug!(stage = %Stage::Generated, model = state.llm.model(), chars = text.chars().count());

    Ok(GenerationOutcome {
        text: text.to_string(),
        language,
        scenario: input.scenario,
    })
}
