/// LLM Client: the single point of entry for all chat-completion calls in hrify.
///
/// No other module talks to the OpenAI API directly. Handlers receive an
/// `Arc<dyn TextGenerator>` from `AppState`, which is this client in production
/// and a canned generator in tests.
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-5-mini";
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Rate limit or quota exceeded: {0}")]
    RateLimited(String),

    #[error("Model '{model}' is unavailable: {message}")]
    ModelUnavailable { model: String, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(e)
        }
    }
}

/// Something that turns a system instruction plus user text into a reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
}

/// OpenAI chat-completions client. The underlying HTTP client is built on the
/// first call and shared by every request after that.
pub struct LlmClient {
    settings: LlmSettings,
    http: OnceCell<Client>,
    retry_base: Duration,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            settings,
            http: OnceCell::new(),
            retry_base: Duration::from_secs(1),
        }
    }

    fn http(&self) -> Result<&Client, LlmError> {
        self.http.get_or_try_init(|| {
            debug!("Building LLM HTTP client (timeout {:?})", self.settings.timeout);
            Client::builder()
                .timeout(self.settings.timeout)
                .build()
                .map_err(LlmError::Http)
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    /// Sends one system + user exchange. Retries server errors and transient
    /// rate limits with exponential backoff; quota exhaustion and gateway
    /// timeouts are not retried. `complete` caps the whole loop, backoff
    /// included, at the configured timeout.
    async fn call(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey)?;
        let http = self.http()?;

        let request_body = ChatRequest {
            model: &self.settings.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                // 1x, 2x the base delay
                let delay = self.retry_base * (1 << (attempt - 1));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = http
                .post(self.endpoint())
                .bearer_auth(api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if e.is_connect() => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let (error, retryable) = self.classify_response(status, &body);
                if retryable {
                    warn!("LLM API returned {}: {}", status, body);
                    last_error = Some(error);
                    continue;
                }
                return Err(error);
            }

            let body = response.text().await?;
            let chat: ChatResponse = serde_json::from_str(&body)?;

            if let Some(usage) = &chat.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            let text = chat
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .map(|t| t.trim().to_string())
                .unwrap_or_default();

            if text.is_empty() {
                return Err(LlmError::EmptyContent);
            }
            return Ok(text);
        }

        Err(last_error.unwrap_or(LlmError::Api {
            status: 0,
            message: "no attempts made".to_string(),
        }))
    }

    fn classify_response(&self, status: StatusCode, body: &str) -> (LlmError, bool) {
        let parsed = serde_json::from_str::<ApiErrorEnvelope>(body).ok();
        let (message, kind, code) = match &parsed {
            Some(envelope) => (
                envelope.error.message.as_str(),
                envelope.error.kind.as_deref(),
                envelope.error.code.as_deref(),
            ),
            None => (body, None, None),
        };

        let quota = code == Some("insufficient_quota") || kind == Some("insufficient_quota");
        let retryable = (status.is_server_error() && status != StatusCode::GATEWAY_TIMEOUT)
            || (status == StatusCode::TOO_MANY_REQUESTS && !quota);

        let error = classify(status.as_u16(), code, kind, message, &self.settings.model);
        (error, retryable)
    }
}

/// Maps an upstream failure onto `LlmError`. Structured fields (status,
/// `error.code`, `error.type`) are checked first; the message text is only
/// consulted when they say nothing specific.
pub fn classify(
    status: u16,
    code: Option<&str>,
    kind: Option<&str>,
    message: &str,
    model: &str,
) -> LlmError {
    let unavailable = || LlmError::ModelUnavailable {
        model: model.to_string(),
        message: message.to_string(),
    };

    match (status, code, kind) {
        (401, ..) | (_, Some("invalid_api_key"), _) | (_, _, Some("authentication_error")) => {
            return LlmError::Unauthorized(message.to_string())
        }
        (429, ..)
        | (_, Some("insufficient_quota" | "rate_limit_exceeded"), _)
        | (_, _, Some("insufficient_quota")) => return LlmError::RateLimited(message.to_string()),
        (_, Some("model_not_found"), _) => return unavailable(),
        (408 | 504, ..) => return LlmError::Timeout,
        _ => {}
    }

    let lowered = message.to_lowercase();
    if lowered.contains("invalid api key") || lowered.contains("authentication") {
        LlmError::Unauthorized(message.to_string())
    } else if lowered.contains("rate limit")
        || lowered.contains("quota")
        || lowered.contains("exceeded")
    {
        LlmError::RateLimited(message.to_string())
    } else if lowered.contains("model")
        && (lowered.contains("not found") || lowered.contains("does not exist"))
    {
        unavailable()
    } else if lowered.contains("timeout") || lowered.contains("timed out") {
        LlmError::Timeout
    } else {
        LlmError::Api {
            status,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        tokio::time::timeout(self.settings.timeout, self.call(system, user))
            .await
            .unwrap_or(Err(LlmError::Timeout))
    }
}
