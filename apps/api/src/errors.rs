use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::i18n::tr;
use crate::llm_client::LlmError;
use crate::prompts::PromptError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("text is empty")]
    EmptyText,

    #[error("unknown scenario")]
    UnknownScenario,

    #[error("text contains banned words")]
    BannedContent,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("OPENAI_API_KEY is not set")]
    MissingKey,

    #[error("invalid or revoked API key: {0}")]
    InvalidKey(String),
}

/// Every way a `/process` request can fail.
///
/// Handlers pair it with the caller's UI language in `LocalizedError`, which
/// is what actually becomes the HTTP response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Prompt configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    PromptNotFound(String),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Upstream rate limit: {0}")]
    UpstreamRateLimit(String),

    #[error("Model '{model}' is unavailable: {message}")]
    ModelUnavailable { model: String, message: String },

    #[error("Upstream timeout")]
    UpstreamTimeout,

    #[error("Generation failure: {0}")]
    GenerationFailure(String),

    #[error("Upstream error: {0}")]
    UnknownUpstream(String),
}

impl From<PromptError> for AppError {
    fn from(e: PromptError) -> Self {
        match e {
            PromptError::MissingScenario { .. } => AppError::PromptNotFound(e.to_string()),
            _ => AppError::Config(e.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey => AuthError::MissingKey.into(),
            LlmError::Unauthorized(msg) => AuthError::InvalidKey(msg).into(),
            LlmError::RateLimited(msg) => AppError::UpstreamRateLimit(msg),
            LlmError::ModelUnavailable { model, message } => {
                AppError::ModelUnavailable { model, message }
            }
            LlmError::Timeout => AppError::UpstreamTimeout,
            LlmError::EmptyContent => {
                AppError::GenerationFailure("Empty response from model".to_string())
            }
            LlmError::Parse(e) => AppError::GenerationFailure(e.to_string()),
            e @ (LlmError::Api { .. } | LlmError::Http(_)) => {
                AppError::UnknownUpstream(e.to_string())
            }
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::UpstreamRateLimit(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Config(_)
            | AppError::PromptNotFound(_)
            | AppError::Auth(_)
            | AppError::ModelUnavailable { .. }
            | AppError::GenerationFailure(_)
            | AppError::UnknownUpstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the user, in their UI language.
    pub fn localized(&self, ui_lang: &str) -> String {
        let msg = match self {
            AppError::BadRequest(_) => tr(ui_lang, "Некорректный запрос.", "Bad request", "Solicitud incorrecta."),
            AppError::RateLimited => tr(
                ui_lang,
                "Слишком много запросов. Попробуйте позже.",
                "Too many requests. Please try again later.",
                "Demasiadas solicitudes. Inténtalo más tarde.",
            ),
            AppError::Validation(ValidationError::EmptyText) => {
                tr(ui_lang, "Пустой текст.", "Empty text.", "Texto vacío.")
            }
            AppError::Validation(ValidationError::UnknownScenario) => tr(
                ui_lang,
                "Неизвестный сценарий.",
                "Unknown scenario.",
                "Escenario desconocido.",
            ),
            AppError::Validation(ValidationError::BannedContent) => tr(
                ui_lang,
                "Обнаружены запрещённые слова.",
                "Banned words detected.",
                "Se detectaron palabras prohibidas.",
            ),
            AppError::Config(_) | AppError::PromptNotFound(_) => tr(
                ui_lang,
                "Ошибка загрузки промптов. Проверь prompts.json.",
                "Prompts loading error. Check prompts.json.",
                "Error al cargar los prompts. Revisa prompts.json.",
            ),
            AppError::Auth(AuthError::MissingKey) => tr(
                ui_lang,
                "Ошибка: OPENAI_API_KEY не установлен.",
                "Error: OPENAI_API_KEY is not set.",
                "Error: OPENAI_API_KEY no está configurada.",
            ),
            AppError::Auth(AuthError::InvalidKey(_)) => tr(
                ui_lang,
                "Неверный или отозванный OPENAI_API_KEY.",
                "Invalid or revoked OPENAI_API_KEY.",
                "OPENAI_API_KEY inválida o revocada.",
            ),
            AppError::UpstreamRateLimit(_) => tr(
                ui_lang,
                "Достигнут лимит на стороне OpenAI. Попробуйте позже.",
                "OpenAI rate limit reached. Please try again later.",
                "Se alcanzó el límite de OpenAI. Inténtalo más tarde.",
            ),
            AppError::ModelUnavailable { model, .. } => {
                return tr(
                    ui_lang,
                    format!("Модель '{model}' недоступна. Укажи существующую модель в OPENAI_MODEL."),
                    format!("Model '{model}' is unavailable. Set an existing model in OPENAI_MODEL."),
                    format!("El modelo '{model}' no está disponible. Configura un modelo existente en OPENAI_MODEL."),
                )
            }
            AppError::UpstreamTimeout => tr(
                ui_lang,
                "Таймаут запроса к OpenAI. Повтори попытку.",
                "Request to OpenAI timed out. Please retry.",
                "La solicitud a OpenAI agotó el tiempo. Inténtalo de nuevo.",
            ),
            AppError::GenerationFailure(_) | AppError::UnknownUpstream(_) => tr(
                ui_lang,
                "Ошибка генерации ответа. Проверь ключ, модель и логи (/debug/env).",
                "Generation failed. Check API key, model and logs (/debug/env).",
                "Error al generar la respuesta. Revisa la clave, el modelo y los registros (/debug/env).",
            ),
        };
        msg.to_string()
    }
}

/// An `AppError` bound to the UI language it should be reported in.
#[derive(Debug)]
pub struct LocalizedError {
    pub error: AppError,
    pub ui_lang: String,
}

impl LocalizedError {
    pub fn new(error: impl Into<AppError>, ui_lang: &str) -> Self {
        Self {
            error: error.into(),
            ui_lang: ui_lang.to_string(),
        }
    }
}

impl IntoResponse for LocalizedError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed ({status}): {}", self.error);
        } else {
            tracing::info!("Request rejected ({status}): {}", self.error);
        }

        let body = Json(json!({ "error": self.error.localized(&self.ui_lang) }));
        (status, body).into_response()
    }
}
