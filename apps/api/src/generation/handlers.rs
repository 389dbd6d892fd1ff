//! Axum route handler for the Generation API.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::{AppError, LocalizedError};
use crate::generation::pipeline::{self, GenerationRequest};
use crate::state::AppState;

const DEFAULT_UI_LANG: &str = "ru";
const ANONYMOUS_CLIENT: &str = "anon";

#[derive(Debug, Default, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub ui_lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub result: String,
}

/// POST /process
///
/// The body is parsed as JSON regardless of Content-Type and must be an
/// object. A literal `null` body is treated as an empty request and fails
/// validation.
pub async fn handle_process(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Result<Json<ProcessResponse>, LocalizedError> {
    let payload = match serde_json::from_slice::<Value>(&body).map_err(bad_request)? {
        Value::Null => ProcessRequest::default(),
        value @ Value::Object(_) => serde_json::from_value(value).map_err(bad_request)?,
        _ => return Err(bad_request("request body must be a JSON object")),
    };

    let ui_lang = payload
        .ui_lang
        .as_deref()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_UI_LANG.to_string());

    let request = GenerationRequest {
        text: payload.text.unwrap_or_default(),
        scenario: payload.scenario.unwrap_or_default(),
        client_id: connect_info
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string()),
        ui_lang,
    };

    let outcome = pipeline::run(&state, &request)
        .await
        .map_err(|e| LocalizedError::new(e, &request.ui_lang))?;

    info!(
        client = %request.client_id,
        language = %outcome.language,
        scenario = %outcome.scenario,
        "Generated {} chars",
        outcome.text.chars().count()
    );

    Ok(Json(ProcessResponse {
        result: outcome.text,
    }))
}

fn bad_request(reason: impl ToString) -> LocalizedError {
    LocalizedError::new(AppError::BadRequest(reason.to_string()), DEFAULT_UI_LANG)
}
