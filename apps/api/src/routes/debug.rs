//! Operational diagnostics. Never exposes API keys or template text.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /debug/env
pub async fn debug_env(State(state): State<AppState>) -> Json<Value> {
    let status = state.prompts.status();

    Json(json!({
        "ok": true,
        "openai_api_key_present": state.config.openai_api_key.is_some(),
        "model": state.llm.model(),
        "prompts_path": status.path,
        "prompts_loaded": status.loaded,
        "prompts_mtime": status.modified_at,
    }))
}

/// GET /debug/prompts
///
/// Triggers the same lazy reload as `/process`, but reports a failed reload
/// instead of hiding it behind the cached table.
pub async fn debug_prompts(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.prompts.summary() {
        Ok(summary) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "languages": summary.languages,
                "scenarios_by_lang": summary.scenarios_by_lang,
            })),
        ),
        Err(e) => {
            warn!("Prompts summary failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": e.to_string() })),
            )
        }
    }
}
