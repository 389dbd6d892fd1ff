pub mod debug;
pub mod health;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index_page))
        .route("/why", get(pages::why_page))
        .route("/health", get(health::health_handler))
        // Diagnostics (unauthenticated; keep behind the deployment's network boundary)
        .route("/debug/env", get(debug::debug_env))
        .route("/debug/prompts", get(debug::debug_prompts))
        .route("/process", post(handlers::handle_process))
        .with_state(state)
}
