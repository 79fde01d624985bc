pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat_handlers;
use crate::filters::handlers as filter_handlers;
use crate::model_admin::handlers as model_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(health::health_handler).post(health::health_handler),
        )
        // Job search API
        .route(
            "/api/v1/job-search/initialize",
            get(filter_handlers::handle_initialize).post(filter_handlers::handle_initialize),
        )
        .route(
            "/api/v1/job-search/filters",
            get(filter_handlers::handle_get_filters),
        )
        .route("/api/v1/job-search/chat", post(chat_handlers::handle_chat))
        // System prompt admin API
        .route(
            "/api/v1/system-prompt",
            get(model_handlers::handle_get_prompt).post(model_handlers::handle_update_prompt),
        )
        .with_state(state)
}
