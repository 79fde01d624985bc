//! Axum route handler for the conversational job search.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::chat::orchestrator::{job_search_chat, ChatOptions, ChatResult};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub settings: ChatOptions,
}

/// POST /api/v1/job-search/chat
///
/// Body: `{ "message": "RN jobs in Florida", "conversation_id": "optional",
/// "settings": { "perPage": 50, "defaultFilters": { "state": "FL" }, ... } }`
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResult>, AppError> {
    let message = request
        .message
        .as_deref()
        .ok_or_else(|| AppError::Validation("message is required".to_string()))?;

    let snapshot = state.filter_options.snapshot();
    let result = job_search_chat(
        &state.search,
        &snapshot,
        &state.config.collection_name,
        &state.config.conversation_model_id,
        message,
        request.conversation_id.as_deref(),
        &request.settings,
    )
    .await?;

    Ok(Json(result))
}
