//! Axum route handlers for the system-prompt admin API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::model_admin::lifecycle::{get_model, upsert_model};
use crate::model_admin::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::search_client::ConversationModel;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GetModelResponse {
    pub status: &'static str,
    pub model: ConversationModel,
    pub default_prompt: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePromptRequest {
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub use_default: bool,
}

#[derive(Debug, Serialize)]
pub struct UpdatePromptResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub model: ConversationModel,
    /// False when the model was created but never became visible within the
    /// verification window.
    pub verified: bool,
}

/// GET /api/v1/system-prompt
///
/// Returns the current conversation model plus the built-in default prompt
/// for the settings form.
pub async fn handle_get_prompt(
    State(state): State<AppState>,
) -> Result<Json<GetModelResponse>, AppError> {
    let model = get_model(&state.search, &state.config.conversation_model_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Model not found. It may need to be created first.".to_string())
        })?;

    Ok(Json(GetModelResponse {
        status: "ok",
        model,
        default_prompt: DEFAULT_SYSTEM_PROMPT,
    }))
}

/// POST /api/v1/system-prompt
///
/// Body: `{ "system_prompt": "...", "use_default": false }`.
/// Replaces the conversation model with one carrying the chosen prompt.
pub async fn handle_update_prompt(
    State(state): State<AppState>,
    Json(request): Json<UpdatePromptRequest>,
) -> Result<Json<UpdatePromptResponse>, AppError> {
    let system_prompt = if request.use_default {
        DEFAULT_SYSTEM_PROMPT
    } else {
        match request.system_prompt.as_deref() {
            Some(prompt) if !prompt.trim().is_empty() => prompt,
            _ => {
                return Err(AppError::Validation(
                    "system_prompt is required, or set use_default to true".to_string(),
                ))
            }
        }
    };

    let report = upsert_model(
        &state.search,
        &state.config.conversation_model_id,
        &state.config.openai_api_key,
        system_prompt,
    )
    .await?;

    Ok(Json(UpdatePromptResponse {
        status: "ok",
        message: "System prompt updated successfully",
        model: report.model,
        verified: report.verified,
    }))
}
