//! Axum route handlers for filter discovery.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::filters::vocabulary::{load_filter_options, FilterOptions};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    pub status: &'static str,
    pub filters: FilterOptions,
}

/// GET|POST /api/v1/job-search/initialize
///
/// Loads filter options from the backend and replaces the process-wide
/// cache with the fresh snapshot.
pub async fn handle_initialize(
    State(state): State<AppState>,
) -> Result<Json<InitializeResponse>, AppError> {
    let options = load_filter_options(&state.search, &state.config.collection_name).await?;
    state.filter_options.replace(options.clone());

    Ok(Json(InitializeResponse {
        status: "ok",
        filters: options,
    }))
}

/// GET /api/v1/job-search/filters
///
/// Returns the cached filter options for UI dropdowns. No network call;
/// empty until initialize has succeeded at least once.
pub async fn handle_get_filters(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(state.filter_options.snapshot().as_ref().clone())
}
