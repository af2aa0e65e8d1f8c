//! Stored recipe handlers.

use super::SaveStepsBody;
use crate::api::AppState;
use crate::error::ApiError;
use crate::types::RecipeId;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// GET /recipes/:id - Recipe with ingredients and steps
pub async fn get_recipe(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.importer.get_recipe(RecipeId(id)).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /recipes/:id/steps/refetch - Replace steps from the step provider
///
/// Always 200 for an existing recipe; `success: false` means nothing changed.
pub async fn refetch_steps(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.importer.refetch_steps(RecipeId(id)).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PUT /recipes/:id/steps - Replace steps with caller-supplied ones
pub async fn save_steps(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<SaveStepsBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return ApiError::validation(rejection.body_text()).into_response(),
    };

    match state.importer.save_steps(RecipeId(id), &body.steps).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => e.into_response(),
    }
}
