//! Provider search and import handlers.

use super::ImportRecipeBody;
use crate::api::AppState;
use crate::error::ApiError;
use crate::types::SearchQuery;
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// GET /public-recipes - Search the provider
///
/// Query string: `q`, `mealType`, `cuisineType`, `dishType`, `health`, `diet`,
/// `page`, `pageSize`.
pub async fn search_public_recipes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    match state.importer.search_external(&query).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "provider search failed");
            e.into_response()
        }
    }
}

/// POST /public-recipes/import - Import a provider recipe
///
/// Responds 201 with the recipe when this call created it, 200 when it
/// already existed.
pub async fn import_public_recipe(
    State(state): State<AppState>,
    body: Result<Json<ImportRecipeBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return ApiError::validation(rejection.body_text()).into_response(),
    };

    match state
        .importer
        .ensure_recipe(&body.recipe, body.owner_id)
        .await
    {
        Ok(outcome) => {
            let status = if outcome.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(outcome)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
