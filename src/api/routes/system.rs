//! System handlers: health and unknown routes.

use crate::error::ApiError;
use axum::{Json, http::Uri, response::IntoResponse};
use serde_json::json;

/// GET /health - Health check
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Any unmatched route
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("route {}", uri.path()))
}
