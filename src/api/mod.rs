//! REST API server module
//!
//! Exposes search, import, single-recipe reads and step backfill over HTTP.
//! Authentication and the rest of the application's record management live
//! in front of this server.

use crate::{Config, RecipeImporter, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post, put},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Provider recipes
/// - `GET /public-recipes` - Search the provider (query string filters)
/// - `POST /public-recipes/import` - Import a provider recipe (201 when created)
///
/// ## Recipes
/// - `GET /recipes/:id` - Recipe with ingredients and steps
/// - `POST /recipes/:id/steps/refetch` - Replace steps from the step provider
/// - `PUT /recipes/:id/steps` - Replace steps with caller-supplied ones
///
/// ## System
/// - `GET /health` - Health check
pub fn create_router(importer: Arc<RecipeImporter>, config: Arc<Config>) -> Router {
    let state = AppState::new(importer, config.clone());

    let router = Router::new()
        // Provider recipes
        .route("/public-recipes", get(routes::search_public_recipes))
        .route("/public-recipes/import", post(routes::import_public_recipe))
        // Recipes
        .route("/recipes/:id", get(routes::get_recipe))
        .route("/recipes/:id/steps/refetch", post(routes::refetch_steps))
        .route("/recipes/:id/steps", put(routes::save_steps))
        // System
        .route("/health", get(routes::health_check))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.api.cors_enabled {
        let cors = build_cors_layer(&config.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` or an empty list allows any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Serves until SIGTERM/SIGINT (Ctrl+C elsewhere) is received, then lets
/// in-flight requests finish.
///
/// # Example
///
/// ```no_run
/// use recipe_import::{Config, RecipeImporter};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::from_env());
/// let importer = Arc::new(RecipeImporter::new((*config).clone()).await?);
///
/// // Blocks until shutdown
/// recipe_import::api::start_api_server(importer, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(importer: Arc<RecipeImporter>, config: Arc<Config>) -> Result<()> {
    serve_until(importer, config, crate::shutdown_signal()).await
}

/// Start the API server and stop it once `shutdown` completes.
pub async fn serve_until<F>(
    importer: Arc<RecipeImporter>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = config.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(importer, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %listener.local_addr().unwrap_or(bind_address),
        "API server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
