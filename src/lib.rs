//! # recipe-import
//!
//! Import, deduplication and step enrichment engine for third-party recipes.
//!
//! ## Design Philosophy
//!
//! recipe-import is designed to be:
//! - **Idempotent** - Importing the same provider recipe twice, or from many
//!   tasks at once, always lands on one stored recipe
//! - **Degrading, not failing** - Step enrichment problems leave a recipe
//!   without steps instead of failing its import
//! - **Library-first** - The REST surface is optional; everything is reachable
//!   through [`RecipeImporter`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use recipe_import::{Config, RecipeImporter, SearchQuery, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider credentials come from EDAMAM_APP_ID, EDAMAM_APP_KEY and
//!     // SPOONACULAR_API_KEYS
//!     let importer = RecipeImporter::new(Config::from_env()).await?;
//!
//!     let page = importer
//!         .search_external(&SearchQuery {
//!             q: Some("chicken".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     if let Some(hit) = page.items.first() {
//!         let outcome = importer.ensure_recipe(&hit.recipe, UserId(1)).await?;
//!         println!("recipe {} (created: {})", outcome.recipe.id, outcome.created);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Error types
pub mod error;
/// Import engine (decomposed into focused submodules)
pub mod importer;
/// Provider payload normalization
pub mod normalize;
/// Search and step-extraction provider clients
pub mod providers;
/// Retry logic with exponential backoff
pub mod retry;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{Config, PersistenceConfig, RetryConfig, SearchConfig, StepsConfig};
pub use db::Database;
pub use error::{ApiError, DatabaseError, Error, ErrorDetail, ProviderError, Result, ToHttpStatus};
pub use importer::RecipeImporter;
pub use providers::{CredentialPool, NoOpStepSource, SearchClient, StepClient, StepSource};
pub use types::{
    Difficulty, EnsureOutcome, ExternalRecipe, FetchedStep, ImportIngredient, ImportRequest,
    ImportStep, RecipeDetail, RecipeId, SearchPage, SearchQuery, Source, SourceKey, StepsOutcome,
    UserId,
};

/// Wait for a termination signal.
///
/// Used by [`api::start_api_server`] for graceful shutdown; embedders running
/// their own server can await it the same way.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

/// Wait for a termination signal (Ctrl+C on this platform).
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
