//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`public_recipes`] - Provider search and import
//! - [`recipes`] - Stored recipes and their steps
//! - [`system`] - Health and fallback

use crate::types::{ImportRequest, ImportStep, UserId};
use serde::{Deserialize, Serialize};

mod public_recipes;
mod recipes;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use public_recipes::*;
pub use recipes::*;
pub use system::*;

// ============================================================================
// Request Types (shared across handlers)
// ============================================================================

/// Request body for POST /public-recipes/import
#[derive(Debug, Deserialize, Serialize)]
pub struct ImportRecipeBody {
    /// Local user who owns the imported recipe
    #[serde(alias = "ownerId")]
    pub owner_id: UserId,
    /// The provider recipe, usually an item from GET /public-recipes
    pub recipe: ImportRequest,
}

/// Request body for PUT /recipes/:id/steps
#[derive(Debug, Deserialize, Serialize)]
pub struct SaveStepsBody {
    /// Replacement steps; an empty list clears them
    pub steps: Vec<ImportStep>,
}
