//! The import engine, split into focused submodules.
//!
//! The [`RecipeImporter`] struct and its methods are organized by domain:
//! - [`ensure`] - Idempotent "make sure this provider recipe exists" import
//! - [`backfill`] - Out-of-band replacement of a recipe's steps
//! - [`rows`] - Conversion of requests and provider data into storage rows
//!
//! Search and single-recipe reads live here.

mod backfill;
mod ensure;
mod rows;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::providers::{NoOpStepSource, SearchClient, StepClient, StepSource};
use crate::types::{RecipeDetail, RecipeId, SearchPage, SearchQuery};

/// Import engine instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct RecipeImporter {
    /// Database instance for persistence
    /// Public so callers (and integration tests) can run their own queries
    pub db: Arc<Database>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Search provider client
    pub(crate) search: Arc<SearchClient>,
    /// Step-extraction provider (trait object for pluggable implementations)
    pub(crate) steps: Arc<dyn StepSource>,
}

impl RecipeImporter {
    /// Create a new importer
    ///
    /// This initializes all core components:
    /// - Validates the configuration
    /// - Opens/creates the SQLite database and runs migrations
    /// - Builds the search client
    /// - Builds the step client, or a no-op source when no credentials are set
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let db = Database::open(&config.persistence).await?;

        let steps: Arc<dyn StepSource> = if config.steps.api_keys.is_empty() {
            tracing::warn!("no step-extraction credentials configured, steps will not be fetched");
            Arc::new(NoOpStepSource)
        } else {
            Arc::new(StepClient::new(&config.steps)?)
        };

        Self::with_components(Arc::new(config), Arc::new(db), steps)
    }

    /// Assemble an importer from already-built parts
    ///
    /// Used to share a database between components or to plug in a different
    /// step source.
    pub fn with_components(
        config: Arc<Config>,
        db: Arc<Database>,
        steps: Arc<dyn StepSource>,
    ) -> Result<Self> {
        let search = Arc::new(SearchClient::new(&config.search)?);
        Ok(Self {
            db,
            config,
            search,
            steps,
        })
    }

    /// The configuration this importer runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Search the provider and return one normalized page
    pub async fn search_external(&self, query: &SearchQuery) -> Result<SearchPage> {
        self.search.search(query).await
    }

    /// A recipe with its ingredients and steps in display order
    pub async fn get_recipe(&self, recipe_id: RecipeId) -> Result<RecipeDetail> {
        let recipe = self
            .db
            .get_recipe(recipe_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("recipe {}", recipe_id)))?;
        let ingredients = self.db.list_ingredients(recipe_id).await?;
        let steps = self.db.list_steps(recipe_id).await?;

        Ok(RecipeDetail {
            recipe,
            ingredients,
            steps,
        })
    }
}
