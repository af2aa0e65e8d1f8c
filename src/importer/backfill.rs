//! Out-of-band step replacement for already-imported recipes.

use crate::error::{Error, Result};
use crate::types::{ImportStep, RecipeId, StepsOutcome};

use super::RecipeImporter;
use super::rows::{fetched_step_rows, request_step_rows};

impl RecipeImporter {
    /// Replace a recipe's steps with a fresh fetch from the step provider
    ///
    /// Existing steps are only touched when the provider returned at least one
    /// step. A recipe without a source URL, an empty fetch, or a storage
    /// failure all report `{ success: false, steps_count: 0 }`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the recipe does not exist.
    pub async fn refetch_steps(&self, recipe_id: RecipeId) -> Result<StepsOutcome> {
        let recipe = match self.db.get_recipe(recipe_id).await {
            Ok(Some(recipe)) => recipe,
            Ok(None) => return Err(Error::NotFound(format!("recipe {}", recipe_id))),
            Err(e) => {
                tracing::warn!(recipe_id = %recipe_id, error = %e, "failed to load recipe for step refetch");
                return Ok(StepsOutcome::failed());
            }
        };

        let Some(url) = recipe.source_url.as_deref() else {
            tracing::debug!(recipe_id = %recipe_id, "recipe has no source URL, nothing to refetch");
            return Ok(StepsOutcome::failed());
        };

        let fetched = self
            .steps
            .fetch_steps(url, recipe.source_id.as_deref())
            .await;
        if fetched.is_empty() {
            tracing::warn!(recipe_id = %recipe_id, url, "step refetch returned nothing, keeping existing steps");
            return Ok(StepsOutcome::failed());
        }

        match self
            .db
            .replace_steps(recipe_id, &fetched_step_rows(fetched))
            .await
        {
            Ok(count) => {
                tracing::info!(recipe_id = %recipe_id, steps = count, "steps refetched");
                Ok(StepsOutcome::replaced(count))
            }
            Err(e) => {
                tracing::warn!(recipe_id = %recipe_id, error = %e, "failed to store refetched steps");
                Ok(StepsOutcome::failed())
            }
        }
    }

    /// Replace a recipe's steps with caller-supplied ones
    ///
    /// Missing numbers default to the array index + 1 and blank content to
    /// `"-"`. An empty list clears the steps. Rows whose number repeats an
    /// earlier one are skipped and not counted.
    pub async fn save_steps(
        &self,
        recipe_id: RecipeId,
        steps: &[ImportStep],
    ) -> Result<StepsOutcome> {
        if self.db.get_recipe(recipe_id).await?.is_none() {
            return Err(Error::NotFound(format!("recipe {}", recipe_id)));
        }

        let count = self
            .db
            .replace_steps(recipe_id, &request_step_rows(steps))
            .await?;
        tracing::info!(recipe_id = %recipe_id, steps = count, "steps saved");
        Ok(StepsOutcome::replaced(count))
    }
}
