//! Idempotent import of provider recipes.

use crate::error::{Error, Result};
use crate::types::{EnsureOutcome, ImportRequest, RecipeId, UserId};

use super::RecipeImporter;
use super::rows::{fetched_step_rows, ingredient_rows, new_recipe, request_step_rows};

impl RecipeImporter {
    /// Make sure the provider recipe described by `request` exists locally
    ///
    /// Repeated and concurrent calls with the same normalized
    /// `(source, source_id)` resolve to the same recipe. Only the call whose
    /// insert created the row reports `created = true`, and only the first
    /// import's ingredients and steps are kept.
    ///
    /// When the request carries no steps but has a URL, the creating call
    /// asks the step provider for them after the record is committed. A failed
    /// or empty fetch leaves the recipe without steps; it can be filled later
    /// with [`refetch_steps`](Self::refetch_steps).
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a malformed request (nothing is written)
    /// - [`Error::NotFound`] when the owner does not exist
    /// - [`Error::Database`] for storage failures, which abort the import
    pub async fn ensure_recipe(
        &self,
        request: &ImportRequest,
        owner_id: UserId,
    ) -> Result<EnsureOutcome> {
        request.validate()?;
        let key = request.source_key();

        if self.db.get_user(owner_id).await?.is_none() {
            return Err(Error::NotFound(format!("user {}", owner_id)));
        }

        if let Some(recipe) = self.db.find_recipe_by_source_key(&key).await? {
            tracing::debug!(recipe_id = %recipe.id, key = %key, "recipe already imported");
            return Ok(EnsureOutcome {
                recipe,
                created: false,
            });
        }

        let row = new_recipe(request, &key, owner_id)?;

        let mut tx = self.db.begin_write().await?;

        let (recipe_id, created) = match tx.insert_recipe_if_absent(&row).await? {
            Some(id) => (id, true),
            None => {
                let existing = tx.find_recipe_by_source_key(&key).await?.ok_or_else(|| {
                    Error::Other(format!(
                        "recipe {} collided on insert but cannot be read back",
                        key
                    ))
                })?;
                tracing::debug!(recipe_id = %existing.id, key = %key, "lost import race");
                (existing.id, false)
            }
        };

        let mut recipe = tx
            .get_recipe(recipe_id)
            .await?
            .ok_or_else(|| Error::Other(format!("recipe {} vanished during import", recipe_id)))?;

        if tx.count_ingredients(recipe_id).await? == 0 && !request.ingredients.is_empty() {
            tx.insert_ingredients(recipe_id, &ingredient_rows(request))
                .await?;
        }

        let supplied_steps = request.steps.as_deref().filter(|steps| !steps.is_empty());
        let mut fetch_from = None;
        if tx.count_steps(recipe_id).await? == 0 {
            match supplied_steps {
                Some(steps) => {
                    tx.insert_steps(recipe_id, &request_step_rows(steps))
                        .await?;
                }
                None if created => fetch_from = recipe.source_url.clone(),
                None => {}
            }
        }

        tx.commit().await?;

        if created {
            tracing::info!(
                recipe_id = %recipe_id,
                key = %key,
                owner_id = %owner_id,
                "recipe imported"
            );
        }

        if let Some(url) = fetch_from {
            if self.enrich_steps(recipe_id, &url, &key.source_id).await > 0 {
                if let Some(updated) = self.db.get_recipe(recipe_id).await? {
                    recipe = updated;
                }
            }
        }

        Ok(EnsureOutcome { recipe, created })
    }

    /// Fetch steps from the provider and store them if the recipe has none
    ///
    /// Returns the number of steps stored. Failures are logged, never
    /// returned.
    async fn enrich_steps(&self, recipe_id: RecipeId, url: &str, hint_id: &str) -> u64 {
        let fetched = self.steps.fetch_steps(url, Some(hint_id)).await;
        if fetched.is_empty() {
            tracing::warn!(
                recipe_id = %recipe_id,
                url,
                "no steps available from provider, recipe stored without steps"
            );
            return 0;
        }

        let rows = fetched_step_rows(fetched);
        match self.db.populate_steps_if_empty(recipe_id, &rows).await {
            Ok(inserted) => {
                tracing::info!(recipe_id = %recipe_id, steps = inserted, "steps fetched from provider");
                inserted
            }
            Err(e) => {
                tracing::warn!(recipe_id = %recipe_id, error = %e, "failed to store fetched steps");
                0
            }
        }
    }
}
