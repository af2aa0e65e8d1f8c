//! Ingredient and step rows.
//!
//! Both tables are unique per parent position (`(recipe_id, position)` and
//! `(recipe_id, step_number)`), and inserts skip rows that collide. Populating
//! the same recipe twice is therefore harmless: the second pass inserts nothing.

use crate::error::DatabaseError;
use crate::types::RecipeId;
use crate::{Error, Result};

use super::{Database, Ingredient, NewIngredient, NewStep, Step, WriteTx};

// SQLite's default SQLITE_MAX_VARIABLE_NUMBER is 999
const MAX_INGREDIENTS_PER_BATCH: usize = 999 / 5;
const MAX_STEPS_PER_BATCH: usize = 999 / 4;

async fn count_children<'e, E>(executor: E, sql: &'static str, id: RecipeId) -> Result<i64>
where
    E: sqlx::SqliteExecutor<'e>,
{
    sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to count recipe children: {}",
                e
            )))
        })
}

const COUNT_INGREDIENTS: &str = "SELECT COUNT(*) FROM recipe_ingredients WHERE recipe_id = ?";
const COUNT_STEPS: &str = "SELECT COUNT(*) FROM recipe_steps WHERE recipe_id = ?";

impl Database {
    /// Ingredients of a recipe, by position
    pub async fn list_ingredients(&self, id: RecipeId) -> Result<Vec<Ingredient>> {
        sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT id, recipe_id, name, quantity, unit, position
            FROM recipe_ingredients
            WHERE recipe_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to list ingredients: {}",
                e
            )))
        })
    }

    /// Steps of a recipe, by step number
    pub async fn list_steps(&self, id: RecipeId) -> Result<Vec<Step>> {
        sqlx::query_as::<_, Step>(
            r#"
            SELECT id, recipe_id, step_number, content, image_url
            FROM recipe_steps
            WHERE recipe_id = ?
            ORDER BY step_number ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to list steps: {}",
                e
            )))
        })
    }

    /// Number of ingredients attached to a recipe
    pub async fn count_ingredients(&self, id: RecipeId) -> Result<i64> {
        count_children(&self.pool, COUNT_INGREDIENTS, id).await
    }

    /// Number of steps attached to a recipe
    pub async fn count_steps(&self, id: RecipeId) -> Result<i64> {
        count_children(&self.pool, COUNT_STEPS, id).await
    }

    /// Replace all steps of a recipe in one transaction
    ///
    /// Returns the number of rows inserted; an empty `steps` clears the recipe.
    pub async fn replace_steps(&self, id: RecipeId, steps: &[NewStep]) -> Result<u64> {
        let mut tx = self.begin_write().await?;
        let removed = tx.delete_steps(id).await?;
        let inserted = tx.insert_steps(id, steps).await?;
        tx.touch_recipe(id).await?;
        tx.commit().await?;

        tracing::debug!(recipe_id = %id, removed, inserted, "steps replaced");
        Ok(inserted)
    }

    /// Insert steps only if the recipe has none yet
    ///
    /// Returns the number of rows inserted, 0 when steps were already present.
    pub async fn populate_steps_if_empty(&self, id: RecipeId, steps: &[NewStep]) -> Result<u64> {
        let mut tx = self.begin_write().await?;
        if tx.count_steps(id).await? > 0 {
            tx.rollback().await?;
            return Ok(0);
        }
        let inserted = tx.insert_steps(id, steps).await?;
        if inserted > 0 {
            tx.touch_recipe(id).await?;
        }
        tx.commit().await?;
        Ok(inserted)
    }
}

impl WriteTx {
    /// Number of ingredients attached to a recipe
    pub async fn count_ingredients(&mut self, id: RecipeId) -> Result<i64> {
        count_children(self.conn(), COUNT_INGREDIENTS, id).await
    }

    /// Number of steps attached to a recipe
    pub async fn count_steps(&mut self, id: RecipeId) -> Result<i64> {
        count_children(self.conn(), COUNT_STEPS, id).await
    }

    /// Insert ingredients, skipping positions already taken
    pub async fn insert_ingredients(
        &mut self,
        id: RecipeId,
        ingredients: &[NewIngredient],
    ) -> Result<u64> {
        let mut inserted = 0;

        for chunk in ingredients.chunks(MAX_INGREDIENTS_PER_BATCH) {
            let mut query_builder = sqlx::QueryBuilder::new(
                "INSERT INTO recipe_ingredients (recipe_id, name, quantity, unit, position) ",
            );
            query_builder.push_values(chunk, |mut b, ingredient| {
                b.push_bind(id)
                    .push_bind(&ingredient.name)
                    .push_bind(&ingredient.quantity)
                    .push_bind(&ingredient.unit)
                    .push_bind(ingredient.position);
            });
            query_builder.push(" ON CONFLICT (recipe_id, position) DO NOTHING");

            let result = query_builder
                .build()
                .execute(self.conn())
                .await
                .map_err(|e| {
                    Error::Database(DatabaseError::QueryFailed(format!(
                        "Failed to insert ingredients: {}",
                        e
                    )))
                })?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Insert steps, skipping step numbers already taken
    pub async fn insert_steps(&mut self, id: RecipeId, steps: &[NewStep]) -> Result<u64> {
        let mut inserted = 0;

        for chunk in steps.chunks(MAX_STEPS_PER_BATCH) {
            let mut query_builder = sqlx::QueryBuilder::new(
                "INSERT INTO recipe_steps (recipe_id, step_number, content, image_url) ",
            );
            query_builder.push_values(chunk, |mut b, step| {
                b.push_bind(id)
                    .push_bind(step.step_number)
                    .push_bind(&step.content)
                    .push_bind(&step.image_url);
            });
            query_builder.push(" ON CONFLICT (recipe_id, step_number) DO NOTHING");

            let result = query_builder
                .build()
                .execute(self.conn())
                .await
                .map_err(|e| {
                    Error::Database(DatabaseError::QueryFailed(format!(
                        "Failed to insert steps: {}",
                        e
                    )))
                })?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Delete every step of a recipe
    pub async fn delete_steps(&mut self, id: RecipeId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM recipe_steps WHERE recipe_id = ?")
            .bind(id)
            .execute(self.conn())
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to delete steps: {}",
                    e
                )))
            })?;
        Ok(result.rows_affected())
    }
}
