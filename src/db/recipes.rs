//! Recipe rows and the dedup-key lookup.

use crate::error::DatabaseError;
use crate::types::{RecipeId, SourceKey};
use crate::{Error, Result};

use super::{Database, NewRecipe, Recipe, WriteTx};

macro_rules! select_recipe {
    ($filter:literal) => {
        concat!(
            r#"
            SELECT id, owner_id, title, description, image_url, category, difficulty,
                   cook_time, servings, is_published, source, source_id, source_url,
                   source_data, created_at, updated_at
            FROM recipes
            "#,
            $filter
        )
    };
}

async fn fetch_recipe<'e, E>(executor: E, id: RecipeId) -> Result<Option<Recipe>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Recipe>(select_recipe!("WHERE id = ?"))
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to get recipe: {}",
                e
            )))
        })
}

async fn fetch_recipe_by_source_key<'e, E>(executor: E, key: &SourceKey) -> Result<Option<Recipe>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Recipe>(select_recipe!("WHERE source = ? AND source_id = ?"))
        .bind(key.source)
        .bind(&key.source_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to look up recipe by source key: {}",
                e
            )))
        })
}

impl Database {
    /// Get a recipe by id
    pub async fn get_recipe(&self, id: RecipeId) -> Result<Option<Recipe>> {
        fetch_recipe(&self.pool, id).await
    }

    /// Find the recipe imported under a dedup key
    pub async fn find_recipe_by_source_key(&self, key: &SourceKey) -> Result<Option<Recipe>> {
        fetch_recipe_by_source_key(&self.pool, key).await
    }

    /// Count stored recipes under a dedup key (0 or 1 while the index holds)
    pub async fn count_recipes_by_source_key(&self, key: &SourceKey) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE source = ? AND source_id = ?")
            .bind(key.source)
            .bind(&key.source_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to count recipes: {}",
                    e
                )))
            })
    }
}

impl WriteTx {
    /// Get a recipe by id inside the transaction
    pub async fn get_recipe(&mut self, id: RecipeId) -> Result<Option<Recipe>> {
        fetch_recipe(self.conn(), id).await
    }

    /// Find the recipe imported under a dedup key inside the transaction
    pub async fn find_recipe_by_source_key(&mut self, key: &SourceKey) -> Result<Option<Recipe>> {
        fetch_recipe_by_source_key(self.conn(), key).await
    }

    /// Insert a recipe unless its dedup key is already taken
    ///
    /// Returns the new id, or `None` when a row with the same
    /// `(source, source_id)` already exists. Other constraint failures are
    /// errors.
    pub async fn insert_recipe_if_absent(&mut self, recipe: &NewRecipe) -> Result<Option<RecipeId>> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO recipes (
                owner_id, title, description, image_url, category, difficulty, cook_time,
                servings, is_published, source, source_id, source_url, source_data,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (source, source_id) WHERE source_id IS NOT NULL DO NOTHING
            "#,
        )
        .bind(recipe.owner_id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(&recipe.image_url)
        .bind(&recipe.category)
        .bind(recipe.difficulty)
        .bind(&recipe.cook_time)
        .bind(recipe.servings)
        .bind(recipe.is_published)
        .bind(recipe.source)
        .bind(&recipe.source_id)
        .bind(&recipe.source_url)
        .bind(&recipe.source_data)
        .bind(now)
        .bind(now)
        .execute(self.conn())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => Error::NotFound(
                format!("user {}", recipe.owner_id),
            ),
            sqlx::Error::Database(ref db) if db.is_check_violation() => Error::Database(
                DatabaseError::ConstraintViolation(format!("Recipe rejected: {}", e)),
            ),
            e => Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to insert recipe: {}",
                e
            ))),
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(RecipeId(result.last_insert_rowid())))
    }

    /// Bump `updated_at` after the recipe's children changed
    pub async fn touch_recipe(&mut self, id: RecipeId) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        sqlx::query("UPDATE recipes SET updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(self.conn())
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to update recipe timestamp: {}",
                    e
                )))
            })?;
        Ok(())
    }
}
