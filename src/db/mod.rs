//! Database layer for recipe-import
//!
//! Handles SQLite persistence for users, recipes and their ingredients and steps.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`]: Database lifecycle, schema migrations
//! - [`users`]: Recipe owners
//! - [`recipes`]: Recipe rows and the dedup-key lookup
//! - [`children`]: Ingredient and step rows
//! - [`tx`]: Immediate write transactions
//!
//! ## Write model
//!
//! SQLite admits one writer at a time. Every multi-statement write takes the
//! write lock up front with `BEGIN IMMEDIATE` (see [`WriteTx`]) so that readers
//! upgrading to writers never fail with a stale snapshot, and the busy timeout
//! queues contending writers instead of failing them.

use serde::Serialize;
use sqlx::{FromRow, sqlite::SqlitePool};

use crate::types::{Difficulty, RecipeId, Source, UserId};

mod children;
mod migrations;
mod recipes;
mod tx;
mod users;

pub use tx::WriteTx;

/// New user to be inserted into the database
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login email
    pub email: String,
    /// Name shown next to the user's recipes
    pub display_name: Option<String>,
}

/// User record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    /// Unique database ID
    pub id: UserId,
    /// Unique login email
    pub email: String,
    /// Name shown next to the user's recipes
    pub display_name: Option<String>,
    /// Unix timestamp when the user was created
    pub created_at: i64,
}

/// New recipe to be inserted into the database
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Owning user
    pub owner_id: UserId,
    /// Recipe title
    pub title: String,
    /// Short description
    pub description: Option<String>,
    /// Hero image
    pub image_url: Option<String>,
    /// Display category
    pub category: Option<String>,
    /// Estimated difficulty
    pub difficulty: Option<Difficulty>,
    /// Formatted cook time
    pub cook_time: Option<String>,
    /// Number of servings
    pub servings: Option<i64>,
    /// Whether the recipe is visible to other users
    pub is_published: bool,
    /// Where the recipe came from
    pub source: Source,
    /// Normalized provider id; `None` for community recipes
    pub source_id: Option<String>,
    /// Original recipe page
    pub source_url: Option<String>,
    /// Raw provider payload as serialized JSON
    pub source_data: Option<String>,
}

/// Recipe record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recipe {
    /// Unique database ID
    pub id: RecipeId,
    /// Owning user
    pub owner_id: UserId,
    /// Recipe title
    pub title: String,
    /// Short description
    pub description: Option<String>,
    /// Hero image
    pub image_url: Option<String>,
    /// Display category
    pub category: Option<String>,
    /// Estimated difficulty
    pub difficulty: Option<Difficulty>,
    /// Formatted cook time
    pub cook_time: Option<String>,
    /// Number of servings
    pub servings: Option<i64>,
    /// Whether the recipe is visible to other users
    pub is_published: bool,
    /// Where the recipe came from
    pub source: Source,
    /// Normalized provider id; `None` for community recipes
    pub source_id: Option<String>,
    /// Original recipe page
    pub source_url: Option<String>,
    /// Raw provider payload, emitted as embedded JSON
    #[serde(serialize_with = "serialize_raw_json")]
    pub source_data: Option<String>,
    /// Unix timestamp when the recipe was created
    pub created_at: i64,
    /// Unix timestamp of the last change
    pub updated_at: i64,
}

impl Recipe {
    /// Parse the stored provider payload
    pub fn source_data_json(&self) -> Option<serde_json::Value> {
        self.source_data
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

fn serialize_raw_json<S>(raw: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let value = raw
        .as_deref()
        .and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok());
    value.serialize(serializer)
}

/// New ingredient to be inserted into the database
#[derive(Debug, Clone, PartialEq)]
pub struct NewIngredient {
    /// Ingredient name
    pub name: String,
    /// Free-form quantity
    pub quantity: Option<String>,
    /// Unit of measure
    pub unit: Option<String>,
    /// Zero-based display position, unique per recipe
    pub position: i64,
}

/// Ingredient record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ingredient {
    /// Unique database ID
    pub id: i64,
    /// Owning recipe
    pub recipe_id: RecipeId,
    /// Ingredient name
    pub name: String,
    /// Free-form quantity
    pub quantity: Option<String>,
    /// Unit of measure
    pub unit: Option<String>,
    /// Zero-based display position
    pub position: i64,
}

/// New step to be inserted into the database
#[derive(Debug, Clone, PartialEq)]
pub struct NewStep {
    /// 1-based step number, unique per recipe
    pub step_number: i64,
    /// Instruction text
    pub content: String,
    /// Optional illustration
    pub image_url: Option<String>,
}

/// Step record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Step {
    /// Unique database ID
    pub id: i64,
    /// Owning recipe
    pub recipe_id: RecipeId,
    /// 1-based step number
    pub step_number: i64,
    /// Instruction text
    pub content: String,
    /// Optional illustration
    pub image_url: Option<String>,
}

/// Database handle for recipe-import
pub struct Database {
    pool: SqlitePool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
