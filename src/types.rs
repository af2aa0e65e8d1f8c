//! Core types for recipe-import

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use crate::db::{Ingredient, Recipe, Step};
use crate::error::{Error, Result};

macro_rules! sqlite_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wrap a raw row id
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the inner i64 value
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> std::result::Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
                let id = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                Ok(Self(id))
            }
        }
    };
}

/// Enums stored as their `as_str()` text in SQLite
macro_rules! sqlite_text_enum {
    ($name:ident) => {
        impl sqlx::Type<sqlx::Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as sqlx::Type<sqlx::Sqlite>>::type_info()
            }

            fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            }
        }

        impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> std::result::Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                sqlx::Encode::<sqlx::Sqlite>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for $name {
            fn decode(
                value: sqlx::sqlite::SqliteValueRef<'r>,
            ) -> std::result::Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
                Ok(text.parse::<$name>()?)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

sqlite_id!(
    /// Unique identifier for a stored recipe
    RecipeId
);

sqlite_id!(
    /// Unique identifier for a user (recipe owner)
    UserId
);

/// Where a recipe came from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Written locally by a user; never deduplicated
    #[default]
    Community,
    /// Imported from the Edamam search provider
    Edamam,
    /// Imported from the Spoonacular provider
    Spoonacular,
}

impl Source {
    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Community => "community",
            Source::Edamam => "edamam",
            Source::Spoonacular => "spoonacular",
        }
    }

    /// True for third-party sources that carry a dedup key
    pub fn is_external(&self) -> bool {
        !matches!(self, Source::Community)
    }
}

impl std::str::FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "community" => Ok(Source::Community),
            "edamam" => Ok(Source::Edamam),
            "spoonacular" => Ok(Source::Spoonacular),
            other => Err(Error::Validation(format!("unknown recipe source '{other}'"))),
        }
    }
}

sqlite_text_enum!(Source);

/// Estimated effort to cook a recipe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Few ingredients and quick
    #[serde(alias = "easy", alias = "EASY")]
    Easy,
    /// Moderate ingredient count or time
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    /// Everything else
    #[serde(alias = "hard", alias = "HARD")]
    Hard,
}

impl Difficulty {
    /// Storage and wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(Error::Validation(format!("unknown difficulty '{other}'"))),
        }
    }
}

sqlite_text_enum!(Difficulty);

/// Normalized dedup key: `(source, trimmed lowercase source id)`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceKey {
    /// Provider the recipe came from
    pub source: Source,
    /// Normalized provider id
    pub source_id: String,
}

impl SourceKey {
    /// Build a key, normalizing the id so that case and surrounding whitespace
    /// never produce distinct rows
    pub fn new(source: Source, source_id: &str) -> Self {
        Self {
            source,
            source_id: source_id.trim().to_lowercase(),
        }
    }
}

impl std::fmt::Display for SourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source, self.source_id)
    }
}

/// One ingredient line of an import request
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportIngredient {
    /// Ingredient name
    pub name: String,
    /// Free-form quantity ("2.0", "a pinch", "as needed")
    #[serde(default)]
    pub quantity: Option<String>,
    /// Unit of measure
    #[serde(default)]
    pub unit: Option<String>,
    /// Zero-based position; the array index is used when absent
    #[serde(default)]
    pub position: Option<i64>,
}

impl ImportIngredient {
    /// Position used for storage: the supplied position, else `index`
    pub fn effective_position(&self, index: usize) -> i64 {
        self.position.unwrap_or(index as i64)
    }
}

/// One caller-supplied cooking step
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportStep {
    /// Step number. Integers and numeric strings are accepted, anything else
    /// counts as missing.
    #[serde(
        default,
        alias = "step_number",
        alias = "stepNumber",
        deserialize_with = "lenient_step_number"
    )]
    pub number: Option<i64>,
    /// Instruction text
    #[serde(default, alias = "instruction", alias = "step")]
    pub content: String,
    /// Optional illustration
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
}

impl ImportStep {
    /// Number used for ordering: the supplied number, else `index + 1`
    pub fn effective_number(&self, index: usize) -> i64 {
        self.number.unwrap_or(index as i64 + 1)
    }
}

fn lenient_step_number<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }))
}

/// Canonical shape every provider payload is translated into before import
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Provider the recipe came from
    pub source: Source,
    /// Provider id; normalized into a [`SourceKey`] before any lookup
    #[serde(alias = "sourceId")]
    pub source_id: String,
    /// Recipe title
    pub title: String,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// Original recipe page
    #[serde(default, alias = "recipeUrl", alias = "sourceUrl")]
    pub url: Option<String>,
    /// Hero image
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    /// Display category ("Italian", "Main course")
    #[serde(default)]
    pub category: Option<String>,
    /// Estimated difficulty
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Formatted cook time ("1h 30min")
    #[serde(default, alias = "cookTime")]
    pub cook_time: Option<String>,
    /// Number of servings
    #[serde(default)]
    pub servings: Option<i64>,
    /// Author or publisher credited on the original page
    #[serde(default)]
    pub author: Option<String>,
    /// Ingredient lines, in display order
    #[serde(default)]
    pub ingredients: Vec<ImportIngredient>,
    /// Cooking steps; `None` lets the importer fetch them from the provider
    #[serde(default)]
    pub steps: Option<Vec<ImportStep>>,
    /// Raw provider payload, stored opaquely
    #[serde(default, alias = "sourceData")]
    pub source_data: Option<Value>,
}

impl ImportRequest {
    /// Reject malformed requests before anything is written
    pub fn validate(&self) -> Result<()> {
        if !self.source.is_external() {
            return Err(Error::Validation(
                "only provider recipes can be imported, got source 'community'".into(),
            ));
        }
        if self.source_id.trim().is_empty() {
            return Err(Error::Validation("source_id must not be empty".into()));
        }
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title must not be empty".into()));
        }
        if let Some(servings) = self.servings.filter(|s| *s <= 0) {
            return Err(Error::Validation(format!(
                "servings must be positive, got {servings}"
            )));
        }
        for (field, value) in [("url", &self.url), ("image_url", &self.image_url)] {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                validate_http_url(field, value)?;
            }
        }
        if let Some(index) = self
            .ingredients
            .iter()
            .position(|i| i.name.trim().is_empty())
        {
            return Err(Error::Validation(format!(
                "ingredient {index} has an empty name"
            )));
        }

        let mut positions = HashSet::new();
        for (index, ingredient) in self.ingredients.iter().enumerate() {
            let position = ingredient.effective_position(index);
            if !positions.insert(position) {
                return Err(Error::Validation(format!(
                    "ingredient {index} repeats position {position}"
                )));
            }
        }

        let mut numbers = HashSet::new();
        for (index, step) in self.steps.iter().flatten().enumerate() {
            let number = step.effective_number(index);
            if !numbers.insert(number) {
                return Err(Error::Validation(format!(
                    "step {index} repeats number {number}"
                )));
            }
        }
        Ok(())
    }

    /// The normalized dedup key of this request
    pub fn source_key(&self) -> SourceKey {
        SourceKey::new(self.source, &self.source_id)
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| Error::Validation(format!("{field} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::Validation(format!(
            "{field} must use http or https, got '{scheme}'"
        ))),
    }
}

/// One step returned by the step-extraction provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedStep {
    /// Provider step number
    pub step_number: i64,
    /// Instruction text
    pub content: String,
}

/// Result of [`ensure_recipe`](crate::RecipeImporter::ensure_recipe)
#[derive(Clone, Debug, Serialize)]
pub struct EnsureOutcome {
    /// The stored recipe (new or pre-existing)
    pub recipe: Recipe,
    /// True only for the call whose insert created the row
    pub created: bool,
}

/// Result of a step backfill
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepsOutcome {
    /// Whether the recipe's steps were replaced
    pub success: bool,
    /// Number of steps written
    pub steps_count: u64,
}

impl StepsOutcome {
    /// Nothing was written
    pub fn failed() -> Self {
        Self {
            success: false,
            steps_count: 0,
        }
    }

    /// `count` steps were written
    pub fn replaced(count: u64) -> Self {
        Self {
            success: true,
            steps_count: count,
        }
    }
}

/// A recipe with its children, in display order
#[derive(Clone, Debug, Serialize)]
pub struct RecipeDetail {
    /// The recipe row
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Ingredients ordered by position
    pub ingredients: Vec<Ingredient>,
    /// Steps ordered by step number
    pub steps: Vec<Step>,
}

/// Filters and pagination for a provider search
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text keyword
    #[serde(default)]
    pub q: Option<String>,
    /// Meal type ("Dinner")
    #[serde(default, alias = "mealType")]
    pub meal_type: Option<String>,
    /// Cuisine label ("Italian")
    #[serde(default, alias = "cuisineType")]
    pub cuisine_type: Option<String>,
    /// Dish type ("Main course")
    #[serde(default, alias = "dishType")]
    pub dish_type: Option<String>,
    /// Health label ("vegan")
    #[serde(default)]
    pub health: Option<String>,
    /// Diet label ("low-carb")
    #[serde(default)]
    pub diet: Option<String>,
    /// 1-based page number (default: 1)
    #[serde(default)]
    pub page: Option<u32>,
    /// Page size (default: configured)
    #[serde(default, alias = "pageSize")]
    pub page_size: Option<u32>,
}

/// A normalized search hit: the import request plus search-only metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExternalRecipe {
    /// Everything needed to import this hit
    #[serde(flatten)]
    pub recipe: ImportRequest,
    /// Total calories, rounded
    pub calories: i64,
    /// Total weight in grams, rounded
    pub total_weight: i64,
    /// Diet labels reported by the provider
    pub diet_labels: Vec<String>,
    /// Health labels reported by the provider
    pub health_labels: Vec<String>,
}

/// One page of provider search results
#[derive(Clone, Debug, Serialize)]
pub struct SearchPage {
    /// Normalized hits
    pub items: Vec<ExternalRecipe>,
    /// Total number of matches reported by the provider
    pub total: u64,
    /// 1-based page number
    pub page: u32,
    /// Requested page size
    pub page_size: u32,
    /// Offset of the first item
    pub from: u64,
    /// Offset one past the last item
    pub to: u64,
}
