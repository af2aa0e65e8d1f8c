//! Translation of search-provider hits into import requests
//!
//! Everything here is pure: no I/O, no clock, no randomness. The search client
//! calls [`normalize_hit`] once per decoded hit.

use serde_json::Value;

use crate::providers::search::{EdamamIngredient, EdamamRecipe};
use crate::types::{Difficulty, ExternalRecipe, ImportIngredient, ImportRequest, Source};

/// Separator between the Edamam resource prefix and the recipe's own id
const EDAMAM_ID_DELIMITER: &str = "#recipe_";

/// Servings assumed when the provider reports no usable yield
const DEFAULT_SERVINGS: i64 = 4;

/// Category used when the provider reports neither cuisine nor dish type
const FALLBACK_CATEGORY: &str = "Other";

/// Extract the provider's recipe id from its resource URI
///
/// `http://www.edamam.com/ontologies/edamam.owl#recipe_b79327d0` yields
/// `b79327d0`. A URI without the delimiter, or with nothing after it, is
/// returned whole.
pub fn extract_source_id(uri: &str) -> &str {
    match uri.rsplit_once(EDAMAM_ID_DELIMITER) {
        Some((_, id)) if !id.is_empty() => id,
        _ => uri,
    }
}

/// Estimate difficulty from ingredient count and total minutes
pub fn estimate_difficulty(ingredient_count: usize, total_minutes: i64) -> Difficulty {
    if ingredient_count <= 5 && total_minutes <= 30 {
        Difficulty::Easy
    } else if ingredient_count <= 10 && total_minutes <= 60 {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

/// Format a cook time: `"Unknown"`, `"45 min"`, `"2h"` or `"1h 30min"`
pub fn format_cook_time(minutes: i64) -> String {
    if minutes <= 0 {
        return "Unknown".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min");
    }
    match (minutes / 60, minutes % 60) {
        (hours, 0) => format!("{hours}h"),
        (hours, mins) => format!("{hours}h {mins}min"),
    }
}

/// Upper-case the first character and leave the rest alone
pub fn format_category(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// First cuisine label, else first dish type, else `"Other"`
fn pick_category(cuisine_type: &[String], dish_type: &[String]) -> String {
    let label = [cuisine_type.first(), dish_type.first()]
        .into_iter()
        .flatten()
        .find(|label| !label.is_empty())
        .map(String::as_str)
        .unwrap_or(FALLBACK_CATEGORY);
    format_category(label)
}

fn normalize_ingredient(index: usize, ingredient: &EdamamIngredient) -> ImportIngredient {
    let quantity = match ingredient.quantity {
        Some(q) if q != 0.0 => format!("{q:.1}"),
        _ => "as needed".to_string(),
    };
    let unit = ingredient
        .measure
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    ImportIngredient {
        name: ingredient.food.clone(),
        quantity: Some(quantity),
        unit,
        position: Some(index as i64),
    }
}

/// Convert one decoded search hit into an importable recipe
///
/// `raw` is the hit exactly as the provider sent it and is kept as the
/// recipe's opaque `source_data`.
pub fn normalize_hit(recipe: &EdamamRecipe, raw: Value) -> ExternalRecipe {
    let total_minutes = recipe
        .total_time
        .map(|t| t.round() as i64)
        .unwrap_or(0)
        .max(0);
    let servings = recipe
        .r#yield
        .map(|y| y.round() as i64)
        .filter(|y| *y > 0)
        .unwrap_or(DEFAULT_SERVINGS);
    let publisher = recipe
        .source
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "Edamam".to_string());

    let request = ImportRequest {
        source: Source::Edamam,
        source_id: extract_source_id(&recipe.uri).to_string(),
        title: recipe.label.clone(),
        description: Some(format!("Recipe from {publisher}")),
        url: recipe.url.clone(),
        image_url: recipe.image.clone(),
        category: Some(pick_category(&recipe.cuisine_type, &recipe.dish_type)),
        difficulty: Some(estimate_difficulty(recipe.ingredients.len(), total_minutes)),
        cook_time: Some(format_cook_time(total_minutes)),
        servings: Some(servings),
        author: Some(publisher),
        ingredients: recipe
            .ingredients
            .iter()
            .enumerate()
            .map(|(index, ingredient)| normalize_ingredient(index, ingredient))
            .collect(),
        steps: None,
        source_data: Some(raw),
    };

    ExternalRecipe {
        recipe: request,
        calories: recipe.calories.map(|c| c.round() as i64).unwrap_or(0),
        total_weight: recipe.total_weight.map(|w| w.round() as i64).unwrap_or(0),
        diet_labels: recipe.diet_labels.clone(),
        health_labels: recipe.health_labels.clone(),
    }
}
