//! Conversion of import requests and provider data into storage rows.

use crate::db::{NewIngredient, NewRecipe, NewStep};
use crate::error::Result;
use crate::types::{FetchedStep, ImportRequest, ImportStep, SourceKey, UserId};

/// Content stored for a step that arrived blank
const BLANK_STEP: &str = "-";

fn step_content(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        BLANK_STEP.to_string()
    } else {
        trimmed.to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The recipe row for an import request
///
/// Imported recipes are published. A missing description is derived from the
/// author when there is one.
pub(super) fn new_recipe(
    request: &ImportRequest,
    key: &SourceKey,
    owner_id: UserId,
) -> Result<NewRecipe> {
    let author = non_blank(&request.author);
    let description = non_blank(&request.description)
        .or_else(|| author.as_ref().map(|a| format!("Recipe from {a}")));
    let source_data = match &request.source_data {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => Some(serde_json::to_string(value)?),
    };

    Ok(NewRecipe {
        owner_id,
        title: request.title.trim().to_string(),
        description,
        image_url: non_blank(&request.image_url),
        category: non_blank(&request.category),
        difficulty: request.difficulty,
        cook_time: non_blank(&request.cook_time),
        servings: request.servings,
        is_published: true,
        source: key.source,
        source_id: Some(key.source_id.clone()),
        source_url: non_blank(&request.url),
        source_data,
    })
}

/// Ingredient rows in request order, positioned by `position` or array index
pub(super) fn ingredient_rows(request: &ImportRequest) -> Vec<NewIngredient> {
    request
        .ingredients
        .iter()
        .enumerate()
        .map(|(index, ingredient)| NewIngredient {
            name: ingredient.name.trim().to_string(),
            quantity: non_blank(&ingredient.quantity),
            unit: non_blank(&ingredient.unit),
            position: ingredient.effective_position(index),
        })
        .collect()
}

/// Caller-supplied steps, stably sorted by their effective number
pub(super) fn request_step_rows(steps: &[ImportStep]) -> Vec<NewStep> {
    let mut rows: Vec<NewStep> = steps
        .iter()
        .enumerate()
        .map(|(index, step)| NewStep {
            step_number: step.effective_number(index),
            content: step_content(&step.content),
            image_url: non_blank(&step.image_url),
        })
        .collect();
    rows.sort_by_key(|row| row.step_number);
    rows
}

/// Provider steps, renumbered `1..=n` in fetch order
///
/// Providers number steps per instruction group, so the flattened list can
/// repeat numbers.
pub(super) fn fetched_step_rows(steps: Vec<FetchedStep>) -> Vec<NewStep> {
    steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| NewStep {
            step_number: index as i64 + 1,
            content: step_content(&step.content),
            image_url: None,
        })
        .collect()
}
