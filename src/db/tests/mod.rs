use super::*;
use crate::types::{Difficulty, RecipeId, Source, SourceKey, UserId};
use tempfile::NamedTempFile;

mod children;

async fn test_db() -> (Database, NamedTempFile) {
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();
    (db, temp_file)
}

async fn test_user(db: &Database) -> UserId {
    db.insert_user(&NewUser {
        email: "cook@example.com".to_string(),
        display_name: Some("Cook".to_string()),
    })
    .await
    .unwrap()
}

fn new_recipe(owner_id: UserId, source: Source, source_id: Option<&str>) -> NewRecipe {
    NewRecipe {
        owner_id,
        title: "Chicken Vesuvio".to_string(),
        description: Some("Recipe from Serious Eats".to_string()),
        image_url: None,
        category: Some("Italian".to_string()),
        difficulty: Some(Difficulty::Medium),
        cook_time: Some("1h".to_string()),
        servings: Some(4),
        is_published: true,
        source,
        source_id: source_id.map(str::to_string),
        source_url: Some("https://www.seriouseats.com/chicken-vesuvio".to_string()),
        source_data: Some(r#"{"label":"Chicken Vesuvio"}"#.to_string()),
    }
}

async fn insert_recipe(db: &Database, recipe: &NewRecipe) -> Option<RecipeId> {
    let mut tx = db.begin_write().await.unwrap();
    let id = tx.insert_recipe_if_absent(recipe).await.unwrap();
    tx.commit().await.unwrap();
    id
}

fn steps(contents: &[&str]) -> Vec<NewStep> {
    contents
        .iter()
        .enumerate()
        .map(|(i, content)| NewStep {
            step_number: i as i64 + 1,
            content: content.to_string(),
            image_url: None,
        })
        .collect()
}

fn edamam_key(id: &str) -> SourceKey {
    SourceKey::new(Source::Edamam, id)
}
