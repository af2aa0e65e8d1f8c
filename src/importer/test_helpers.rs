//! Shared test helpers for creating RecipeImporter instances in tests.

use crate::config::Config;
use crate::db::{Database, NewUser};
use crate::importer::RecipeImporter;
use crate::providers::StepSource;
use crate::types::{FetchedStep, ImportIngredient, ImportRequest, Source, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::tempdir;

/// Step source with a canned answer that records every call
#[derive(Default)]
pub(crate) struct FakeStepSource {
    steps: Mutex<Vec<FetchedStep>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl FakeStepSource {
    /// Source that answers every call with `contents`, numbered from 1
    pub(crate) fn returning(contents: &[&str]) -> Self {
        let source = Self::default();
        source.set_steps(contents);
        source
    }

    /// Same as [`returning`](Self::returning) but each call sleeps first
    pub(crate) fn slow(contents: &[&str], delay: Duration) -> Self {
        let mut source = Self::returning(contents);
        source.delay = Some(delay);
        source
    }

    pub(crate) fn set_steps(&self, contents: &[&str]) {
        *self.steps.lock().unwrap() = contents
            .iter()
            .enumerate()
            .map(|(i, content)| FetchedStep {
                step_number: i as i64 + 1,
                content: content.to_string(),
            })
            .collect();
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StepSource for FakeStepSource {
    async fn fetch_steps(&self, url: &str, _hint_id: Option<&str>) -> Vec<FetchedStep> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.steps.lock().unwrap().clone()
    }
}

/// Helper to create a test importer backed by a temporary database.
/// Returns the importer, one registered owner, and the tempdir (which must be
/// kept alive).
pub(crate) async fn create_test_importer(
    steps: Arc<FakeStepSource>,
) -> (RecipeImporter, UserId, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();

    let mut config = Config::default();
    config.persistence.database_path = temp_dir.path().join("recipes.db");
    // Never reached: searches in these tests go through wiremock or not at all
    config.search.base_url = "http://127.0.0.1:9/search".to_string();

    let db = Database::open(&config.persistence).await.unwrap();
    let owner = db
        .insert_user(&NewUser {
            email: "cook@example.com".to_string(),
            display_name: Some("Cook".to_string()),
        })
        .await
        .unwrap();

    let importer =
        RecipeImporter::with_components(Arc::new(config), Arc::new(db), steps).unwrap();
    (importer, owner, temp_dir)
}

/// A provider import request as the search normalizer would produce it
pub(crate) fn import_request(source_id: &str) -> ImportRequest {
    ImportRequest {
        source: Source::Edamam,
        source_id: source_id.to_string(),
        title: "Chicken Vesuvio".to_string(),
        author: Some("Serious Eats".to_string()),
        url: Some("https://www.seriouseats.com/chicken-vesuvio".to_string()),
        servings: Some(4),
        ingredients: vec![
            ImportIngredient {
                name: "chicken".to_string(),
                quantity: Some("1.0".to_string()),
                unit: Some("pound".to_string()),
                position: Some(0),
            },
            ImportIngredient {
                name: "olive oil".to_string(),
                quantity: Some("0.5".to_string()),
                unit: Some("cup".to_string()),
                position: Some(1),
            },
        ],
        source_data: Some(serde_json::json!({ "label": "Chicken Vesuvio" })),
        ..Default::default()
    }
}
