//! End-to-end import flow against mock providers
//!
//! Search → import → provider enrichment → backfill, driven through the
//! public [`RecipeImporter`] API with both providers replaced by wiremock.

mod common;

use common::{
    SEARCH_PATH, VESUVIO_ID, VESUVIO_URL, extract_response, importer_with_owner, mock_config,
    search_response, vesuvio_hit,
};
use recipe_import::{
    Config, Database, Difficulty, Error, ImportStep, ProviderError, RecipeImporter, SearchQuery,
    StepClient, StepsOutcome,
};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_search(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn search_import_enrich_and_backfill() {
    let search = MockServer::start().await;
    let steps = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    mount_search(&search, search_response(vec![vesuvio_hit()], 7000, 0)).await;
    // First extraction serves the import, the second the refetch
    Mock::given(method("GET"))
        .and(path("/recipes/extract"))
        .and(query_param("url", VESUVIO_URL))
        .respond_with(ResponseTemplate::new(200).set_body_json(extract_response(&[
            &["Heat the oil.", "Brown the chicken."],
            &["Roast the potatoes."],
        ])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&steps)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes/extract"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(extract_response(&[&["Reheat.", "Serve."]])),
        )
        .expect(1)
        .mount(&steps)
        .await;

    let (importer, owner) =
        importer_with_owner(mock_config(&search, &steps, &["key-1"], &temp_dir)).await;

    // Search
    let page = importer
        .search_external(&SearchQuery {
            q: Some("chicken".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 7000);
    assert_eq!(page.items.len(), 1);
    let hit = &page.items[0];
    assert_eq!(hit.recipe.source_id, VESUVIO_ID);
    assert_eq!(hit.recipe.difficulty, Some(Difficulty::Medium));
    assert_eq!(hit.recipe.cook_time.as_deref(), Some("1h"));
    assert_eq!(hit.recipe.category.as_deref(), Some("Italian"));
    assert!(hit.recipe.steps.is_none());

    // Import: steps come from the extraction provider, renumbered across groups
    let outcome = importer.ensure_recipe(&hit.recipe, owner).await.unwrap();
    assert!(outcome.created);
    let detail = importer.get_recipe(outcome.recipe.id).await.unwrap();
    assert_eq!(detail.ingredients.len(), 4);
    assert_eq!(detail.ingredients[3].quantity.as_deref(), Some("as needed"));
    let numbered: Vec<(i64, &str)> = detail
        .steps
        .iter()
        .map(|s| (s.step_number, s.content.as_str()))
        .collect();
    assert_eq!(
        numbered,
        vec![
            (1, "Heat the oil."),
            (2, "Brown the chicken."),
            (3, "Roast the potatoes."),
        ]
    );
    let source_data = detail.recipe.source_data_json().unwrap();
    assert_eq!(source_data["recipe"]["label"], "Chicken Vesuvio");

    // Re-import resolves to the same recipe without touching the provider
    let again = importer.ensure_recipe(&hit.recipe, owner).await.unwrap();
    assert!(!again.created);
    assert_eq!(again.recipe.id, outcome.recipe.id);

    // Backfill from the provider
    let refetched = importer.refetch_steps(outcome.recipe.id).await.unwrap();
    assert_eq!(refetched, StepsOutcome::replaced(2));

    // Caller-supplied steps replace everything
    let saved = importer
        .save_steps(
            outcome.recipe.id,
            &[ImportStep {
                content: "Order takeout.".to_string(),
                ..Default::default()
            }],
        )
        .await
        .unwrap();
    assert_eq!(saved, StepsOutcome::replaced(1));
    let detail = importer.get_recipe(outcome.recipe.id).await.unwrap();
    assert_eq!(detail.steps.len(), 1);
    assert_eq!(detail.steps[0].content, "Order takeout.");
}

#[tokio::test]
async fn quota_exhaustion_rotates_to_next_credential() {
    let search = MockServer::start().await;
    let steps = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/recipes/extract"))
        .and(query_param("apiKey", "spent"))
        .respond_with(ResponseTemplate::new(402))
        .expect(1)
        .mount(&steps)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes/extract"))
        .and(query_param("apiKey", "fresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(extract_response(&[&["Only step."]])),
        )
        .expect(1)
        .mount(&steps)
        .await;

    let config = mock_config(&search, &steps, &["spent", "fresh"], &temp_dir);
    let client = Arc::new(StepClient::new(&config.steps).unwrap());
    let db = Arc::new(Database::open(&config.persistence).await.unwrap());
    let owner = db
        .insert_user(&recipe_import::db::NewUser {
            email: "cook@example.com".to_string(),
            display_name: None,
        })
        .await
        .unwrap();
    let importer =
        RecipeImporter::with_components(Arc::new(config), db, client.clone()).unwrap();

    let mut request = common_request();
    request.url = Some("https://example.com/quota".to_string());
    let outcome = importer.ensure_recipe(&request, owner).await.unwrap();

    let detail = importer.get_recipe(outcome.recipe.id).await.unwrap();
    assert_eq!(detail.steps.len(), 1);
    assert_eq!(client.pool().cursor(), 1, "cursor stays on the working key");
}

#[tokio::test]
async fn extraction_outage_still_imports_recipe() {
    let search = MockServer::start().await;
    let steps = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/recipes/extract"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&steps)
        .await;

    let (importer, owner) =
        importer_with_owner(mock_config(&search, &steps, &["a", "b", "c"], &temp_dir)).await;

    let mut request = common_request();
    request.url = Some("https://example.com/outage".to_string());
    let outcome = importer.ensure_recipe(&request, owner).await.unwrap();

    assert!(outcome.created);
    let detail = importer.get_recipe(outcome.recipe.id).await.unwrap();
    assert!(detail.steps.is_empty());
    assert_eq!(detail.ingredients.len(), 1);
}

#[tokio::test]
async fn search_outage_surfaces_provider_error() {
    let search = MockServer::start().await;
    let steps = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&search)
        .await;

    let (importer, _owner) =
        importer_with_owner(mock_config(&search, &steps, &[], &temp_dir)).await;

    let err = importer
        .search_external(&SearchQuery::default())
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            Error::Provider(ProviderError::Status { status: 503, .. })
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn importer_rejects_invalid_config() {
    let mut config = Config::default();
    config.steps.api_keys = vec!["ok".to_string(), "  ".to_string()];

    let err = RecipeImporter::new(config).await.err().unwrap();
    assert!(matches!(err, Error::Config { .. }), "got {err:?}");
}

fn common_request() -> recipe_import::ImportRequest {
    recipe_import::ImportRequest {
        source: recipe_import::Source::Edamam,
        source_id: "plain-1".to_string(),
        title: "Plain Rice".to_string(),
        ingredients: vec![recipe_import::ImportIngredient {
            name: "rice".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    }
}
