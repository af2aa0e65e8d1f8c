//! Configuration and setup helpers pointing the importer at mock providers

use recipe_import::db::NewUser;
use recipe_import::{Config, RecipeImporter, RetryConfig, UserId};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::MockServer;

/// Path the search mock serves on
pub const SEARCH_PATH: &str = "/api/recipes/v2";

/// Config for an importer talking to `search` and `steps` mock servers
pub fn mock_config(search: &MockServer, steps: &MockServer, keys: &[&str], temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.search.base_url = format!("{}{}", search.uri(), SEARCH_PATH);
    config.search.app_id = "test-app".to_string();
    config.search.app_key = "test-key".to_string();
    config.search.timeout = Duration::from_secs(2);
    config.search.retry = RetryConfig {
        max_attempts: 2,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
        backoff_multiplier: 2.0,
        jitter: false,
    };
    config.steps.base_url = steps.uri();
    config.steps.api_keys = keys.iter().map(|k| k.to_string()).collect();
    config.steps.timeout = Duration::from_secs(2);
    config.persistence.database_path = temp_dir.path().join("recipes.db");
    config
}

/// Build an importer from `config` and register one owner
pub async fn importer_with_owner(config: Config) -> (RecipeImporter, UserId) {
    let importer = RecipeImporter::new(config).await.unwrap();
    let owner = importer
        .db
        .insert_user(&NewUser {
            email: "cook@example.com".to_string(),
            display_name: None,
        })
        .await
        .unwrap();
    (importer, owner)
}
