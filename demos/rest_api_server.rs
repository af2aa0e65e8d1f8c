//! REST API server example
//!
//! Runs recipe-import with the REST API enabled. Provider credentials are read
//! from the environment:
//!
//! ```text
//! EDAMAM_APP_ID=... EDAMAM_APP_KEY=... SPOONACULAR_API_KEYS=key1,key2 \
//!     RUST_LOG=recipe_import=debug,tower_http=info \
//!     cargo run --example rest_api_server
//! ```

use recipe_import::api::start_api_server;
use recipe_import::db::NewUser;
use recipe_import::{Config, RecipeImporter};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recipe_import=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    let importer = Arc::new(RecipeImporter::new(config.clone()).await?);

    // Imports need an owner; make sure a demo user exists
    let owner = match importer.db.get_user_by_email("demo@example.com").await? {
        Some(user) => user.id,
        None => {
            importer
                .db
                .insert_user(&NewUser {
                    email: "demo@example.com".to_string(),
                    display_name: Some("Demo".to_string()),
                })
                .await?
        }
    };

    let base = format!("http://{}", config.api.bind_address);
    println!("Starting recipe-import REST API server on {base}");
    println!();
    println!("Example commands:");
    println!("  # Search the provider");
    println!("  curl '{base}/public-recipes?q=chicken&pageSize=5'");
    println!();
    println!("  # Import the first hit (paste an item from the search response)");
    println!("  curl -X POST {base}/public-recipes/import \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"owner_id\": {owner}, \"recipe\": <item>}}'");
    println!();
    println!("  # Refetch steps for recipe 1");
    println!("  curl -X POST {base}/recipes/1/steps/refetch");
    println!();
    println!("Press Ctrl+C to stop");

    start_api_server(importer, Arc::new(config)).await?;

    Ok(())
}
