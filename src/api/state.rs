//! Application state for the API server

use crate::{Config, RecipeImporter};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the importer instance and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The import engine
    pub importer: Arc<RecipeImporter>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(importer: Arc<RecipeImporter>, config: Arc<Config>) -> Self {
        Self { importer, config }
    }
}
