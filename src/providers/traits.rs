//! Seam between the importer and the step-extraction provider

use async_trait::async_trait;

use crate::types::FetchedStep;

/// Source of cooking steps for a recipe page
///
/// Implementations must never fail: any provider problem is logged and
/// reported as an empty list, which the importer treats as "no steps yet".
///
/// # Examples
///
/// ```
/// use recipe_import::providers::{NoOpStepSource, StepSource};
///
/// # #[tokio::main]
/// # async fn main() {
/// let source = NoOpStepSource;
/// let steps = source.fetch_steps("https://example.com/pasta", None).await;
/// assert!(steps.is_empty());
/// # }
/// ```
#[async_trait]
pub trait StepSource: Send + Sync {
    /// Fetch the ordered steps for the recipe at `url`
    ///
    /// `hint_id` is the provider's own id when the caller knows it; it only
    /// enriches log output.
    async fn fetch_steps(&self, url: &str, hint_id: Option<&str>) -> Vec<FetchedStep>;
}
