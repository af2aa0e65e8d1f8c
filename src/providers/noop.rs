//! Step source used when no extraction credentials are configured

use async_trait::async_trait;

use super::traits::StepSource;
use crate::types::FetchedStep;

/// Step source that never calls out and always reports no steps
///
/// Recipes imported through it start without steps; they can be filled in
/// later with a backfill once credentials are available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStepSource;

#[async_trait]
impl StepSource for NoOpStepSource {
    async fn fetch_steps(&self, url: &str, _hint_id: Option<&str>) -> Vec<FetchedStep> {
        tracing::debug!(url = %url, "step extraction disabled, returning no steps");
        Vec::new()
    }
}
