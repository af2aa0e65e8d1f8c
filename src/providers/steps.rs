//! Step-extraction provider client (Spoonacular)

use async_trait::async_trait;
use serde::Deserialize;

use super::credentials::CredentialPool;
use super::traits::StepSource;
use crate::config::StepsConfig;
use crate::error::{ProviderError, Result};
use crate::types::FetchedStep;

const PROVIDER: &str = "spoonacular";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractResponse {
    #[serde(default)]
    analyzed_instructions: Option<Vec<InstructionGroup>>,
}

#[derive(Debug, Deserialize)]
struct InstructionGroup {
    #[serde(default)]
    steps: Vec<InstructionStep>,
}

#[derive(Debug, Deserialize)]
struct InstructionStep {
    #[serde(default)]
    number: Option<i64>,
    #[serde(default)]
    step: String,
}

/// Client for the step-extraction provider
///
/// Each call walks the [`CredentialPool`] starting at the shared cursor. A
/// quota-exhausted answer (HTTP 402) rotates to the next credential; anything
/// else ends the call. At most one request is made per credential, and every
/// request is bounded by the configured timeout.
pub struct StepClient {
    http: reqwest::Client,
    base_url: String,
    pool: CredentialPool,
    timeout_secs: u64,
}

impl StepClient {
    /// Build a client from configuration
    pub fn new(config: &StepsConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pool: CredentialPool::new(config.api_keys.clone()),
            timeout_secs: config.timeout.as_secs(),
        })
    }

    /// The credential pool, for inspecting the rotation cursor
    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    async fn extract(
        &self,
        url: &str,
        key: &str,
    ) -> std::result::Result<Vec<FetchedStep>, ProviderError> {
        let endpoint = format!("{}/recipes/extract", self.base_url);
        let response = self
            .http
            .get(&endpoint)
            .query(&[("url", url), ("apiKey", key), ("analyze", "true")])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, self.timeout_secs, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::PAYMENT_REQUIRED {
            return Err(ProviderError::QuotaExhausted { provider: PROVIDER });
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body: ExtractResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, self.timeout_secs, e))?;

        Ok(flatten_instructions(body))
    }
}

/// Flatten instruction groups into one list, keeping provider numbering
fn flatten_instructions(body: ExtractResponse) -> Vec<FetchedStep> {
    body.analyzed_instructions
        .unwrap_or_default()
        .into_iter()
        .flat_map(|group| group.steps)
        .enumerate()
        .map(|(index, step)| FetchedStep {
            step_number: step.number.unwrap_or(index as i64 + 1),
            content: step.step,
        })
        .collect()
}

#[async_trait]
impl StepSource for StepClient {
    async fn fetch_steps(&self, url: &str, hint_id: Option<&str>) -> Vec<FetchedStep> {
        let total = self.pool.len();
        if total == 0 {
            tracing::debug!(url = %url, "no step-extraction credentials configured");
            return Vec::new();
        }

        let start = self.pool.cursor();
        let mut index = start;
        let mut attempts = 0;

        while attempts < total {
            let Some(key) = self.pool.key(index) else {
                return Vec::new();
            };

            match self.extract(url, key).await {
                Ok(steps) => {
                    tracing::debug!(
                        url = %url,
                        hint_id = ?hint_id,
                        credential = index,
                        steps = steps.len(),
                        "fetched recipe steps"
                    );
                    return steps;
                }
                Err(ProviderError::QuotaExhausted { .. }) => {
                    attempts += 1;
                    index = self.pool.rotate_from(index);
                    tracing::warn!(
                        credential = index,
                        attempts,
                        "step-extraction quota exhausted, rotating credential"
                    );
                    if index == start {
                        tracing::warn!(
                            url = %url,
                            hint_id = ?hint_id,
                            "all step-extraction credentials exhausted"
                        );
                        return Vec::new();
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        hint_id = ?hint_id,
                        error = %e,
                        "step extraction failed"
                    );
                    return Vec::new();
                }
            }
        }

        Vec::new()
    }
}
