//! Search provider client (Edamam recipe search v2)

use serde::Deserialize;
use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::{Error, ProviderError, Result};
use crate::normalize::normalize_hit;
use crate::retry::with_retry;
use crate::types::{SearchPage, SearchQuery};

const PROVIDER: &str = "edamam";

/// Search response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct EdamamResponse {
    /// Offset of the first hit
    #[serde(default)]
    pub from: u64,
    /// Offset one past the last hit
    #[serde(default)]
    pub to: u64,
    /// Total number of matches
    #[serde(default)]
    pub count: u64,
    /// Hits, kept raw so one bad hit cannot spoil the page
    #[serde(default)]
    pub hits: Vec<Value>,
}

/// One recipe as the search provider describes it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdamamRecipe {
    /// Resource URI; the recipe id is its trailing segment
    pub uri: String,
    /// Recipe title
    pub label: String,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Publisher name
    #[serde(default)]
    pub source: Option<String>,
    /// Original recipe page
    #[serde(default)]
    pub url: Option<String>,
    /// Number of servings, possibly fractional
    #[serde(default, rename = "yield")]
    pub r#yield: Option<f64>,
    /// Diet labels
    #[serde(default)]
    pub diet_labels: Vec<String>,
    /// Health labels
    #[serde(default)]
    pub health_labels: Vec<String>,
    /// Parsed ingredient lines
    #[serde(default)]
    pub ingredients: Vec<EdamamIngredient>,
    /// Total calories
    #[serde(default)]
    pub calories: Option<f64>,
    /// Total weight in grams
    #[serde(default)]
    pub total_weight: Option<f64>,
    /// Total time in minutes
    #[serde(default)]
    pub total_time: Option<f64>,
    /// Cuisine labels
    #[serde(default)]
    pub cuisine_type: Vec<String>,
    /// Meal type labels
    #[serde(default)]
    pub meal_type: Vec<String>,
    /// Dish type labels
    #[serde(default)]
    pub dish_type: Vec<String>,
}

/// One parsed ingredient line
#[derive(Debug, Clone, Deserialize)]
pub struct EdamamIngredient {
    /// Original text of the line
    #[serde(default)]
    pub text: Option<String>,
    /// Parsed quantity
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Parsed unit
    #[serde(default)]
    pub measure: Option<String>,
    /// Parsed food name
    #[serde(default)]
    pub food: String,
    /// Weight in grams
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Paginated client for the search provider
///
/// Transient failures are retried per [`SearchConfig::retry`]; whatever is
/// left is returned as [`Error::Provider`].
pub struct SearchClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl SearchClient {
    /// Build a client from configuration
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Resolve page and page size, applying defaults and limits
    pub fn resolve_page(&self, query: &SearchQuery) -> Result<(u32, u32)> {
        let page = query.page.unwrap_or(1);
        let page_size = query.page_size.unwrap_or(self.config.default_page_size);

        if page == 0 {
            return Err(Error::Validation("page starts at 1".into()));
        }
        if page_size == 0 || page_size > self.config.max_page_size {
            return Err(Error::Validation(format!(
                "page_size must be between 1 and {}, got {}",
                self.config.max_page_size, page_size
            )));
        }
        Ok((page, page_size))
    }

    /// Run one search and normalize the hits
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchPage> {
        let (page, page_size) = self.resolve_page(query)?;
        let from = u64::from(page - 1) * u64::from(page_size);
        let to = from + u64::from(page_size);
        let params = self.query_params(query, from, to);

        let response = with_retry(&self.config.retry, || self.request_page(&params)).await?;

        let hit_count = response.hits.len();
        let items: Vec<_> = response
            .hits
            .into_iter()
            .filter_map(|hit| match EdamamRecipe::deserialize(&hit["recipe"]) {
                Ok(recipe) => Some(normalize_hit(&recipe, hit)),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable search hit");
                    None
                }
            })
            .collect();

        tracing::debug!(
            page,
            page_size,
            total = response.count,
            hits = hit_count,
            normalized = items.len(),
            "search page fetched"
        );

        Ok(SearchPage {
            items,
            total: response.count,
            page,
            page_size,
            from: response.from,
            to: response.to,
        })
    }

    fn query_params(&self, query: &SearchQuery, from: u64, to: u64) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("type", "public".to_string()),
            ("app_id", self.config.app_id.clone()),
            ("app_key", self.config.app_key.clone()),
        ];
        let filters = [
            ("q", &query.q),
            ("mealType", &query.meal_type),
            ("cuisineType", &query.cuisine_type),
            ("dishType", &query.dish_type),
            ("health", &query.health),
            ("diet", &query.diet),
        ];
        for (name, value) in filters {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((name, value.to_string()));
            }
        }
        params.push(("from", from.to_string()));
        params.push(("to", to.to_string()));
        params
    }

    async fn request_page(&self, params: &[(&'static str, String)]) -> Result<EdamamResponse> {
        let timeout_secs = self.config.timeout.as_secs();
        let response = self
            .http
            .get(&self.config.base_url)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, timeout_secs, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            }
            .into());
        }

        let body = response
            .json::<EdamamResponse>()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, timeout_secs, e))?;
        Ok(body)
    }
}
