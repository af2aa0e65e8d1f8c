//! Configuration types for recipe-import

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};

/// Main configuration for [`RecipeImporter`](crate::RecipeImporter)
///
/// Every section has defaults, so `Config::default()` works for local use once
/// provider credentials are supplied (see [`Config::from_env`]).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search provider settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Step-extraction provider settings
    #[serde(default)]
    pub steps: StepsConfig,

    /// Database settings
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Search provider configuration (paginated recipe search)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint (default: Edamam recipes v2)
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Application id sent with every search
    #[serde(default)]
    pub app_id: String,

    /// Application key sent with every search
    #[serde(default)]
    pub app_key: String,

    /// Per-call timeout (default: 10 seconds)
    #[serde(default = "default_search_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// Page size used when the caller does not pass one (default: 20)
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest accepted page size (default: 100)
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Retry policy for transient search failures
    #[serde(default = "default_search_retry")]
    pub retry: RetryConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            app_id: String::new(),
            app_key: String::new(),
            timeout: default_search_timeout(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            retry: default_search_retry(),
        }
    }
}

/// Step-extraction provider configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepsConfig {
    /// Provider base URL (default: Spoonacular)
    #[serde(default = "default_steps_base_url")]
    pub base_url: String,

    /// Ordered credential pool, rotated on quota exhaustion
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Per-call timeout (default: 60 seconds)
    #[serde(default = "default_steps_timeout", with = "duration_serde")]
    pub timeout: Duration,
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            base_url: default_steps_base_url(),
            api_keys: vec![],
            timeout: default_steps_timeout(),
        }
    }
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Database path (default: "./recipes.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Maximum pooled connections (default: 8)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a writer waits for the database lock (default: 30 seconds)
    #[serde(default = "default_busy_timeout", with = "duration_serde")]
    pub busy_timeout: Duration,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            max_connections: default_max_connections(),
            busy_timeout: default_busy_timeout(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind the API server to (default: 127.0.0.1:6790)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Enable CORS (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins ("*" allows any)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
        }
    }
}

/// Retry configuration for transient failures
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first call (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 5 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

impl Config {
    /// Defaults plus overrides from the process environment
    ///
    /// Recognized variables:
    /// - `EDAMAM_APP_ID`, `EDAMAM_APP_KEY` - search credentials
    /// - `SPOONACULAR_API_KEYS` - comma-separated step-extraction credential pool
    /// - `RECIPE_IMPORT_DATABASE` - database path
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from a key lookup (the environment, or a map in tests)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(app_id) = lookup("EDAMAM_APP_ID") {
            self.search.app_id = app_id;
        }
        if let Some(app_key) = lookup("EDAMAM_APP_KEY") {
            self.search.app_key = app_key;
        }
        if let Some(keys) = lookup("SPOONACULAR_API_KEYS") {
            self.steps.api_keys = keys
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(path) = lookup("RECIPE_IMPORT_DATABASE") {
            self.persistence.database_path = PathBuf::from(path);
        }
    }

    /// Check the configuration for values that would make the importer misbehave
    pub fn validate(&self) -> Result<()> {
        for (key, url) in [
            ("search.base_url", &self.search.base_url),
            ("steps.base_url", &self.steps.base_url),
        ] {
            let parsed = url::Url::parse(url).map_err(|e| config_error(key, e.to_string()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(config_error(key, "must be an http(s) URL"));
            }
        }

        if self.search.timeout.is_zero() {
            return Err(config_error("search.timeout", "must be greater than zero"));
        }
        if self.steps.timeout.is_zero() {
            return Err(config_error("steps.timeout", "must be greater than zero"));
        }
        if self.search.default_page_size == 0 {
            return Err(config_error(
                "search.default_page_size",
                "must be greater than zero",
            ));
        }
        if self.search.default_page_size > self.search.max_page_size {
            return Err(config_error(
                "search.default_page_size",
                "must not exceed search.max_page_size",
            ));
        }
        if self.steps.api_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(config_error("steps.api_keys", "credentials must not be blank"));
        }
        if self.persistence.max_connections == 0 {
            return Err(config_error(
                "persistence.max_connections",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn config_error(key: &str, message: impl Into<String>) -> Error {
    Error::Config {
        message: format!("{key}: {}", message.into()),
        key: Some(key.to_string()),
    }
}

fn default_search_base_url() -> String {
    "https://api.edamam.com/api/recipes/v2".to_string()
}

fn default_steps_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_search_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_steps_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_search_retry() -> RetryConfig {
    RetryConfig::default()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./recipes.db")
}

fn default_max_connections() -> u32 {
    8
}

fn default_busy_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6790))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    2
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_provider_budgets() {
        let config = Config::default();
        assert_eq!(config.search.timeout, Duration::from_secs(10));
        assert_eq!(config.steps.timeout, Duration::from_secs(60));
        assert_eq!(config.search.default_page_size, 20);
        assert!(config.steps.api_keys.is_empty());
        config.validate().expect("default config must be valid");
    }

    #[test]
    fn empty_json_object_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize failed");
        assert_eq!(config.search.base_url, default_search_base_url());
        assert_eq!(config.persistence.max_connections, 8);
        assert!(config.api.cors_enabled);
    }

    #[test]
    fn durations_serialize_as_seconds() {
        let config = Config::default();
        let json = serde_json::to_value(&config).expect("serialize failed");
        assert_eq!(json["search"]["timeout"], 10);
        assert_eq!(json["steps"]["timeout"], 60);
        assert_eq!(json["persistence"]["busy_timeout"], 30);

        let steps: StepsConfig =
            serde_json::from_str(r#"{"api_keys":["a"],"timeout":5}"#).expect("deserialize failed");
        assert_eq!(steps.timeout, Duration::from_secs(5));
        assert_eq!(steps.base_url, default_steps_base_url());
    }

    #[test]
    fn overrides_split_and_trim_credential_pool() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("EDAMAM_APP_ID", "id-1"),
            ("EDAMAM_APP_KEY", "key-1"),
            ("SPOONACULAR_API_KEYS", " k1, k2 ,,k3 "),
            ("RECIPE_IMPORT_DATABASE", "/tmp/r.db"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.search.app_id, "id-1");
        assert_eq!(config.search.app_key, "key-1");
        assert_eq!(config.steps.api_keys, vec!["k1", "k2", "k3"]);
        assert_eq!(config.persistence.database_path, PathBuf::from("/tmp/r.db"));
    }

    #[test]
    fn missing_overrides_leave_values_untouched() {
        let mut config = Config::default();
        config.steps.api_keys = vec!["keep".into()];
        config.apply_overrides(|_| None);
        assert_eq!(config.steps.api_keys, vec!["keep"]);
    }

    #[test]
    fn validate_rejects_bad_values_with_key() {
        let cases: Vec<(Box<dyn Fn(&mut Config)>, &str)> = vec![
            (
                Box::new(|c: &mut Config| c.search.base_url = "not a url".into()),
                "search.base_url",
            ),
            (
                Box::new(|c: &mut Config| c.steps.base_url = "ftp://example.com".into()),
                "steps.base_url",
            ),
            (
                Box::new(|c: &mut Config| c.search.timeout = Duration::ZERO),
                "search.timeout",
            ),
            (
                Box::new(|c: &mut Config| c.steps.timeout = Duration::ZERO),
                "steps.timeout",
            ),
            (
                Box::new(|c: &mut Config| c.search.default_page_size = 0),
                "search.default_page_size",
            ),
            (
                Box::new(|c: &mut Config| c.search.default_page_size = 500),
                "search.default_page_size",
            ),
            (
                Box::new(|c: &mut Config| c.steps.api_keys = vec!["ok".into(), "  ".into()]),
                "steps.api_keys",
            ),
            (
                Box::new(|c: &mut Config| c.persistence.max_connections = 0),
                "persistence.max_connections",
            ),
        ];

        for (mutate, expected_key) in cases {
            let mut config = Config::default();
            mutate(&mut config);
            match config.validate() {
                Err(Error::Config { key, .. }) => {
                    assert_eq!(key.as_deref(), Some(expected_key));
                }
                other => panic!("expected config error for {expected_key}, got {other:?}"),
            }
        }
    }
}
