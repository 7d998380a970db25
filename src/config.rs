use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_CACHE_MINUTES: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How long fetched rates stay valid in the cache.
    #[serde(default = "default_cache_minutes")]
    pub cache_minutes: i64,
    /// exchangerate-api.com key; when absent the service runs on demo rates.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Override for the provider base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

fn default_cache_minutes() -> i64 {
    DEFAULT_CACHE_MINUTES
}

fn default_database_url() -> String {
    "sqlite://fx_rates.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_minutes: default_cache_minutes(),
            api_key: None,
            base_url: None,
            database_url: default_database_url(),
        }
    }
}

fn get_config_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("config.toml");
    path
}

/// Read config.toml (falling back to defaults when it does not exist), then
/// apply environment overrides. Call `dotenvy::dotenv()` first to pick up a
/// local .env file.
pub fn load_config() -> anyhow::Result<Config> {
    let config_path = get_config_path();
    let mut config = match fs::read_to_string(config_path) {
        Ok(config_str) => toml::from_str(&config_str)?,
        Err(_) => Config::default(),
    };

    if let Ok(key) = env::var("EXCHANGE_RATE_API_KEY") {
        config.api_key = Some(key);
    }
    if let Ok(url) = env::var("EXCHANGE_RATE_BASE_URL") {
        config.base_url = Some(url);
    }
    if let Ok(url) = env::var("DATABASE_URL") {
        config.database_url = url;
    }
    if let Ok(minutes) = env::var("EXCHANGE_RATE_CACHE_MINUTES") {
        config.cache_minutes = minutes.parse()?;
    }

    Ok(config)
}
