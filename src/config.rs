use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProvidersConfig,

    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/cityscout.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// One upstream provider: where to reach it and how to authenticate.
/// The base URL is overridable so tests can point a client at a local
/// double.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoint {
    pub base_url: String,

    pub api_key: String,
}

impl ProviderEndpoint {
    fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u32,

    pub geocode: ProviderEndpoint,

    pub weather: ProviderEndpoint,

    pub yelp: ProviderEndpoint,

    pub movies: ProviderEndpoint,

    pub meetup: ProviderEndpoint,

    pub trails: ProviderEndpoint,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            geocode: ProviderEndpoint::with_base_url("https://maps.googleapis.com/maps/api/geocode"),
            weather: ProviderEndpoint::with_base_url("https://api.darksky.net"),
            yelp: ProviderEndpoint::with_base_url("https://api.yelp.com/v3"),
            movies: ProviderEndpoint::with_base_url("https://api.themoviedb.org/3"),
            meetup: ProviderEndpoint::with_base_url("https://api.meetup.com"),
            trails: ProviderEndpoint::with_base_url("https://www.hikingproject.com"),
        }
    }
}

/// How long a stored batch of category rows stays servable. Process-wide,
/// read once at startup; a batch older than its category's TTL is purged
/// and refetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub weather_ttl_seconds: u64,

    pub restaurants_ttl_seconds: u64,

    pub movies_ttl_seconds: u64,

    pub meetups_ttl_seconds: u64,

    pub trails_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_ttl_seconds: 15,
            restaurants_ttl_seconds: 60 * 60 * 24,
            movies_ttl_seconds: 60 * 60 * 24,
            meetups_ttl_seconds: 60 * 60 * 6,
            trails_ttl_seconds: 60 * 60 * 24,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn weather_ttl(&self) -> chrono::Duration {
        seconds(self.weather_ttl_seconds)
    }

    #[must_use]
    pub fn restaurants_ttl(&self) -> chrono::Duration {
        seconds(self.restaurants_ttl_seconds)
    }

    #[must_use]
    pub fn movies_ttl(&self) -> chrono::Duration {
        seconds(self.movies_ttl_seconds)
    }

    #[must_use]
    pub fn meetups_ttl(&self) -> chrono::Duration {
        seconds(self.meetups_ttl_seconds)
    }

    #[must_use]
    pub fn trails_ttl(&self) -> chrono::Duration {
        seconds(self.trails_ttl_seconds)
    }
}

fn seconds(value: u64) -> chrono::Duration {
    i64::try_from(value)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                let mut config = Self::load_from_path(path)?;
                config.apply_env_overrides();
                return Ok(config);
            }
        }

        info!("No config file found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cityscout").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cityscout").join("config.toml"));
        }

        paths
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = PathBuf::from("config.toml");
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    /// Provider keys may come from the environment instead of the config
    /// file, under the variable names the deployment already uses.
    fn apply_env_overrides(&mut self) {
        override_key(&mut self.providers.geocode.api_key, "GEOCODE_API_KEY");
        override_key(&mut self.providers.weather.api_key, "WEATHER_API_KEY");
        override_key(&mut self.providers.yelp.api_key, "YELP_API_KEY");
        override_key(&mut self.providers.movies.api_key, "MOVIE_API_KEY");
        override_key(&mut self.providers.meetup.api_key, "MEETUP_API_KEY");
        override_key(&mut self.providers.trails.api_key, "TRAIL_API_KEY");
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be set");
        }

        if self.general.max_db_connections == 0 {
            anyhow::bail!("Database pool must allow at least one connection");
        }

        Ok(())
    }
}

fn override_key(slot: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var)
        && !value.is_empty()
    {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cache.weather_ttl_seconds, 15);
        assert_eq!(config.cache.restaurants_ttl_seconds, 86_400);
        assert_eq!(config.providers.request_timeout_seconds, 30);
        assert!(config.providers.geocode.api_key.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[providers.weather]"));
        assert!(toml_str.contains("[cache]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [cache]
            weather_ttl_seconds = 60

            [providers.yelp]
            api_key = "yelp-key"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.cache.weather_ttl_seconds, 60);
        assert_eq!(config.providers.yelp.api_key, "yelp-key");

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.cache.meetups_ttl_seconds, 21_600);
    }

    #[test]
    fn test_ttl_durations() {
        let cache = CacheConfig::default();
        assert_eq!(cache.weather_ttl(), chrono::Duration::seconds(15));
        assert_eq!(cache.trails_ttl(), chrono::Duration::hours(24));
    }
}
