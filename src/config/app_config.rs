use std::time::Duration;

use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub warming: WarmingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Registry service connection
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Cache-aside window
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    /// Window for entities resolved on the request path
    #[serde(default = "default_entity_ttl_secs")]
    pub entity_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarmingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_sliding_secs")]
    pub sliding_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_base_url() -> String {
    "http://localhost:8080/imsi".to_string()
}

fn default_auth_url() -> String {
    "http://localhost:8080/auth/oauth2_token".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_capacity() -> u64 {
    100_000
}

fn default_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_entity_ttl_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    300
}

fn default_page_size() -> usize {
    100
}

fn default_sliding_secs() -> u64 {
    300
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_url: default_auth_url(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            default_ttl_secs: default_ttl_secs(),
            entity_ttl_secs: default_entity_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn entity_ttl(&self) -> Duration {
        Duration::from_secs(self.entity_ttl_secs)
    }
}

impl Default for WarmingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_secs: default_interval_secs(),
            page_size: default_page_size(),
            sliding_secs: default_sliding_secs(),
        }
    }
}

impl WarmingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn sliding(&self) -> Duration {
        Duration::from_secs(self.sliding_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("REGISTRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
