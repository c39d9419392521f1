use serde::Deserialize;
use std::env;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub amadeus: AmadeusConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Shared secret used to verify identity tokens issued by the identity provider.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Search aggregator credentials. Missing credentials are only an error at
/// the first search, never at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct AmadeusConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 { 30 }

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for the file backend
    #[serde(default = "default_data_path")]
    pub path: String,
    pub redis_url: Option<String>,
}

fn default_data_path() -> String { "data".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_starting_credits")]
    pub starting_credits: u64,
    #[serde(default)]
    pub booking_delay_ms: u64,
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_starting_credits() -> u64 { 1000 }

fn default_currency() -> String { "USD".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Layered load: `default`, then `{RUN_MODE}` and `local` (both optional),
    /// then `AURA_`-prefixed environment variables (`AURA_AMADEUS__API_KEY`).
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&file("default")))
            .add_source(config::File::with_name(&file(&run_mode)).required(false))
            // not checked in
            .add_source(config::File::with_name(&file("local")).required(false))
            .add_source(config::Environment::with_prefix("AURA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_directory_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            r#"
                [server]
                port = 8080

                [auth]
                jwt_secret = "test-secret"

                [amadeus]
                base_url = "https://test.api.amadeus.com"

                [search]

                [storage]
                backend = "memory"

                [business_rules]
                booking_delay_ms = 1000
            "#,
        )
        .unwrap();

        let config = Config::load_from(dir.path()).expect("config should load");
        assert_eq!(config.server.port, 8080);
        assert!(config.amadeus.api_key.is_none());
        assert_eq!(config.search.timeout_seconds, 30);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.path, "data");
        assert_eq!(config.business_rules.starting_credits, 1000);
        assert_eq!(config.business_rules.booking_delay_ms, 1000);
        assert_eq!(config.business_rules.default_currency, "USD");
    }

    #[test]
    fn test_missing_default_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }
}
