//! Configuration module for plaza.

use serde::Deserialize;
use std::path::Path;

use crate::{PlazaError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4002
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/plaza.db".to_string()
}

fn default_max_connections() -> u32 {
    8
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Credential configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign bearer tokens (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
}

fn default_token_expiry() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiry_secs: default_token_expiry(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

/// Feed listing configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FeedConfig {
    /// Page size used when the request has no usable `limit`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Upper bound applied to a requested `limit`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Credential configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Feed listing configuration.
    #[serde(default)]
    pub feed: FeedConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PlazaError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PlazaError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PLAZA_JWT_SECRET`: token signing secret
    /// - `PLAZA_TOKEN_EXPIRY_SECS`: token lifetime in seconds
    /// - `PLAZA_PORT`: HTTP port
    ///
    /// Empty or unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(jwt_secret) = std::env::var("PLAZA_JWT_SECRET") {
            if !jwt_secret.is_empty() {
                self.auth.jwt_secret = jwt_secret;
            }
        }
        if let Some(expiry) = env_parse::<u64>("PLAZA_TOKEN_EXPIRY_SECS") {
            self.auth.token_expiry_secs = expiry;
        }
        if let Some(port) = env_parse::<u16>("PLAZA_PORT") {
            self.server.port = port;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(PlazaError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via the PLAZA_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }
        if self.auth.token_expiry_secs == 0 {
            return Err(PlazaError::Config(
                "token_expiry_secs must be greater than zero".to_string(),
            ));
        }
        if self.feed.default_page_size == 0 || self.feed.max_page_size == 0 {
            return Err(PlazaError::Config(
                "feed page sizes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4002);
        assert!(config.server.cors_origins.is_empty());

        assert_eq!(config.database.path, "data/plaza.db");
        assert_eq!(config.database.max_connections, 8);

        assert!(config.auth.jwt_secret.is_empty());
        assert_eq!(config.auth.token_expiry_secs, 604_800);

        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_empty());

        assert_eq!(config.feed.default_page_size, 10);
        assert_eq!(config.feed.max_page_size, 100);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3000
cors_origins = ["http://localhost:5173"]

[database]
path = "custom/feed.db"
max_connections = 2

[auth]
jwt_secret = "test-secret-key"
token_expiry_secs = 3600

[logging]
level = "debug"
file = "logs/plaza.log"

[feed]
default_page_size = 20
max_page_size = 50
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.database.path, "custom/feed.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.auth.jwt_secret, "test-secret-key");
        assert_eq!(config.auth.token_expiry_secs, 3600);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "logs/plaza.log");
        assert_eq!(config.feed.default_page_size, 20);
        assert_eq!(config.feed.max_page_size, 50);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[auth]
jwt_secret = "only-the-secret"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.auth.jwt_secret, "only-the-secret");
        assert_eq!(config.auth.token_expiry_secs, 604_800);
        assert_eq!(config.server.port, 4002);
        assert_eq!(config.feed.default_page_size, 10);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(PlazaError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(PlazaError::Io(_))));
    }

    #[test]
    fn test_env_overrides() {
        let original = std::env::var("PLAZA_TOKEN_EXPIRY_SECS").ok();

        std::env::set_var("PLAZA_TOKEN_EXPIRY_SECS", "120");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.auth.token_expiry_secs, 120);

        std::env::set_var("PLAZA_TOKEN_EXPIRY_SECS", "not-a-number");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.auth.token_expiry_secs, 604_800);

        match original {
            Some(val) => std::env::set_var("PLAZA_TOKEN_EXPIRY_SECS", val),
            None => std::env::remove_var("PLAZA_TOKEN_EXPIRY_SECS"),
        }
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(PlazaError::Config(_))));

        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_expiry() {
        let mut config = Config::default();
        config.auth.jwt_secret = "secret".to_string();
        config.auth.token_expiry_secs = 0;
        assert!(config.validate().is_err());
    }
}
