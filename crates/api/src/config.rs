//! Application Configuration
//!
//! Layered with the `config` crate: an optional TOML file, then environment
//! variables prefixed `TUTOR_` using `__` for nesting, e.g.
//! `TUTOR_GATEWAY__API_KEY` or `TUTOR_SERVER__BIND_ADDR`.

use ai_gateway::GatewayConfig;
use config::{Config, ConfigError, Environment, File};
use learner_auth::SessionConfig;
use serde::Deserialize;
use storage::RetentionLimits;

use crate::rate_limit::RateLimitConfig;

/// Config file looked up when no path is given (extension optional)
pub const DEFAULT_CONFIG_PATH: &str = "config/tutor";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TUTOR";

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub storage: RetentionLimits,
    pub sessions: SessionConfig,
}

impl AppConfig {
    /// Load configuration. An explicit path must exist; the default one may not.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(path.is_some());

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert!(config.gateway.api_key.is_none());
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.sessions.ttl_secs, learner_auth::DEFAULT_SESSION_TTL_SECS);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(AppConfig::load(Some("/nonexistent/tutor-config.toml")).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("tutor-config-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
bind_addr = "127.0.0.1:9000"

[gateway]
model = "gpt-4o-mini"
request_timeout_secs = 15

[logging]
json = true

[sessions]
ttl_secs = 3600
"#
        )
        .unwrap();

        let config = AppConfig::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.gateway.model, "gpt-4o-mini");
        assert_eq!(config.gateway.request_timeout_secs, Some(15));
        assert_eq!(config.gateway.base_url, GatewayConfig::default().base_url);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.sessions.ttl_secs, 3600);
    }
}
