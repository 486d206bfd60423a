//! Server configuration.
//!
//! Configuration values are loaded from environment variables; signer settings
//! are delegated to [`SignerOptions::from_env`].

use serde::{Deserialize, Serialize};
use signurl_auth::{ConfigError, SignerOptions};
use typed_builder::TypedBuilder;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Bind address (e.g. `"0.0.0.0:4570"`).
    #[builder(default = String::from("0.0.0.0:4570"))]
    pub gateway_listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Scheme used to rebuild request URLs.
    #[builder(default = String::from("http"))]
    pub scheme: String,

    /// Whether `X-Forwarded-Proto` / `X-Forwarded-Host` are trusted.
    #[builder(default = false)]
    pub trust_forwarded_headers: bool,

    /// Raw signer settings.
    #[builder(default)]
    pub signer: SignerOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:4570"),
            log_level: String::from("info"),
            scheme: String::from("http"),
            trust_forwarded_headers: false,
            signer: SignerOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:4570` |
    /// | `LOG_LEVEL` | `info` |
    /// | `SIGNURL_SCHEME` | `http` |
    /// | `SIGNURL_TRUST_FORWARDED` | `false` |
    /// | `SIGNURL_SECRET_KEY` | *(required)* |
    /// | `SIGNURL_TTL` | `60` |
    /// | `SIGNURL_ALGORITHM` | `sha512` |
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `SIGNURL_TTL` is not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            signer: SignerOptions::from_env()?,
            ..Self::default()
        };

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("SIGNURL_SCHEME") {
            config.scheme = v;
        }
        if let Ok(v) = std::env::var("SIGNURL_TRUST_FORWARDED") {
            config.trust_forwarded_headers = parse_bool(&v);
        }

        Ok(config)
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.gateway_listen, "0.0.0.0:4570");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scheme, "http");
        assert!(!config.trust_forwarded_headers);
        assert_eq!(config.signer.ttl_seconds, 60);
    }

    #[test]
    fn test_should_build_with_typed_builder() {
        let config = ServerConfig::builder()
            .gateway_listen("127.0.0.1:9999".into())
            .scheme("https".into())
            .trust_forwarded_headers(true)
            .signer(SignerOptions::builder().secret_key("k".into()).build())
            .build();

        assert_eq!(config.gateway_listen, "127.0.0.1:9999");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scheme, "https");
        assert!(config.trust_forwarded_headers);
        assert_eq!(config.signer.secret_key, "k");
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let json = serde_json::to_string(&ServerConfig::default()).expect("test serialization");
        assert!(json.contains("gatewayListen"));
        assert!(json.contains("trustForwardedHeaders"));
        assert!(json.contains("ttlSeconds"));
    }

    #[test]
    fn test_should_parse_bool_values() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }
}
