//! Signer configuration.
//!
//! [`SignerOptions`] holds raw, possibly invalid settings (from code, serde, or
//! environment variables). [`SignerConfig`] is the validated, immutable value
//! that signing and verification read from; the only way to obtain one is
//! through [`SignerConfig::new`] or `SignerConfig::try_from(options)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::constants::DEFAULT_TTL_SECONDS;
use crate::error::ConfigError;

/// Hash function used inside PBKDF2-HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// HMAC-SHA1.
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA384.
    Sha384,
    /// HMAC-SHA512.
    #[default]
    Sha512,
}

impl Algorithm {
    /// Lowercase name of the algorithm, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    /// Parse a hash name such as `sha512` or `SHA-256`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "");
        match normalized.as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(ConfigError::UnsupportedAlgorithm(s.to_owned())),
        }
    }
}

/// Raw signer settings, validated when converted into a [`SignerConfig`].
///
/// # Examples
///
/// ```
/// use signurl_auth::config::{SignerConfig, SignerOptions};
///
/// let options = SignerOptions::builder()
///     .secret_key("s3cret".into())
///     .ttl_seconds(120)
///     .build();
/// let config = SignerConfig::try_from(options).unwrap();
/// assert_eq!(config.ttl_seconds(), 120);
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase", default)]
pub struct SignerOptions {
    /// Secret key used as the PBKDF2 salt.
    #[builder(default)]
    pub secret_key: String,

    /// Seconds a signed URL stays valid.
    #[builder(default = DEFAULT_TTL_SECONDS)]
    pub ttl_seconds: u64,

    /// Hash name, e.g. `sha512`.
    #[builder(default = String::from("sha512"))]
    pub algorithm: String,
}

impl Default for SignerOptions {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            algorithm: Algorithm::default().as_str().to_owned(),
        }
    }
}

impl fmt::Debug for SignerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerOptions")
            .field("secret_key", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl SignerOptions {
    /// Load options from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SIGNURL_SECRET_KEY` | *(empty, rejected on validation)* |
    /// | `SIGNURL_TTL` | `60` |
    /// | `SIGNURL_ALGORITHM` | `sha512` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TtlNotANumber`] when `SIGNURL_TTL` is set but is
    /// not an unsigned integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if let Ok(v) = std::env::var("SIGNURL_SECRET_KEY") {
            options.secret_key = v;
        }
        if let Ok(v) = std::env::var("SIGNURL_TTL") {
            options.ttl_seconds = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::TtlNotANumber(v.clone()))?;
        }
        if let Ok(v) = std::env::var("SIGNURL_ALGORITHM") {
            options.algorithm = v;
        }

        Ok(options)
    }
}

/// Validated, immutable configuration shared by signing and verification.
#[derive(Clone, PartialEq, Eq)]
pub struct SignerConfig {
    secret_key: String,
    ttl_seconds: u64,
    algorithm: Algorithm,
}

impl SignerConfig {
    /// Create a configuration from its parts.
    ///
    /// `ttl_seconds` defaults to 60 and `algorithm` to SHA-512 when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecretKey`] for an empty secret and
    /// [`ConfigError::InvalidTtl`] for a zero TTL.
    pub fn new(
        secret_key: impl Into<String>,
        ttl_seconds: Option<u64>,
        algorithm: Option<Algorithm>,
    ) -> Result<Self, ConfigError> {
        let secret_key = secret_key.into();
        if secret_key.is_empty() {
            return Err(ConfigError::MissingSecretKey);
        }

        let ttl_seconds = ttl_seconds.unwrap_or(DEFAULT_TTL_SECONDS);
        if ttl_seconds == 0 {
            return Err(ConfigError::InvalidTtl);
        }

        Ok(Self {
            secret_key,
            ttl_seconds,
            algorithm: algorithm.unwrap_or_default(),
        })
    }

    /// The secret key.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Seconds a freshly signed URL stays valid.
    #[must_use]
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// The PBKDF2 hash function.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl TryFrom<SignerOptions> for SignerConfig {
    type Error = ConfigError;

    fn try_from(options: SignerOptions) -> Result<Self, Self::Error> {
        let algorithm = options.algorithm.parse::<Algorithm>()?;
        Self::new(options.secret_key, Some(options.ttl_seconds), Some(algorithm))
    }
}

impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerConfig")
            .field("secret_key", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
