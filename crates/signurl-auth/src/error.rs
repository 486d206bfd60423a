//! Error types for URL signing.
//!
//! Construction problems surface as [`ConfigError`], bad arguments to the
//! signing and request APIs as [`InputError`]. Verification never fails with an
//! error; it returns a [`VerificationResult`](crate::verifier::VerificationResult).

/// Errors raised while building a [`SignerConfig`](crate::config::SignerConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The secret key is missing or empty.
    #[error("Secret key is required")]
    MissingSecretKey,

    /// The time-to-live must be a positive number of seconds.
    #[error("TTL must be a positive number of seconds")]
    InvalidTtl,

    /// The TTL from the environment is not an integer.
    #[error("Wrong type of TTL parameter, it should be a number: {0}")]
    TtlNotANumber(String),

    /// The hashing algorithm is not supported.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Errors raised by invalid arguments to [`sign`](crate::signer::sign) or
/// [`RequestInfo::new`](crate::request::RequestInfo::new).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The URL to sign is empty.
    #[error("Parameter \"URL\" is not defined")]
    MissingUrl,

    /// The HTTP method is empty.
    #[error("Parameter \"httpMethod\" is not defined")]
    MissingHttpMethod,

    /// The HTTP method is not a valid method token.
    #[error("Invalid HTTP method: {0:?}")]
    InvalidHttpMethod(String),

    /// The URL ends with `/`.
    #[error("URL must not end with /")]
    TrailingSlash,

    /// The request protocol is empty.
    #[error("\"Request.protocol\" is not defined")]
    MissingProtocol,

    /// The request host is empty or absent.
    #[error("\"Request.host\" is not defined")]
    MissingHost,

    /// The request target is empty.
    #[error("\"Request.originalUrl\" is not defined")]
    MissingOriginalUrl,

    /// The request method is empty.
    #[error("\"Request.method\" is not defined")]
    MissingMethod,
}
