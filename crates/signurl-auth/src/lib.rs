//! Time-limited, tamper-evident URLs.
//!
//! A signed URL carries one extra query parameter, `signed`, holding the
//! expiry, the allowed HTTP method and a random nonce, followed by a
//! PBKDF2-derived token computed over everything before it:
//!
//! ```text
//! https://example.com/file?signed=e%3A1700000060%3Bm%3AGET%3Br%3A4821;<64 hex chars>
//! ```
//!
//! The recipient recomputes the token over the URL it received and accepts the
//! request only if the token matches, the method matches and the URL has not
//! expired.
//!
//! # Usage
//!
//! ```rust
//! use signurl_auth::{SignerConfig, VerificationResult, sign, verify};
//!
//! let config = SignerConfig::new("s3cret", Some(60), None).unwrap();
//! let signed = sign(&config, "http://h/x", "GET").unwrap();
//!
//! assert_eq!(verify(&config, &signed, "GET"), VerificationResult::Valid);
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical string construction and parsing
//! - [`config`] - Signer configuration and supported algorithms
//! - [`constants`] - Parameter names and separators
//! - [`error`] - Configuration and input error types
//! - [`kdf`] - PBKDF2 token derivation
//! - [`metadata`] - Metadata block encoding
//! - [`request`] - Framework-independent request view
//! - [`signer`] - URL signing
//! - [`verifier`] - URL verification

pub mod canonical;
pub mod config;
pub mod constants;
pub mod error;
pub mod kdf;
pub mod metadata;
pub mod request;
pub mod signer;
pub mod verifier;

pub use canonical::strip_signed_param;
pub use config::{Algorithm, SignerConfig, SignerOptions};
pub use error::{ConfigError, InputError};
pub use request::RequestInfo;
pub use signer::{sign, sign_at};
pub use verifier::{VerificationResult, verify, verify_at, verify_request};
