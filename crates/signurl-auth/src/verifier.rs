//! Signed URL verification.
//!
//! Verification walks a fixed sequence of checks and stops at the first
//! failure:
//!
//! 1. Locate the `signed` parameter and its terminator ([`Malformed`](VerificationResult::Malformed)).
//! 2. Recompute the token over the canonical part and compare it in constant
//!    time ([`SignatureInvalid`](VerificationResult::SignatureInvalid)).
//! 3. Decode the metadata ([`Malformed`](VerificationResult::Malformed)).
//! 4. Compare the bound method ([`MethodMismatch`](VerificationResult::MethodMismatch)).
//! 5. Compare the expiry with the clock ([`Expired`](VerificationResult::Expired)).
//!
//! The signature is checked before any metadata field is read.

use std::fmt;

use chrono::Utc;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::split_signed_url;
use crate::config::SignerConfig;
use crate::kdf::derive;
use crate::metadata::decode;
use crate::request::RequestInfo;

/// Outcome of verifying a signed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationResult {
    /// Signature, method and expiry all check out.
    Valid,
    /// The token does not match the canonical string.
    SignatureInvalid,
    /// The URL was signed for a different HTTP method.
    MethodMismatch,
    /// The URL is past its expiry.
    Expired,
    /// The signed parameter is missing or cannot be parsed.
    Malformed,
}

impl VerificationResult {
    /// Whether the request may proceed.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// Short machine-friendly name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::SignatureInvalid => "signature_invalid",
            Self::MethodMismatch => "method_mismatch",
            Self::Expired => "expired",
            Self::Malformed => "malformed",
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verify `url` for a request made with `method`, using the current time.
///
/// # Examples
///
/// ```
/// use signurl_auth::config::SignerConfig;
/// use signurl_auth::signer::sign;
/// use signurl_auth::verifier::{VerificationResult, verify};
///
/// let config = SignerConfig::new("s3cret", Some(60), None).unwrap();
/// let signed = sign(&config, "http://h/x", "GET").unwrap();
/// assert_eq!(verify(&config, &signed, "GET"), VerificationResult::Valid);
/// assert_eq!(verify(&config, &signed, "POST"), VerificationResult::MethodMismatch);
/// ```
#[must_use]
pub fn verify(config: &SignerConfig, url: &str, method: &str) -> VerificationResult {
    verify_at(config, url, method, Utc::now().timestamp())
}

/// Verify `url` as if the current time were `now` (Unix epoch seconds).
#[must_use]
pub fn verify_at(config: &SignerConfig, url: &str, method: &str, now: i64) -> VerificationResult {
    let Some(parts) = split_signed_url(url) else {
        debug!(url, "signed parameter is not defined");
        return VerificationResult::Malformed;
    };

    let expected = derive(parts.canonical, config.secret_key(), config.algorithm());
    if !bool::from(expected.as_bytes().ct_eq(parts.token.as_bytes())) {
        debug!(url, "URL signature is not valid");
        return VerificationResult::SignatureInvalid;
    }

    let Ok(metadata) = decode(parts.encoded_metadata) else {
        debug!(url, "signed metadata could not be decoded");
        return VerificationResult::Malformed;
    };

    if !metadata.allows_method(method) {
        debug!(
            url,
            signed_method = %metadata.method,
            method,
            "signed URL method mismatch"
        );
        return VerificationResult::MethodMismatch;
    }

    if metadata.is_expired_at(now) {
        debug!(url, expires_at = metadata.expires_at, now, "signed URL expired");
        return VerificationResult::Expired;
    }

    debug!(url, "signed URL verified");
    VerificationResult::Valid
}

/// Verify the URL a request was made to.
#[must_use]
pub fn verify_request(config: &SignerConfig, request: &RequestInfo) -> VerificationResult {
    verify(config, &request.url(), request.method())
}
