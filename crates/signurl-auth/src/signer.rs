//! URL signing.

use chrono::Utc;
use tracing::debug;

use crate::canonical::canonicalize;
use crate::config::SignerConfig;
use crate::constants::{MAX_NONCE_VALUE, URL_SEPARATOR};
use crate::error::InputError;
use crate::kdf::derive;
use crate::metadata::{SignedMetadata, encode};

/// Sign `url` for `http_method`, valid for the configured TTL from now.
///
/// # Errors
///
/// Returns [`InputError`] when `url` or `http_method` is empty, when
/// `http_method` is not a method token, or when `url` ends with `/`.
///
/// # Examples
///
/// ```
/// use signurl_auth::config::SignerConfig;
/// use signurl_auth::signer::sign;
///
/// let config = SignerConfig::new("s3cret", Some(60), None).unwrap();
/// let signed = sign(&config, "http://h/x", "GET").unwrap();
/// assert!(signed.starts_with("http://h/x?signed="));
/// ```
pub fn sign(config: &SignerConfig, url: &str, http_method: &str) -> Result<String, InputError> {
    sign_at(config, url, http_method, Utc::now().timestamp())
}

/// Sign `url` as if the current time were `now` (Unix epoch seconds).
///
/// # Errors
///
/// See [`sign`].
pub fn sign_at(
    config: &SignerConfig,
    url: &str,
    http_method: &str,
    now: i64,
) -> Result<String, InputError> {
    validate_sign_params(url, http_method)?;

    let ttl = i64::try_from(config.ttl_seconds()).unwrap_or(i64::MAX);
    let metadata = SignedMetadata::new(
        now.saturating_add(ttl),
        http_method,
        generate_nonce().to_string(),
    );

    let canonical = canonicalize(url, &encode(&metadata));
    let token = derive(&canonical, config.secret_key(), config.algorithm());

    debug!(
        url,
        method = %metadata.method,
        expires_at = metadata.expires_at,
        algorithm = %config.algorithm(),
        "signed URL"
    );

    Ok(format!("{canonical}{token}"))
}

fn validate_sign_params(url: &str, http_method: &str) -> Result<(), InputError> {
    if url.is_empty() {
        return Err(InputError::MissingUrl);
    }
    if http_method.trim().is_empty() {
        return Err(InputError::MissingHttpMethod);
    }
    // The bound method must survive the metadata round trip unchanged.
    if http::Method::from_bytes(http_method.as_bytes()).is_err() {
        return Err(InputError::InvalidHttpMethod(http_method.to_owned()));
    }
    if url.ends_with(URL_SEPARATOR) {
        return Err(InputError::TrailingSlash);
    }
    Ok(())
}

fn generate_nonce() -> u64 {
    rand::random_range(0..MAX_NONCE_VALUE)
}
