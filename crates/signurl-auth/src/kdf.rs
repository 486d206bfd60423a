//! Signature derivation.
//!
//! The signature token is PBKDF2-HMAC over the canonical string, salted with
//! the secret key:
//!
//! ```text
//! token = hex(PBKDF2-HMAC-<hash>(password = canonical, salt = secret,
//!                                rounds = 10000, length = 32))
//! ```
//!
//! The derivation is CPU-heavy. Callers serving many requests
//! should run it off the async executor (see `signurl-http`).

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use crate::config::Algorithm;
use crate::constants::{DERIVED_KEY_LENGTH, ITERATION_COUNT};

/// Derive the hex signature token for `canonical`.
///
/// Identical inputs always produce an identical 64-character lowercase hex
/// string.
///
/// # Examples
///
/// ```
/// use signurl_auth::config::Algorithm;
/// use signurl_auth::kdf::derive;
///
/// let token = derive("http://h/x?signed=e%3A1%3Bm%3AGET%3Br%3A0;", "s3cret", Algorithm::Sha512);
/// assert_eq!(token.len(), 64);
/// ```
#[must_use]
pub fn derive(canonical: &str, secret_key: &str, algorithm: Algorithm) -> String {
    let password = canonical.as_bytes();
    let salt = secret_key.as_bytes();
    let mut key = [0u8; DERIVED_KEY_LENGTH];

    match algorithm {
        Algorithm::Sha1 => pbkdf2_hmac::<Sha1>(password, salt, ITERATION_COUNT, &mut key),
        Algorithm::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, ITERATION_COUNT, &mut key),
        Algorithm::Sha384 => pbkdf2_hmac::<Sha384>(password, salt, ITERATION_COUNT, &mut key),
        Algorithm::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, ITERATION_COUNT, &mut key),
    }

    hex::encode(key)
}
