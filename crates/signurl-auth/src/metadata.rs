//! Encoding of the signed metadata block.
//!
//! The metadata travels as the value of the `signed` query parameter. Before
//! percent-encoding it looks like:
//!
//! ```text
//! e:<expires-at>;m:<METHOD>;r:<nonce>
//! ```
//!
//! Neither `:` nor `;` survives percent-encoding, so the encoded block never
//! contains a query separator or the terminator that precedes the signature.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::constants::{
    KEY_EXPIRES, KEY_METHOD, KEY_NONCE, METADATA_FIELD_DELIMITER, METADATA_PAIR_SEPARATOR,
};

/// Everything except RFC 3986 unreserved characters is encoded.
const METADATA_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Metadata bound into every signed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedMetadata {
    /// Expiry as Unix epoch seconds.
    pub expires_at: i64,
    /// Allowed HTTP method, uppercase.
    pub method: String,
    /// Opaque random value; only perturbs the signature.
    pub nonce: String,
}

impl SignedMetadata {
    /// Create metadata, normalizing the method to uppercase.
    #[must_use]
    pub fn new(expires_at: i64, method: &str, nonce: impl Into<String>) -> Self {
        Self {
            expires_at,
            method: method.to_ascii_uppercase(),
            nonce: nonce.into(),
        }
    }

    /// Whether `method` matches the bound method, ignoring ASCII case.
    #[must_use]
    pub fn allows_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }

    /// Whether the metadata has expired at `now` (epoch seconds).
    ///
    /// A URL is still valid during the second it expires in.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at < now
    }
}

/// The metadata block could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Malformed;

/// Encode metadata into a percent-encoded query parameter value.
///
/// # Examples
///
/// ```
/// use signurl_auth::metadata::{SignedMetadata, encode};
///
/// let meta = SignedMetadata::new(1_700_000_000, "get", "42");
/// assert_eq!(encode(&meta), "e%3A1700000000%3Bm%3AGET%3Br%3A42");
/// ```
#[must_use]
pub fn encode(metadata: &SignedMetadata) -> String {
    let raw = format!(
        "{KEY_EXPIRES}{METADATA_PAIR_SEPARATOR}{expires}\
         {METADATA_FIELD_DELIMITER}{KEY_METHOD}{METADATA_PAIR_SEPARATOR}{method}\
         {METADATA_FIELD_DELIMITER}{KEY_NONCE}{METADATA_PAIR_SEPARATOR}{nonce}",
        expires = metadata.expires_at,
        method = metadata.method.to_ascii_uppercase(),
        nonce = metadata.nonce,
    );
    utf8_percent_encode(&raw, METADATA_ENCODE_SET).to_string()
}

/// Decode a percent-encoded metadata block.
///
/// # Errors
///
/// Returns [`Malformed`] unless the block decodes to valid UTF-8 holding
/// exactly the keys `e`, `m` and `r` once each, with an integer `e` and a
/// non-empty `m`.
pub fn decode(encoded: &str) -> Result<SignedMetadata, Malformed> {
    let decoded = percent_decode_str(encoded)
        .decode_utf8()
        .map_err(|_| Malformed)?;

    let mut expires = None;
    let mut method = None;
    let mut nonce = None;

    for field in decoded.split(METADATA_FIELD_DELIMITER) {
        let (key, value) = field
            .split_once(METADATA_PAIR_SEPARATOR)
            .ok_or(Malformed)?;
        let slot = match key {
            KEY_EXPIRES => &mut expires,
            KEY_METHOD => &mut method,
            KEY_NONCE => &mut nonce,
            _ => return Err(Malformed),
        };
        if slot.replace(value).is_some() {
            return Err(Malformed);
        }
    }

    let expires_at = expires
        .ok_or(Malformed)?
        .parse::<i64>()
        .map_err(|_| Malformed)?;
    let method = method.filter(|m| !m.is_empty()).ok_or(Malformed)?;
    let nonce = nonce.ok_or(Malformed)?;

    Ok(SignedMetadata::new(expires_at, method, nonce))
}
