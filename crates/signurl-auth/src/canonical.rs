//! Canonical string construction and its inverse.
//!
//! The canonical string is the exact byte sequence fed to the key derivation:
//!
//! ```text
//! <url><connector>signed=<encoded-metadata>;
//! ```
//!
//! `connector` is `?` when the URL has no query yet and `&` otherwise. The
//! signed URL is the canonical string followed directly by the hex token, so
//! verification recovers the canonical string by cutting the incoming URL
//! right after the terminator.

use crate::constants::{QUERY_APPEND, QUERY_BEGIN, SIGNED_PARAM, TERMINATOR};

/// The pieces of a signed URL, borrowed from the incoming string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedUrlParts<'a> {
    /// Everything up to and including the terminator; the string that was signed.
    pub canonical: &'a str,
    /// The percent-encoded metadata block.
    pub encoded_metadata: &'a str,
    /// The signature token appended after the terminator.
    pub token: &'a str,
}

/// Build the canonical string for `base_url` and an encoded metadata block.
///
/// `base_url` must already be validated (non-empty, no trailing `/`).
///
/// # Examples
///
/// ```
/// use signurl_auth::canonical::canonicalize;
///
/// assert_eq!(canonicalize("http://h/x", "abc"), "http://h/x?signed=abc;");
/// assert_eq!(canonicalize("http://h/x?a=1", "abc"), "http://h/x?a=1&signed=abc;");
/// ```
#[must_use]
pub fn canonicalize(base_url: &str, encoded_metadata: &str) -> String {
    let connector = query_connector(base_url);
    format!("{base_url}{connector}{SIGNED_PARAM}={encoded_metadata}{TERMINATOR}")
}

/// Pick the connector that appends a parameter to `url`.
#[must_use]
pub fn query_connector(url: &str) -> char {
    if url.contains(QUERY_BEGIN) {
        QUERY_APPEND
    } else {
        QUERY_BEGIN
    }
}

/// Find the byte offset of the connector that starts the signed parameter.
///
/// The last `&signed=` wins; when there is none, the last `?signed=` is used.
#[must_use]
pub fn locate_signed_param(url: &str) -> Option<usize> {
    url.rfind(&marker(QUERY_APPEND))
        .or_else(|| url.rfind(&marker(QUERY_BEGIN)))
}

/// Split a signed URL into its canonical part, metadata block and token.
///
/// Returns `None` when the signed parameter or its terminator is missing.
///
/// # Examples
///
/// ```
/// use signurl_auth::canonical::split_signed_url;
///
/// let parts = split_signed_url("http://h/x?signed=abc;f00d").unwrap();
/// assert_eq!(parts.canonical, "http://h/x?signed=abc;");
/// assert_eq!(parts.encoded_metadata, "abc");
/// assert_eq!(parts.token, "f00d");
/// ```
#[must_use]
pub fn split_signed_url(url: &str) -> Option<SignedUrlParts<'_>> {
    let param_pos = locate_signed_param(url)?;
    // Connector (1 byte) + `signed=`.
    let metadata_start = param_pos + 1 + SIGNED_PARAM.len() + 1;
    let terminator_pos = metadata_start + url[metadata_start..].rfind(TERMINATOR)?;
    let token_start = terminator_pos + TERMINATOR.len_utf8();

    Some(SignedUrlParts {
        canonical: &url[..token_start],
        encoded_metadata: &url[metadata_start..terminator_pos],
        token: &url[token_start..],
    })
}

/// Remove the signed parameter (and everything after it) from `url`.
///
/// Returns `None` when the URL carries no signed parameter.
///
/// # Examples
///
/// ```
/// use signurl_auth::canonical::strip_signed_param;
///
/// assert_eq!(strip_signed_param("/try?signed=abc;f00d"), Some("/try"));
/// assert_eq!(strip_signed_param("/try?a=1&signed=abc;f00d"), Some("/try?a=1"));
/// assert_eq!(strip_signed_param("/try"), None);
/// ```
#[must_use]
pub fn strip_signed_param(url: &str) -> Option<&str> {
    locate_signed_param(url).map(|pos| &url[..pos])
}

fn marker(connector: char) -> String {
    format!("{connector}{SIGNED_PARAM}=")
}
