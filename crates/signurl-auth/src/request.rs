//! Framework-independent view of an incoming request.
//!
//! Verification needs only four values from a request: the protocol, the
//! host, the request target as received and the method. [`RequestInfo`] holds
//! them; [`RequestInfo::from_parts`] extracts them from `http` request parts.

use crate::error::InputError;

/// Request values needed to rebuild the signed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    protocol: String,
    host: String,
    original_url: String,
    method: String,
}

impl RequestInfo {
    /// Create a request view, rejecting empty fields.
    ///
    /// # Errors
    ///
    /// Returns the [`InputError`] naming the first empty field.
    pub fn new(
        protocol: impl Into<String>,
        host: impl Into<String>,
        original_url: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self, InputError> {
        let info = Self {
            protocol: protocol.into(),
            host: host.into(),
            original_url: original_url.into(),
            method: method.into(),
        };

        if info.protocol.is_empty() {
            return Err(InputError::MissingProtocol);
        }
        if info.host.is_empty() {
            return Err(InputError::MissingHost);
        }
        if info.original_url.is_empty() {
            return Err(InputError::MissingOriginalUrl);
        }
        if info.method.is_empty() {
            return Err(InputError::MissingMethod);
        }

        Ok(info)
    }

    /// Build a request view from `http` request parts.
    ///
    /// The host comes from the `Host` header, falling back to the URI
    /// authority (HTTP/2 requests carry it there). `protocol` is supplied by
    /// the caller since the server knows whether it terminated TLS.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MissingHost`] when neither source names a host.
    pub fn from_parts(parts: &http::request::Parts, protocol: &str) -> Result<Self, InputError> {
        let host = parts
            .headers
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned)
            .or_else(|| parts.uri.authority().map(|a| a.as_str().to_owned()))
            .ok_or(InputError::MissingHost)?;

        let original_url = parts
            .uri
            .path_and_query()
            .map_or("/", http::uri::PathAndQuery::as_str);

        Self::new(protocol, host, original_url, parts.method.as_str())
    }

    /// The protocol, e.g. `https`.
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// The host, including a port when present.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The request target (path and query) as received.
    #[must_use]
    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    /// The HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The absolute URL the client requested.
    ///
    /// # Examples
    ///
    /// ```
    /// use signurl_auth::request::RequestInfo;
    ///
    /// let info = RequestInfo::new("https", "example.com", "/a?b=1", "GET").unwrap();
    /// assert_eq!(info.url(), "https://example.com/a?b=1");
    /// ```
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.protocol, self.host, self.original_url)
    }
}
