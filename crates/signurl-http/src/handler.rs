//! Rejection handlers.
//!
//! When verification fails the middleware hands a [`RejectionContext`] to one
//! of two handlers: `on_invalid` for malformed, tampered or wrong-method URLs
//! and `on_expired` for expired ones. Both can be replaced; the defaults answer
//! with a short plain-text body and the status from [`rejection_status`].

use std::fmt;
use std::sync::Arc;

use signurl_auth::VerificationResult;

use crate::body::{SignUrlResponseBody, text_response};

/// Details of a rejected request passed to a [`RejectionHandler`].
#[derive(Debug, Clone)]
pub struct RejectionContext {
    /// Why the request was rejected; never [`VerificationResult::Valid`].
    pub result: VerificationResult,
    /// The request method.
    pub method: http::Method,
    /// The request URI as received.
    pub uri: http::Uri,
}

/// A caller-supplied rejection handler.
pub type RejectionHandler =
    Arc<dyn Fn(&RejectionContext) -> http::Response<SignUrlResponseBody> + Send + Sync>;

/// The pair of handlers consulted on rejection.
#[derive(Clone)]
pub struct RejectionHandlers {
    on_invalid: RejectionHandler,
    on_expired: RejectionHandler,
}

impl Default for RejectionHandlers {
    fn default() -> Self {
        Self {
            on_invalid: Arc::new(default_on_invalid),
            on_expired: Arc::new(default_on_expired),
        }
    }
}

impl fmt::Debug for RejectionHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectionHandlers").finish_non_exhaustive()
    }
}

impl RejectionHandlers {
    /// Use `handler` for malformed, invalid and method-mismatch rejections.
    #[must_use]
    pub fn with_on_invalid<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RejectionContext) -> http::Response<SignUrlResponseBody> + Send + Sync + 'static,
    {
        self.on_invalid = Arc::new(handler);
        self
    }

    /// Use `handler` for expired URLs.
    #[must_use]
    pub fn with_on_expired<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RejectionContext) -> http::Response<SignUrlResponseBody> + Send + Sync + 'static,
    {
        self.on_expired = Arc::new(handler);
        self
    }

    /// Dispatch `ctx` to the matching handler.
    #[must_use]
    pub fn handle(&self, ctx: &RejectionContext) -> http::Response<SignUrlResponseBody> {
        match ctx.result {
            VerificationResult::Expired => (self.on_expired)(ctx),
            _ => (self.on_invalid)(ctx),
        }
    }
}

/// Status code used by the default handlers for each result.
#[must_use]
pub fn rejection_status(result: VerificationResult) -> http::StatusCode {
    match result {
        VerificationResult::Valid => http::StatusCode::OK,
        VerificationResult::Malformed => http::StatusCode::BAD_REQUEST,
        VerificationResult::SignatureInvalid | VerificationResult::MethodMismatch => {
            http::StatusCode::FORBIDDEN
        }
        VerificationResult::Expired => http::StatusCode::GONE,
    }
}

/// Default `on_invalid`: 400 for malformed URLs, 403 otherwise.
#[must_use]
pub fn default_on_invalid(ctx: &RejectionContext) -> http::Response<SignUrlResponseBody> {
    let message = match ctx.result {
        VerificationResult::Malformed => "Signed parameter is not defined",
        VerificationResult::MethodMismatch => "URL is not signed for this method",
        _ => "URL signature is not valid",
    };
    text_response(rejection_status(ctx.result), message)
}

/// Default `on_expired`: 410.
#[must_use]
pub fn default_on_expired(ctx: &RejectionContext) -> http::Response<SignUrlResponseBody> {
    text_response(rejection_status(ctx.result), "Signed URL expired")
}

/// Response for a verification task that did not complete.
#[must_use]
pub fn internal_error_response() -> http::Response<SignUrlResponseBody> {
    text_response(
        http::StatusCode::INTERNAL_SERVER_ERROR,
        "Signed URL verification failed",
    )
}
