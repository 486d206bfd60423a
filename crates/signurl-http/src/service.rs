//! The signed URL middleware implementing hyper's `Service` trait.
//!
//! [`SignedUrlService`] wraps an inner service. For every request it:
//!
//! 1. Rebuilds the absolute URL from the scheme, host and request target
//! 2. Verifies it on tokio's blocking pool (key derivation is CPU-heavy)
//! 3. On success, strips the `signed` parameter from the URI and calls the inner service
//! 4. On failure, answers with the configured [`RejectionHandlers`]

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http_body_util::Either;
use hyper::service::Service;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

use signurl_auth::{
    InputError, RequestInfo, SignerConfig, VerificationResult, strip_signed_param, verify_request,
};

use crate::body::SignUrlResponseBody;
use crate::handler::{RejectionContext, RejectionHandlers, internal_error_response};

/// Configuration for rebuilding the URL a client requested.
#[derive(Debug, Clone)]
pub struct SignedUrlHttpConfig {
    /// Scheme of the URLs being signed (`http` or `https`).
    pub scheme: String,
    /// Whether to take scheme and host from `X-Forwarded-Proto` / `X-Forwarded-Host`.
    pub trust_forwarded_headers: bool,
}

impl Default for SignedUrlHttpConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_owned(),
            trust_forwarded_headers: false,
        }
    }
}

/// Middleware that only lets requests with a valid signed URL through.
pub struct SignedUrlService<S> {
    inner: S,
    signer: Arc<SignerConfig>,
    config: Arc<SignedUrlHttpConfig>,
    handlers: Arc<RejectionHandlers>,
}

impl<S> SignedUrlService<S> {
    /// Wrap `inner` with signed URL verification using the default handlers.
    #[must_use]
    pub fn new(inner: S, signer: SignerConfig, config: SignedUrlHttpConfig) -> Self {
        Self {
            inner,
            signer: Arc::new(signer),
            config: Arc::new(config),
            handlers: Arc::new(RejectionHandlers::default()),
        }
    }

    /// Replace the rejection handlers.
    #[must_use]
    pub fn with_handlers(mut self, handlers: RejectionHandlers) -> Self {
        self.handlers = Arc::new(handlers);
        self
    }

    /// The signer configuration used for verification.
    #[must_use]
    pub fn signer(&self) -> &SignerConfig {
        &self.signer
    }
}

impl<S: Clone> Clone for SignedUrlService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            signer: Arc::clone(&self.signer),
            config: Arc::clone(&self.config),
            handlers: Arc::clone(&self.handlers),
        }
    }
}

impl<S> std::fmt::Debug for SignedUrlService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedUrlService")
            .field("signer", &self.signer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S, B, ResBody> Service<http::Request<B>> for SignedUrlService<S>
where
    S: Service<http::Request<B>, Response = http::Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    B: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = http::Response<Either<ResBody, SignUrlResponseBody>>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let inner = self.inner.clone();
        let signer = Arc::clone(&self.signer);
        let config = Arc::clone(&self.config);
        let handlers = Arc::clone(&self.handlers);

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            let result = match request_info(&parts, &config) {
                Ok(info) => match verify_request_async(signer, info).await {
                    Ok(result) => result,
                    Err(err) => {
                        error!(error = %err, uri = %parts.uri, "signed URL verification task failed");
                        return Ok(internal_error_response().map(Either::Right));
                    }
                },
                Err(err) => {
                    debug!(error = %err, uri = %parts.uri, "cannot rebuild request URL");
                    VerificationResult::Malformed
                }
            };

            if result.is_valid() {
                if let Some(uri) = strip_signed_param_from_uri(&parts.uri) {
                    parts.uri = uri;
                }
                debug!(method = %parts.method, uri = %parts.uri, "signed URL accepted");
                let response = inner.call(http::Request::from_parts(parts, body)).await?;
                return Ok(response.map(Either::Left));
            }

            let ctx = RejectionContext {
                result,
                method: parts.method,
                uri: parts.uri,
            };
            let response = handlers.handle(&ctx);
            warn!(
                method = %ctx.method,
                uri = %ctx.uri,
                result = %ctx.result,
                status = response.status().as_u16(),
                "signed URL rejected"
            );
            Ok(response.map(Either::Right))
        })
    }
}

/// Verify a request on tokio's blocking pool.
///
/// Key derivation is CPU-bound; this keeps it off the async worker threads.
///
/// # Errors
///
/// Returns the [`JoinError`] when the verification task panics or is cancelled.
pub async fn verify_request_async(
    signer: Arc<SignerConfig>,
    info: RequestInfo,
) -> Result<VerificationResult, JoinError> {
    tokio::task::spawn_blocking(move || verify_request(&signer, &info)).await
}

/// Build the [`RequestInfo`] for a request, honoring forwarded headers when trusted.
fn request_info(
    parts: &http::request::Parts,
    config: &SignedUrlHttpConfig,
) -> Result<RequestInfo, InputError> {
    if !config.trust_forwarded_headers {
        return RequestInfo::from_parts(parts, &config.scheme);
    }

    let protocol = forwarded_value(parts, "x-forwarded-proto").unwrap_or(config.scheme.as_str());
    match forwarded_value(parts, "x-forwarded-host") {
        Some(host) => RequestInfo::new(
            protocol,
            host,
            parts
                .uri
                .path_and_query()
                .map_or("/", http::uri::PathAndQuery::as_str),
            parts.method.as_str(),
        ),
        None => RequestInfo::from_parts(parts, protocol),
    }
}

/// First comma-separated value of a forwarding header.
fn forwarded_value<'a>(parts: &'a http::request::Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Return `uri` without the signed parameter, or `None` when nothing changes.
fn strip_signed_param_from_uri(uri: &http::Uri) -> Option<http::Uri> {
    let path_and_query = uri.path_and_query()?;
    let stripped = strip_signed_param(path_and_query.as_str())?;
    let stripped = if stripped.is_empty() { "/" } else { stripped };

    let mut uri_parts = uri.clone().into_parts();
    uri_parts.path_and_query = Some(stripped.parse().ok()?);
    http::Uri::from_parts(uri_parts).ok()
}
