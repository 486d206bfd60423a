//! Gateway service: health checks bypass verification, everything else must be signed.

use std::future::Future;
use std::pin::Pin;

use http_body_util::Either;
use hyper::service::Service;
use signurl_auth::SignerConfig;
use signurl_http::{SignUrlResponseBody, SignedUrlService, json_response};

use crate::content::ContentService;

/// Server version reported at startup and by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path of the unauthenticated health endpoint.
pub const HEALTH_PATH: &str = "/_signurl/health";

/// Gateway in front of the signed URL middleware.
#[derive(Debug, Clone)]
pub struct GatewayService {
    protected: SignedUrlService<ContentService>,
}

impl GatewayService {
    /// Create a gateway around the protected service.
    pub fn new(protected: SignedUrlService<ContentService>) -> Self {
        Self { protected }
    }
}

impl<B> Service<http::Request<B>> for GatewayService
where
    B: Send + 'static,
{
    type Response = http::Response<SignUrlResponseBody>;
    type Error = std::convert::Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        if is_health_check(req.method(), req.uri().path()) {
            let resp = health_check_response(self.protected.signer());
            return Box::pin(async move { Ok(resp) });
        }

        let protected = self.protected.clone();
        Box::pin(async move {
            let resp = protected.call(req).await.unwrap_or_else(|e| match e {});
            // Content and rejections share one body type.
            Ok(resp.map(|body| match body {
                Either::Left(body) | Either::Right(body) => body,
            }))
        })
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && path == HEALTH_PATH
}

/// Health document: liveness plus the signing parameters clients must agree on.
fn health_check_response(signer: &SignerConfig) -> http::Response<SignUrlResponseBody> {
    let document = serde_json::json!({
        "status": "running",
        "service": "signurl",
        "version": VERSION,
        "algorithm": signer.algorithm().as_str(),
        "ttlSeconds": signer.ttl_seconds(),
    });
    json_response(http::StatusCode::OK, document.to_string())
}
