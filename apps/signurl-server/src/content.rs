//! The protected resource served behind the verifier.
//!
//! Every request that reaches this service has already passed verification;
//! it answers with a small JSON document describing what was requested.

use std::convert::Infallible;
use std::future::{Ready, ready};

use hyper::service::Service;
use signurl_http::{SignUrlResponseBody, json_response};

/// Service answering verified requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentService;

impl<B> Service<http::Request<B>> for ContentService {
    type Response = http::Response<SignUrlResponseBody>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let body = serde_json::json!({
            "status": "ok",
            "method": req.method().as_str(),
            "path": req.uri().path(),
            "query": req.uri().query(),
        });

        ready(Ok(json_response(http::StatusCode::OK, body.to_string())))
    }
}
