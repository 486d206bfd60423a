//! Hyper middleware for signed URL verification.
//!
//! This crate puts [`signurl_auth`] in front of any hyper service:
//!
//! - **Service** ([`service`]): [`SignedUrlService`](service::SignedUrlService)
//!   verifies each request URL, strips the `signed` parameter from valid ones and
//!   forwards them to the inner service.
//! - **Handlers** ([`handler`]): injectable rejection handlers with defaults
//!   answering 400 (malformed), 403 (invalid signature or method) and 410 (expired).
//! - **Body** ([`body`]): the buffered [`SignUrlResponseBody`](body::SignUrlResponseBody)
//!   and the plain-text / JSON response builders used for rejections.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> SignedUrlService (hyper Service)
//!     -> RequestInfo (scheme + Host + request target + method)
//!     -> verify_request on the blocking pool
//!     -> Valid:    strip `signed`, call inner service
//!     -> Rejected: on_invalid / on_expired handler
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use signurl_auth::SignerConfig;
//! use signurl_http::{SignedUrlHttpConfig, SignedUrlService};
//!
//! let signer = SignerConfig::new("s3cret", Some(60), None)?;
//! let service = SignedUrlService::new(inner, signer, SignedUrlHttpConfig::default());
//! // Use `service` with a hyper server.
//! ```

pub mod body;
pub mod handler;
pub mod service;

pub use body::{SignUrlResponseBody, json_response, text_response};
pub use handler::{RejectionContext, RejectionHandler, RejectionHandlers};
pub use service::{SignedUrlHttpConfig, SignedUrlService, verify_request_async};
