//! Responses produced by the middleware itself.
//!
//! Rejections and the small documents a gateway answers with are always short
//! and fully buffered, so [`SignUrlResponseBody`] is a single in-memory frame.
//! [`text_response`] and [`json_response`] build complete responses around it.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http_body::{Body, Frame, SizeHint};
use http_body_util::Full;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Buffered body of a response produced without calling the inner service.
#[derive(Debug)]
pub struct SignUrlResponseBody(Full<Bytes>);

impl SignUrlResponseBody {
    /// Body holding `s`.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(Full::new(Bytes::from(s.into())))
    }
}

impl Default for SignUrlResponseBody {
    fn default() -> Self {
        Self(Full::new(Bytes::new()))
    }
}

impl Body for SignUrlResponseBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.get_mut().0).poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.0.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.0.size_hint()
    }
}

/// Plain-text response with `status`.
#[must_use]
pub fn text_response(
    status: http::StatusCode,
    message: impl Into<String>,
) -> http::Response<SignUrlResponseBody> {
    with_content_type(status, TEXT_PLAIN, message.into())
}

/// JSON response with `status`; `document` must already be serialized.
#[must_use]
pub fn json_response(
    status: http::StatusCode,
    document: impl Into<String>,
) -> http::Response<SignUrlResponseBody> {
    with_content_type(status, APPLICATION_JSON, document.into())
}

fn with_content_type(
    status: http::StatusCode,
    content_type: &'static str,
    body: String,
) -> http::Response<SignUrlResponseBody> {
    let mut resp = http::Response::new(SignUrlResponseBody::from_string(body));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}
