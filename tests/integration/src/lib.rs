//! End-to-end tests for the signed URL middleware.
//!
//! Each test starts an in-process server on an ephemeral port, mints URLs with
//! the same [`SignerConfig`] and requests them over real HTTP with `reqwest`.
//!
//! Run them with:
//! ```text
//! cargo test -p signurl-integration
//! ```

use std::convert::Infallible;
use std::future::{Ready, ready};
use std::net::SocketAddr;
use std::sync::Once;

use anyhow::Context;
use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use signurl_auth::SignerConfig;
use signurl_http::{
    RejectionHandlers, SignUrlResponseBody, SignedUrlHttpConfig, SignedUrlService, text_response,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::warn;

static INIT: Once = Once::new();

/// Secret shared by the test server and the URLs the tests mint.
pub const TEST_SECRET: &str = "secretTest";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Routes served behind the verifier. `/echo` answers with the URI it received.
#[derive(Debug, Clone, Copy)]
struct RouteService;

impl<B> Service<http::Request<B>> for RouteService {
    type Response = http::Response<SignUrlResponseBody>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let (status, body) = match req.uri().path() {
            "/try" => (http::StatusCode::OK, "ok".to_owned()),
            "/custom" => (http::StatusCode::OK, "custom".to_owned()),
            "/echo" => (http::StatusCode::OK, req.uri().to_string()),
            _ => (http::StatusCode::NOT_FOUND, "not found".to_owned()),
        };

        ready(Ok(text_response(status, body)))
    }
}

/// A running test server; the accept loop stops when this is dropped.
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    signer: SignerConfig,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with the default rejection handlers.
    pub async fn start(ttl_seconds: u64) -> anyhow::Result<Self> {
        Self::start_with_handlers(ttl_seconds, RejectionHandlers::default()).await
    }

    /// Start a server with custom rejection handlers.
    pub async fn start_with_handlers(
        ttl_seconds: u64,
        handlers: RejectionHandlers,
    ) -> anyhow::Result<Self> {
        init_tracing();

        let signer = SignerConfig::new(TEST_SECRET, Some(ttl_seconds), None)
            .context("invalid test signer")?;
        let service =
            SignedUrlService::new(RouteService, signer.clone(), SignedUrlHttpConfig::default())
                .with_handlers(handlers);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;

        let task = tokio::spawn(async move {
            let http = HttpConnBuilder::new(TokioExecutor::new());
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let conn = http
                    .serve_connection(TokioIo::new(stream), service.clone())
                    .into_owned();
                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        warn!(error = %e, "connection error");
                    }
                });
            }
        });

        Ok(Self { addr, signer, task })
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Signer configuration shared with the server.
    #[must_use]
    pub fn signer(&self) -> &SignerConfig {
        &self.signer
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// HTTP client that never goes through a proxy.
pub fn client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .context("failed to build http client")
}

mod test_expiry;
mod test_signed_url;
