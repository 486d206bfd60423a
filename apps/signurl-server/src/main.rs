//! Signed URL gateway.
//!
//! Serves a protected resource that only answers requests carrying a valid
//! signed URL, and exposes a health check endpoint for orchestration systems.
//! The same binary can mint signed URLs for operators.
//!
//! # Usage
//!
//! ```text
//! SIGNURL_SECRET_KEY=s3cr3t signurl-server
//! SIGNURL_SECRET_KEY=s3cr3t signurl-server --sign http://localhost:4570/files/a.txt GET
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:4570` | Bind address |
//! | `SIGNURL_SECRET_KEY` | *(required)* | Secret used to derive tokens |
//! | `SIGNURL_TTL` | `60` | Lifetime of minted URLs in seconds |
//! | `SIGNURL_ALGORITHM` | `sha512` | PBKDF2 digest (`sha1`, `sha256`, `sha384`, `sha512`) |
//! | `SIGNURL_SCHEME` | `http` | Scheme used to rebuild request URLs |
//! | `SIGNURL_TRUST_FORWARDED` | `false` | Trust `X-Forwarded-Proto` / `X-Forwarded-Host` |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod config;
mod content;
mod gateway;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use signurl_auth::{SignerConfig, sign};
use signurl_http::{SignedUrlHttpConfig, SignedUrlService};

use crate::config::ServerConfig;
use crate::content::ContentService;
use crate::gateway::{GatewayService, HEALTH_PATH, VERSION};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the [`SignedUrlHttpConfig`] from the application [`ServerConfig`].
fn build_http_config(config: &ServerConfig) -> SignedUrlHttpConfig {
    SignedUrlHttpConfig {
        scheme: config.scheme.clone(),
        trust_forwarded_headers: config.trust_forwarded_headers,
    }
}

/// Extract the `--sign <url> [method]` arguments, if present.
fn sign_args(args: &[String]) -> Option<(&str, &str)> {
    let pos = args.iter().position(|a| a == "--sign")?;
    let url = args.get(pos + 1)?;
    let method = args.get(pos + 2).map_or("GET", String::as_str);
    Some((url.as_str(), method))
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: GatewayService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the gateway and requesting the health endpoint.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET {HEALTH_PATH} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    check_health_response(&response).with_context(|| format!("unhealthy response from {addr}"))
}

/// Validate a raw HTTP/1.1 response from the health endpoint.
fn check_health_response(response: &str) -> Result<()> {
    let (head, body) = response
        .split_once("\r\n\r\n")
        .context("truncated health response")?;
    let status_line = head.lines().next().unwrap_or_default();
    if !status_line.contains(" 200 ") {
        anyhow::bail!("{HEALTH_PATH} answered {status_line:?}");
    }

    let health: serde_json::Value =
        serde_json::from_str(body).context("health response is not JSON")?;
    if health["status"] != "running" {
        anyhow::bail!("{HEALTH_PATH} reports status {}", health["status"]);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = ServerConfig::from_env().context("failed to load configuration")?;

    // Handle --health-check flag for Docker HEALTHCHECK.
    if args.iter().any(|a| a == "--health-check") {
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let signer =
        SignerConfig::try_from(config.signer.clone()).context("invalid signer configuration")?;

    if args.iter().any(|a| a == "--sign") {
        let (url, method) = sign_args(&args).context("usage: signurl-server --sign <url> [method]")?;
        let signed = sign(&signer, url, method).with_context(|| format!("cannot sign {url}"))?;
        println!("{signed}");
        return Ok(());
    }

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        scheme = %config.scheme,
        trust_forwarded_headers = config.trust_forwarded_headers,
        ttl_seconds = signer.ttl_seconds(),
        algorithm = %signer.algorithm(),
        version = VERSION,
        "starting signed URL gateway",
    );

    let protected = SignedUrlService::new(ContentService, signer, build_http_config(&config));
    let service = GatewayService::new(protected);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_should_build_http_config_from_server_config() {
        let config = ServerConfig::builder()
            .scheme("https".into())
            .trust_forwarded_headers(true)
            .build();
        let http_config = build_http_config(&config);

        assert_eq!(http_config.scheme, "https");
        assert!(http_config.trust_forwarded_headers);
    }

    #[test]
    fn test_should_parse_sign_args_with_default_method() {
        let args = args(&["signurl-server", "--sign", "http://localhost/a"]);
        assert_eq!(sign_args(&args), Some(("http://localhost/a", "GET")));
    }

    #[test]
    fn test_should_parse_sign_args_with_method() {
        let args = args(&["signurl-server", "--sign", "http://localhost/a", "post"]);
        assert_eq!(sign_args(&args), Some(("http://localhost/a", "post")));
    }

    #[test]
    fn test_should_accept_running_health_response() {
        let response = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\r\n\
                        {\"status\":\"running\",\"service\":\"signurl\"}";
        assert!(check_health_response(response).is_ok());
    }

    #[test]
    fn test_should_reject_unhealthy_responses() {
        // Rejected by the verifier instead of answered by the gateway.
        let rejected = "HTTP/1.1 400 Bad Request\r\n\r\nSigned parameter is not defined";
        assert!(check_health_response(rejected).is_err());

        let stopping = "HTTP/1.1 200 OK\r\n\r\n{\"status\":\"stopping\"}";
        assert!(check_health_response(stopping).is_err());

        assert!(check_health_response("HTTP/1.1 200 OK\r\n").is_err());
    }

    #[test]
    fn test_should_reject_sign_without_url() {
        let args = args(&["signurl-server", "--sign"]);
        assert_eq!(sign_args(&args), None);
    }
}
