//! Expiry handling over HTTP.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use signurl_auth::sign;
    use signurl_http::{RejectionHandlers, SignUrlResponseBody};

    use crate::{TestServer, client};

    #[tokio::test]
    async fn test_should_return_410_after_ttl() {
        let server = TestServer::start(1).await.unwrap();
        let signed = sign(server.signer(), &server.url("/try"), "GET").unwrap();

        tokio::time::sleep(Duration::from_millis(2_100)).await;

        let resp = client().unwrap().get(&signed).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::GONE);
        assert_eq!(resp.text().await.unwrap(), "Signed URL expired");
    }

    #[tokio::test]
    async fn test_should_use_custom_expired_handler() {
        let handlers = RejectionHandlers::default().with_on_expired(|ctx| {
            http::Response::builder()
                .status(http::StatusCode::UNAUTHORIZED)
                .body(SignUrlResponseBody::from_string(format!(
                    "{} {}",
                    ctx.result,
                    ctx.uri.path()
                )))
                .unwrap()
        });
        let server = TestServer::start_with_handlers(1, handlers).await.unwrap();
        let signed = sign(server.signer(), &server.url("/try"), "GET").unwrap();

        tokio::time::sleep(Duration::from_millis(2_100)).await;

        let resp = client().unwrap().get(&signed).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
        assert_eq!(resp.text().await.unwrap(), "expired /try");
    }

    #[tokio::test]
    async fn test_should_check_signature_before_expiry() {
        let server = TestServer::start(1).await.unwrap();
        let signed = sign(server.signer(), &server.url("/try"), "GET").unwrap();

        tokio::time::sleep(Duration::from_millis(2_100)).await;

        let resp = client()
            .unwrap()
            .get(format!("{signed}0"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    }
}
