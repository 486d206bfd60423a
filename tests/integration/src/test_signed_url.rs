//! Signed URL acceptance and rejection over HTTP.

#[cfg(test)]
mod tests {
    use signurl_auth::sign;

    use crate::{TestServer, client};

    #[tokio::test]
    async fn test_should_serve_signed_url() {
        let server = TestServer::start(60).await.unwrap();
        let signed = sign(server.signer(), &server.url("/try"), "GET").unwrap();

        let resp = client().unwrap().get(&signed).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_should_serve_custom_route() {
        let server = TestServer::start(60).await.unwrap();
        let signed = sign(server.signer(), &server.url("/custom"), "GET").unwrap();

        let resp = client().unwrap().get(&signed).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), "custom");
    }

    #[tokio::test]
    async fn test_should_hide_signed_param_from_inner_service() {
        let server = TestServer::start(60).await.unwrap();
        let signed = sign(server.signer(), &server.url("/echo?page=2"), "GET").unwrap();

        let resp = client().unwrap().get(&signed).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), "/echo?page=2");
    }

    #[tokio::test]
    async fn test_should_return_403_when_token_is_extended() {
        let server = TestServer::start(60).await.unwrap();
        let signed = sign(server.signer(), &server.url("/try"), "GET").unwrap();

        let resp = client()
            .unwrap()
            .get(format!("{signed}1"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
        assert_eq!(resp.text().await.unwrap(), "URL signature is not valid");
    }

    #[tokio::test]
    async fn test_should_return_403_when_path_is_changed() {
        let server = TestServer::start(60).await.unwrap();
        let signed = sign(server.signer(), &server.url("/try"), "GET").unwrap();
        let moved = signed.replacen("/try", "/custom", 1);

        let resp = client().unwrap().get(&moved).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_should_return_400_without_signed_param() {
        let server = TestServer::start(60).await.unwrap();

        let resp = client()
            .unwrap()
            .get(server.url("/try"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.text().await.unwrap(),
            "Signed parameter is not defined"
        );
    }

    #[tokio::test]
    async fn test_should_return_403_for_other_method() {
        let server = TestServer::start(60).await.unwrap();
        let signed = sign(server.signer(), &server.url("/try"), "GET").unwrap();

        let resp = client().unwrap().post(&signed).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
        assert_eq!(
            resp.text().await.unwrap(),
            "URL is not signed for this method"
        );
    }

    #[tokio::test]
    async fn test_should_accept_method_signed_in_lowercase() {
        let server = TestServer::start(60).await.unwrap();
        let signed = sign(server.signer(), &server.url("/try"), "post").unwrap();

        let resp = client().unwrap().post(&signed).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_should_reject_url_signed_with_other_secret() {
        let server = TestServer::start(60).await.unwrap();
        let other = signurl_auth::SignerConfig::new("anotherSecret", Some(60), None).unwrap();
        let signed = sign(&other, &server.url("/try"), "GET").unwrap();

        let resp = client().unwrap().get(&signed).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    }
}
