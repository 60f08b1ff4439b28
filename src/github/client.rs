// src/github/client.rs
// =============================================================================
// The one HTTP client a stub run uses.
//
// It is built once in main() and passed down to everything that talks to
// GitHub. reqwest::Client is reference counted internally, so cloning a
// GitHubClient into a spawned download task is cheap and every clone shares
// the same connection pool.
//
// When a token is configured, every request carries
//     Authorization: token <value>
// The header is installed as a default header, so callers never have to
// remember it.
// =============================================================================

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::error::StubError;

// GitHub rejects API requests that don't identify themselves
const USER_AGENT: &str = concat!("repo-stub/", env!("CARGO_PKG_VERSION"));

// Deadline for a whole JSON API call, body included. Raw downloads have
// none: a large template file may legitimately take longer.
const API_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client that authenticates every request when a token is set.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_timeout: Duration,
}

impl GitHubClient {
    /// Builds the client. An empty token counts as no token.
    pub fn new(token: Option<&str>) -> Result<Self, StubError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("token {}", token))
                .map_err(|_| StubError::InvalidToken)?;
            // Keeps the token out of Debug output
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|source| StubError::Transport {
                url: String::new(),
                source,
            })?;

        Ok(Self {
            http,
            api_timeout: API_TIMEOUT,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_api_timeout(mut self, api_timeout: Duration) -> Self {
        self.api_timeout = api_timeout;
        self
    }

    /// Sends a GET and returns the response if the server said 200 OK.
    ///
    /// The body is left unread so downloads can stream it. No overall
    /// deadline applies, only the connect timeout.
    pub async fn get(&self, url: &Url) -> Result<Response, StubError> {
        self.send(url, None).await
    }

    /// GET the whole body into memory. Used for the small JSON payloads,
    /// which must finish within the API timeout.
    pub async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, StubError> {
        let response = self.send(url, Some(self.api_timeout)).await?;
        let body = response
            .bytes()
            .await
            .map_err(|source| StubError::Transport {
                url: url.to_string(),
                source,
            })?;
        Ok(body.to_vec())
    }

    async fn send(&self, url: &Url, deadline: Option<Duration>) -> Result<Response, StubError> {
        let mut request = self.http.get(url.clone());
        if let Some(deadline) = deadline {
            // Per-request timeout: covers reading the body as well
            request = request.timeout(deadline);
        }

        let response = request
            .send()
            .await
            .map_err(|source| StubError::Transport {
                url: url.to_string(),
                source,
            })?;

        if response.status() != StatusCode::OK {
            return Err(StubError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
    }

    #[tokio::test]
    async fn test_token_is_sent_as_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/secure"))
            .and(header("authorization", "token s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(Some("s3cret")).unwrap();
        let body = client.get_bytes(&url(&server, "/secure")).await.unwrap();
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_no_token_means_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/open"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        for token in [None, Some("")] {
            let client = GitHubClient::new(token).unwrap();
            client.get(&url(&server, "/open")).await.unwrap();
        }

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        for request in requests {
            assert!(!request.headers.contains_key("authorization"));
            assert!(request.headers.contains_key("user-agent"));
        }
    }

    #[tokio::test]
    async fn test_non_ok_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = GitHubClient::new(None).unwrap();
        let err = client.get(&url(&server, "/missing")).await.unwrap_err();
        assert!(matches!(err, StubError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_api_deadline_does_not_apply_to_downloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("big file")
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new(None)
            .unwrap()
            .with_api_timeout(Duration::from_millis(100));

        // A JSON call slower than the API deadline gives up
        let err = client.get_bytes(&url(&server, "/slow")).await.unwrap_err();
        match err {
            StubError::Transport { source, .. } => assert!(source.is_timeout()),
            other => panic!("expected a timeout, got {other:?}"),
        }

        // The same slow response is fine as a download
        let response = client.get(&url(&server, "/slow")).await.unwrap();
        assert_eq!(response.text().await.unwrap(), "big file");
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let err = GitHubClient::new(Some("bad\ntoken")).unwrap_err();
        assert!(matches!(err, StubError::InvalidToken));
    }
}
