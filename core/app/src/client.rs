//! Fire-once HTTP client for the WebLocker backend.
//!
//! Requests are deliberately not retried, deduplicated, or cancelled: a
//! call resolves or fails exactly once and the caller decides what to
//! surface. A non-2xx status is a transport failure, distinct from an
//! application-level `success: false`.

use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use weblock_api_protocol::{
    ApiResponse, AuthActionRequest, LoginRequest, RequestError, UserLookupRequest,
    AUTH_ENDPOINT, LOGIN_ENDPOINT, USER_ENDPOINT,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport-level failure: the request never produced a decodable
/// application response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(#[from] RequestError),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned HTTP {0}")]
    Status(StatusCode),
}

/// Thin JSON-POST client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<ApiResponse, ApiError> {
        self.post(LOGIN_ENDPOINT, request).await
    }

    pub async fn user_lookup(&self, request: &UserLookupRequest) -> Result<ApiResponse, ApiError> {
        self.post(USER_ENDPOINT, request).await
    }

    pub async fn auth_action(&self, request: &AuthActionRequest) -> Result<ApiResponse, ApiError> {
        request.validate()?;
        self.post(AUTH_ENDPOINT, request).await
    }

    async fn post<T>(&self, endpoint: &str, body: &T) -> Result<ApiResponse, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, "sending API request");

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        debug!(%url, %status, "received API response");

        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        Ok(response.json::<ApiResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_json_and_decodes_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login.php"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "username": "alice",
                "password": "x"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).expect("client");
        let response = client
            .login(&LoginRequest {
                username: "alice".to_string(),
                password: "x".to_string(),
            })
            .await
            .expect("response");

        assert!(response.success);
    }

    #[tokio::test]
    async fn non_2xx_is_a_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user.php"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).expect("client");
        let result = client
            .user_lookup(&UserLookupRequest {
                username: "alice".to_string(),
            })
            .await;

        match result {
            Err(ApiError::Status(status)) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_failure() {
        // Bind then drop a listener so the port refuses connections.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = ApiClient::new(format!("http://{}", addr)).expect("client");
        let result = client
            .login(&LoginRequest {
                username: "alice".to_string(),
                password: "x".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApiError::Network(_))));
    }

    #[tokio::test]
    async fn malformed_auth_request_is_rejected_before_sending() {
        let server = MockServer::start().await;
        let client = ApiClient::new(server.uri()).expect("client");

        let mut request = AuthActionRequest::toggle("alice", "example.com", true);
        request.host = None;
        let result = client.auth_action(&request).await;

        assert!(matches!(result, Err(ApiError::Invalid(_))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_tolerated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "websites": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(format!("{}/", server.uri())).expect("client");
        let response = client
            .auth_action(&AuthActionRequest::add("alice", "example.com"))
            .await
            .expect("response");

        assert!(response.success);
        assert!(response.websites_or_empty().is_empty());
    }
}
