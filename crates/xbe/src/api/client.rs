//! HTTP client for the XBE JSON:API.

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Result, XbeError};

use super::query::Query;

/// JSON:API media type.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The four JSON:API verbs.
///
/// Implementations return an error for transport failures and for any
/// non-2xx status; the error carries the raw body when one was returned.
pub trait ApiClient {
    fn get(&self, path: &str, query: &Query) -> Result<ApiResponse>;
    fn post_with_query(&self, path: &str, query: &Query, body: &Value) -> Result<ApiResponse>;
    fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse>;
    fn delete(&self, path: &str) -> Result<ApiResponse>;

    fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.post_with_query(path, &Query::new(), body)
    }
}

/// Turn a non-2xx response into [`XbeError::Http`].
pub fn check_status(method: &str, path: &str, response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        return Ok(response);
    }
    Err(XbeError::Http {
        method: method.to_string(),
        path: path.to_string(),
        status: response.status,
        body: response.body,
    })
}

/// Blocking reqwest-backed client.
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client for the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| XbeError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API_MEDIA_TYPE));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API_MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("xbe-cli/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = &self.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| XbeError::Config(format!("Invalid API token: {}", e)))?,
            );
        }
        Ok(headers)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.url(path))
            .headers(self.build_headers()?))
    }

    fn send(&self, method: &str, path: &str, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request
            .send()
            .map_err(|e| XbeError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| XbeError::Transport(format!("failed to read response body: {}", e)))?;

        debug!(method, path, status, bytes = body.len(), "api response");
        check_status(method, path, ApiResponse::new(status, body))
    }
}

impl ApiClient for HttpClient {
    fn get(&self, path: &str, query: &Query) -> Result<ApiResponse> {
        let pairs: Vec<(&str, &str)> = query.pairs().collect();
        let request = self.request(Method::GET, path)?.query(&pairs);
        self.send("GET", path, request)
    }

    fn post_with_query(&self, path: &str, query: &Query, body: &Value) -> Result<ApiResponse> {
        let pairs: Vec<(&str, &str)> = query.pairs().collect();
        let request = self
            .request(Method::POST, path)?
            .query(&pairs)
            .body(serde_json::to_vec(body)?);
        self.send("POST", path, request)
    }

    fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        let request = self
            .request(Method::PATCH, path)?
            .body(serde_json::to_vec(body)?);
        self.send("PATCH", path, request)
    }

    fn delete(&self, path: &str) -> Result<ApiResponse> {
        let request = self.request(Method::DELETE, path)?;
        self.send("DELETE", path, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str, token: Option<&str>) -> HttpClient {
        HttpClient::new(&ClientConfig {
            base_url: base_url.to_string(),
            token: token.map(str::to_string),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_paths() {
        let client = client("https://app.x-b-e.com/", None);
        assert_eq!(client.base_url(), "https://app.x-b-e.com");
        assert_eq!(
            client.url("/v1/brokers"),
            "https://app.x-b-e.com/v1/brokers"
        );
        assert_eq!(client.url("v1/brokers"), "https://app.x-b-e.com/v1/brokers");
    }

    #[test]
    fn test_headers_include_bearer_only_with_token() {
        let anonymous = client("https://app.x-b-e.com", None).build_headers().unwrap();
        assert!(anonymous.get(AUTHORIZATION).is_none());
        assert_eq!(anonymous.get(ACCEPT).unwrap(), JSON_API_MEDIA_TYPE);

        let authed = client("https://app.x-b-e.com", Some("tok"))
            .build_headers()
            .unwrap();
        assert_eq!(authed.get(AUTHORIZATION).unwrap(), "Bearer tok");
    }

    #[test]
    fn test_check_status() {
        assert!(check_status("GET", "/v1/x", ApiResponse::new(204, "")).is_ok());

        let err = check_status("PATCH", "/v1/x/1", ApiResponse::new(422, "bad")).unwrap_err();
        assert_eq!(err.response_body(), Some("bad"));
        assert_eq!(err.to_string(), "PATCH /v1/x/1 failed: 422");
    }
}
