//! Scripted API client for testing.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::Value;

use crate::error::{Result, XbeError};

use super::client::{ApiClient, ApiResponse, check_status};
use super::query::Query;

/// A request seen by [`MockClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Query,
    pub body: Option<Value>,
}

/// API client that replays queued responses and records every request.
///
/// Responses are consumed in order. A call with nothing queued fails with a
/// transport error, so a test that expects no network traffic can simply
/// queue nothing and assert on [`MockClient::requests`].
#[derive(Default)]
pub struct MockClient {
    responses: RefCell<VecDeque<ApiResponse>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl MockClient {
    /// Create a mock with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response.
    pub fn respond_json(self, status: u16, body: Value) -> Self {
        self.respond(status, body.to_string())
    }

    /// Queue a raw body response.
    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .borrow_mut()
            .push_back(ApiResponse::new(status, body));
        self
    }

    /// Requests made so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn call(&self, method: &str, path: &str, query: Query, body: Option<Value>) -> Result<ApiResponse> {
        self.requests.borrow_mut().push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            query,
            body,
        });

        let response = self.responses.borrow_mut().pop_front().ok_or_else(|| {
            XbeError::Transport(format!("no mock response queued for {} {}", method, path))
        })?;
        check_status(method, path, response)
    }
}

impl ApiClient for MockClient {
    fn get(&self, path: &str, query: &Query) -> Result<ApiResponse> {
        self.call("GET", path, query.clone(), None)
    }

    fn post_with_query(&self, path: &str, query: &Query, body: &Value) -> Result<ApiResponse> {
        self.call("POST", path, query.clone(), Some(body.clone()))
    }

    fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.call("PATCH", path, Query::new(), Some(body.clone()))
    }

    fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.call("DELETE", path, Query::new(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_replays_in_order_and_records() {
        let mock = MockClient::new()
            .respond_json(200, json!({"data": []}))
            .respond(404, "missing");

        let first = mock.get("/v1/brokers", &Query::new()).unwrap();
        assert_eq!(first.status, 200);

        let err = mock.delete("/v1/brokers/1").unwrap_err();
        assert_eq!(err.response_body(), Some("missing"));

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[1].path, "/v1/brokers/1");
    }

    #[test]
    fn test_empty_queue_is_transport_error() {
        let mock = MockClient::new();
        let err = mock.post("/v1/x", &json!({})).unwrap_err();
        assert!(matches!(err, XbeError::Transport(_)));
        assert_eq!(mock.request_count(), 1);
    }
}
