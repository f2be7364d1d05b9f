//! # Mock Transport & Testing Guide
//!
//! `MockTransport` implements [`Transport`] with scripted responses. It lets you test the
//! session client, gateways, controllers and selectors without a backend, including failures
//! that are hard to provoke against a real one (timeouts, 500s, a 401 in the middle of a save).
//!
//! ## When to use the Mock vs the In-process Backend
//!
//! | Feature | MockTransport | BackendActor |
//! |---------|---------------|--------------|
//! | **State** | None (expectations) | Real collections |
//! | **Timing** | Per-response delays | Immediate, sequential |
//! | **Error Injection** | Any status or network error | Only what the contract produces |
//! | **Use Case** | Edge cases, races, failure paths | End-to-end flows |
//!
//! ## Example
//!
//! ```rust
//! use console_framework::mock::MockTransport;
//! use console_framework::transport::{ApiRequest, Method, Transport};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockTransport::new();
//!     mock.expect(Method::Get, "/users/7")
//!         .return_json(200, json!({"id": 7, "username": "ada"}));
//!
//!     let response = mock.send(ApiRequest::get("/users/7")).await.unwrap();
//!     assert_eq!(response.status, 200);
//!     mock.verify();
//! }
//! ```
//!
//! ## Races
//!
//! Expectations are matched by method and path, not by arrival order, and each can carry a
//! delay. Two overlapping requests can therefore be made to complete in reverse order:
//!
//! ```rust,ignore
//! mock.expect(Method::Get, "/users?page=2&limit=10")
//!     .with_delay(Duration::from_millis(80))
//!     .return_json(200, page_two);
//! mock.expect(Method::Get, "/users?page=3&limit=10").return_json(200, page_three);
//! ```

use crate::error::GatewayError;
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

struct Expectation {
    method: Method,
    path: String,
    delay: Option<Duration>,
    response: Result<ApiResponse, GatewayError>,
}

#[derive(Default)]
struct MockState {
    expectations: Vec<Expectation>,
    received: Vec<ApiRequest>,
}

/// A scripted transport with expectation tracking.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one request with this method and path (query string included).
    pub fn expect(&self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            delay: None,
            state: self.state.clone(),
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().received.clone()
    }

    /// Number of received requests with this method.
    pub fn count(&self, method: Method) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            let remaining: Vec<String> = state
                .expectations
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            panic!("Not all expectations were met: {remaining:?}");
        }
    }
}

/// Builder returned by [`MockTransport::expect`].
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// Holds the response back for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn return_json(self, status: u16, value: serde_json::Value) {
        let response = ApiResponse::json(status, &value);
        self.finish(Ok(response));
    }

    /// Responds with an empty body.
    pub fn return_status(self, status: u16) {
        self.finish(Ok(ApiResponse::empty(status)));
    }

    pub fn return_err(self, error: GatewayError) {
        self.finish(Err(error));
    }

    fn finish(self, response: Result<ApiResponse, GatewayError>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push(Expectation {
            method: self.method,
            path: self.path,
            delay: self.delay,
            response,
        });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            let position = state
                .expectations
                .iter()
                .position(|e| e.method == request.method && e.path == request.path);
            let Some(position) = position else {
                panic!("Unexpected request: {} {}", request.method, request.path);
            };
            state.received.push(request);
            state.expectations.remove(position)
        };

        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        expectation.response
    }
}
