//! Integration tests for the Bound storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bound-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Catalog, cart and checkout driven through the library
//! - `http_api` - The JSON API driven through the axum router
//!
//! [`TestContext`] drives the router in-process with `tower::ServiceExt`,
//! carrying the session cookie between requests like a browser would.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use bound_storefront::config::StorefrontConfig;
use bound_storefront::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// Largest response body the helpers will read.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// One visitor talking to an in-process storefront.
///
/// Cloning keeps the session cookie, giving another tab of the same visitor.
#[derive(Clone)]
pub struct TestContext {
    app: Router,
    cookie: Option<String>,
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body; plain-text bodies become a JSON string, empty bodies `null`.
    pub body: Value,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// A storefront with default configuration and the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StorefrontConfig::default())
    }

    /// A storefront with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configured catalog cannot be loaded.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let state = AppState::from_config(config).expect("failed to load catalog");
        Self {
            app: bound_storefront::app(state),
            cookie: None,
        }
    }

    /// Another visitor on the same server, without this one's session.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, body: Value) -> TestResponse {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn put(&mut self, path: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, path, Some(body)).await
    }

    /// Send a request, remembering any session cookie the server sets.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&mut self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let Ok(response) = self.app.clone().oneshot(request).await;

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}
