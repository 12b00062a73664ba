//! Integration tests for Wakalni.
//!
//! Tests drive the real router in process: [`TestApp`] sends requests with
//! `tower::ServiceExt::oneshot`, carries the session cookie between calls
//! like a browser would, and reads the whole body back as text.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wakalni-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `consumer` - Browsing, cart, promo codes and checkout
//! - `dashboards` - Restaurant admin and superadmin actions
//! - `platform` - Health, JSON API, security headers and the role guard

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use tower::ServiceExt;

use wakalni_web::config::WakalniConfig;
use wakalni_web::middleware::session::SESSION_COOKIE_NAME;
use wakalni_web::state::AppState;

/// Address the test client claims to be, so rate limiters can key on it.
const CLIENT_IP: &str = "203.0.113.7";

/// Configuration used by tests: no simulated delay, role guard off.
#[must_use]
pub fn test_config() -> WakalniConfig {
    WakalniConfig {
        simulated_latency: Duration::ZERO,
        ..WakalniConfig::default()
    }
}

/// A response with its body read to a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Target of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }
}

/// The application under test plus one browser's cookie jar.
pub struct TestApp {
    router: Router,
    session_cookie: Option<String>,
}

impl TestApp {
    /// App with [`test_config`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// App with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded fixtures fail to load.
    #[must_use]
    pub fn with_config(config: WakalniConfig) -> Self {
        let state = AppState::new(config).expect("Failed to build application state");
        Self {
            router: wakalni_web::app(state),
            session_cookie: None,
        }
    }

    /// A second browser on the same application, starting without cookies.
    #[must_use]
    pub fn new_browser(&self) -> Self {
        Self {
            router: self.router.clone(),
            session_cookie: None,
        }
    }

    /// `GET path`.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Request::get(path), Body::empty()).await
    }

    /// `POST path` with an url-encoded form.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let builder =
            Request::post(path).header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(builder, Body::from(body)).await
    }

    /// `POST path` with a JSON body.
    pub async fn post_json(&mut self, path: &str, value: &serde_json::Value) -> TestResponse {
        let builder = Request::post(path).header(CONTENT_TYPE, "application/json");
        self.send(builder, Body::from(value.to_string())).await
    }

    async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> TestResponse {
        builder = builder.header("x-forwarded-for", CLIENT_IP);
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = builder.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        for value in response.headers().get_all(SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else { continue };
            if pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")) {
                self.session_cookie = Some(pair.to_owned());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
