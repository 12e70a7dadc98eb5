#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use firewatch_api::config::ServerConfig;
use firewatch_api::router::{build_app_router, with_middleware};
use firewatch_api::state::AppState;
use firewatch_core::error::NotifyError;
use firewatch_core::{Notifier, StateRelay};

/// Build a test `ServerConfig` with safe defaults (any CORS origin).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: Vec::new(),
        request_timeout_secs: 30,
        alert_timeout_secs: 1,
        alert_cooldown_secs: 0,
    }
}

/// Notifier that records every message and answers with a fixed result.
pub struct RecordingNotifier {
    result: Result<(), NotifyError>,
    ready: bool,
    hangs: bool,
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn succeeding() -> Arc<Self> {
        Self::answering(Ok(()))
    }

    pub fn failing() -> Arc<Self> {
        Self::answering(Err(NotifyError::Delivery("HTTP 503".into())))
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            result: Err(NotifyError::NotConfigured("TWILIO_ACCOUNT_SID")),
            ready: false,
            hangs: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    /// Records the message, then never answers.
    pub fn hanging() -> Arc<Self> {
        Arc::new(Self {
            result: Ok(()),
            ready: true,
            hangs: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn answering(result: Result<(), NotifyError>) -> Arc<Self> {
        Arc::new(Self {
            result,
            ready: true,
            hangs: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.to_string());
        if self.hangs {
            std::future::pending::<()>().await;
        }
        self.result.clone()
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Build the full application router around `notifier` using the same
/// middleware stack as `main.rs`.
pub fn build_test_app(notifier: Arc<RecordingNotifier>) -> Router {
    build_test_app_with(notifier, &test_config())
}

pub fn build_test_app_with(notifier: Arc<RecordingNotifier>, config: &ServerConfig) -> Router {
    let relay = StateRelay::new(notifier)
        .with_alert_timeout(Duration::from_secs(config.alert_timeout_secs))
        .with_alert_cooldown(Duration::from_secs(config.alert_cooldown_secs));
    let state = AppState {
        relay: Arc::new(relay),
    };
    build_app_router(state, config)
}

/// Wrap extra `routes` in the production middleware stack.
pub fn build_test_app_with_routes(routes: Router<AppState>) -> Router {
    let config = test_config();
    let state = AppState {
        relay: Arc::new(StateRelay::new(RecordingNotifier::succeeding())),
    };
    with_middleware(routes, state, &config)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body through the router.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, "application/json", body.to_string()).await
}

/// Send a POST request with an arbitrary body and content type.
pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: String) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
