// Test helpers are intentionally partially used
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use reqwest::Client;
use serde_json::Value;
use space_travel::{
    create_router_with_config, AppConfig, JwtConfig, KeyConfig, RoutesConfig, ServerConfig,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;
use tower::ServiceExt;

// ============================================================================
// Test Setup
// ============================================================================

pub const CAPTAIN_KEY: &str = "captainApiKey1";

/// Configuration with no seed document and the default captain allow-list.
pub fn test_config() -> AppConfig {
    // ---
    test_config_with_seed(PathBuf::from("/nonexistent/space-travel/routes.json"))
}

pub fn test_config_with_seed(seed_path: PathBuf) -> AppConfig {
    // ---
    AppConfig {
        server: ServerConfig::default(),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            issuer: "SpaceTravel".to_string(),
            audience: "SpaceTravelClients".to_string(),
            expires_in_hours: 1,
        },
        keys: KeyConfig::default(),
        routes: RoutesConfig { seed_path },
    }
}

pub fn test_router() -> Router {
    create_router_with_config(test_config()).expect("Should be able to create router")
}

// ============================================================================
// In-process requests
// ============================================================================

/// Sends one request through the router and decodes the JSON body.
///
/// Empty bodies decode to `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    // ---
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Logs in and returns a bearer token.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    // ---
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        &[],
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");

    body["token"].as_str().expect("token in response").to_string()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

// ============================================================================
// Live server
// ============================================================================

pub struct TestServer {
    pub addr: std::net::SocketAddr,
    pub client: Client,
}

impl TestServer {
    // ---
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        // --

        let app = create_router_with_config(config).expect("Should be able to create router");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start
        sleep(Duration::from_millis(100)).await;

        let client = Client::new();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        // ---
        format!("http://{}{}", self.addr, path)
    }
}
