use anyhow::{ensure, Result};
use serde_json::json;
use space_travel::{create_router, create_router_with_config};
use std::io::Write;

mod common;

#[tokio::test]
#[serial_test::serial]
async fn router_builds_from_environment() {
    // ---
    std::env::set_var("SPACE_JWT_SECRET", "integration-test-secret");
    std::env::set_var("SPACE_ROUTES_SEED_PATH", "/nonexistent/routes.json");

    let _router = create_router().expect("Should be able to create router");

    std::env::remove_var("SPACE_ROUTES_SEED_PATH");
}

#[tokio::test]
#[serial_test::serial]
async fn router_requires_jwt_secret() {
    // ---
    std::env::remove_var("SPACE_JWT_SECRET");

    let err = create_router().expect_err("missing secret should fail");
    assert!(err.to_string().contains("SPACE_JWT_SECRET"));
}

#[tokio::test]
async fn health_endpoint_works() {
    // ---
    let server = common::TestServer::new().await;

    let response = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert!(body.get("routes").is_none());
}

#[tokio::test]
async fn full_health_reports_route_count() {
    // ---
    let server = common::TestServer::new().await;

    let body: serde_json::Value = server
        .client
        .get(server.url("/health?mode=full"))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body["routes"], 0);
}

#[tokio::test]
async fn root_endpoint_works() {
    // ---
    let server = common::TestServer::new().await;

    let response = server
        .client
        .get(server.url("/"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body = response.text().await.expect("Failed to read response body");
    assert!(body.contains("/api/routes"));
}

#[tokio::test]
async fn seeded_routes_are_served() -> Result<()> {
    // ---
    let mut seed = tempfile::NamedTempFile::new()?;
    write!(
        seed,
        "{}",
        json!({"routes": [
            {"name": "Mars Express", "start": "Earth", "end": "Mars"},
            {"name": "Titan Run", "start": "Mars", "end": "Titan"}
        ]})
    )?;

    let config = common::test_config_with_seed(seed.path().to_path_buf());
    let server = common::TestServer::with_config(config).await;

    let response = server
        .client
        .get(server.url("/api/routes"))
        .header("x-api-key", common::CAPTAIN_KEY)
        .send()
        .await?;
    ensure!(response.status() == 200, "unexpected status {}", response.status());

    let routes: serde_json::Value = response.json().await?;
    let names: Vec<_> = routes
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Mars Express", "Titan Run"]);

    Ok(())
}

#[tokio::test]
async fn malformed_seed_starts_empty() -> Result<()> {
    // ---
    let mut seed = tempfile::NamedTempFile::new()?;
    write!(seed, "{{ this is not json")?;

    let app = create_router_with_config(common::test_config_with_seed(seed.path().to_path_buf()))?;
    let (status, body) = common::send(&app, "GET", "/health?mode=full", &[], None).await;

    assert_eq!(status, 200);
    assert_eq!(body["routes"], 0);
    Ok(())
}

#[tokio::test]
async fn invalid_routes_return_404() {
    // ---
    let server = common::TestServer::new().await;

    let response = server
        .client
        .get(server.url("/nonexistent"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn server_handles_concurrent_requests() {
    // ---
    let server = common::TestServer::new().await;

    // Make multiple concurrent requests
    let futures = (0..10).map(|_| server.client.get(server.url("/health")).send());

    let responses = futures::future::join_all(futures).await;

    // All requests should succeed
    for response in responses {
        let response = response.expect("Request should succeed");
        assert_eq!(response.status(), 200);
    }
}

#[tokio::test]
async fn server_handles_malformed_json() {
    // ---
    let server = common::TestServer::new().await;

    let response = server
        .client
        .post(server.url("/api/routes"))
        .header("x-api-key", common::CAPTAIN_KEY)
        .header("content-type", "application/json")
        .body("{ invalid json }")
        .send()
        .await
        .expect("Failed to send request");

    // Should return 400 Bad Request
    assert_eq!(response.status(), 400);
}
