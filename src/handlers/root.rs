use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Space Travel API
Version: {version}

Available endpoints:
  - POST   /api/auth/login       - Exchange username/password for a bearer token
  - POST   /api/users/getapikey  - Obtain a cadet or captain API key
  - GET    /api/routes           - List galactic routes
  - GET    /api/routes/{{name}}    - Fetch a route by name (case-insensitive)
  - POST   /api/routes           - Add a route (captain)
  - PUT    /api/routes/{{name}}    - Replace a route (captain)
  - DELETE /api/routes/{{name}}    - Remove a route (captain)
  - GET    /health               - Light health check
  - GET    /health?mode=full     - Health check including route count
  - GET    /metrics              - Metrics in Prometheus text format

Route endpoints accept `Authorization: Bearer <token>` or `X-Api-Key: <key>`.
"#
    )
}
