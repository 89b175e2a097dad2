use anyhow::Result;
use space_travel::{create_router_with_config, AppConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let endpoint = config.server.bind_addr.clone();

    let app = create_router_with_config(config)?;

    info!("Starting at endpoint:{}", endpoint);
    info!("Starting Space Travel API server v{}...", env!("CARGO_PKG_VERSION"));

    let listener = TcpListener::bind(&endpoint).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // ---
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
