use bitcoin_snapshots::{
    config::Settings,
    database::{connection::establish_connection, PgSnapshotTable},
    handlers::create_viewer_routes,
    utils::init_logging,
    AppState,
};
use std::sync::Arc;
use tracing::{info, error};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;

    init_logging(&settings.logging);
    info!("Starting Bitcoin snapshot viewer");

    // One table handle for the life of the process
    let db_pool = establish_connection(&settings.database.url).await?;
    let table = PgSnapshotTable::new(db_pool, &settings.database.table)?;
    table.ensure_schema().await?;

    let app = create_viewer_routes(AppState::new(Arc::new(table)));

    let listener = tokio::net::TcpListener::bind((settings.api.host.as_str(), settings.api.port)).await?;

    info!("Viewer listening on {}", listener.local_addr()?);
    info!("  GET    /            - Snapshot chart");
    info!("  GET    /fetch-data  - All snapshots as JSON");
    info!("  GET    /health      - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("Web server error: {}", e);
            e
        })?;

    info!("Shutting down Bitcoin snapshot viewer");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Received shutdown signal");
}
