use bitcoin_snapshots::{
    config::Settings,
    database::{connection::establish_connection, PgSnapshotTable},
    services::{IngestionService, QuoteClient},
    utils::init_logging,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// One ingestion run per invocation, for cron or any other external trigger.
/// With INGEST_INTERVAL_SECONDS set, the process schedules runs itself.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    init_logging(&settings.logging);

    let quotes = QuoteClient::from_settings(&settings.upstream)?;

    let db_pool = establish_connection(&settings.database.url).await?;
    let table = PgSnapshotTable::new(db_pool, &settings.database.table)?;
    table.ensure_schema().await?;

    let service = IngestionService::new(quotes, Arc::new(table));

    if let Some(seconds) = settings.ingest.interval_seconds {
        tokio::select! {
            _ = service.run_every(Duration::from_secs(seconds)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
            }
        }
        return Ok(());
    }

    match service.run_once().await {
        Ok(report) => {
            if !report.is_stored() {
                warn!("No snapshot stored this run: {:?}", report.outcome);
            }
            println!("{}", serde_json::to_string(&report.response)?);
            Ok(())
        }
        Err(e) => {
            error!("Ingestion failed: {}", e);
            Err(e.into())
        }
    }
}
