use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::database::SnapshotTable;
use crate::error::AppError;
use crate::models::item::ItemError;
use crate::models::snapshot::TIMESTAMP_KEY;
use crate::models::{IngestionReport, ItemMap, ItemValue, SnapshotRecord};
use crate::services::quote_client::{is_network_error, QuoteClient, BITCOIN_ASSET_ID};
use crate::utils::time::{format_timestamp, Clock, SystemClock};

pub const TAGS_KEY: &str = "tags";

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Quote request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("Quote response is not valid JSON: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Unexpected quote payload at {path}: expected {expected}, found {found}")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Quote response has no data section")]
    MissingDataSection,

    #[error("Quote response has no entry for asset {asset_id}")]
    MissingAssetEntry { asset_id: String },

    #[error("Quote entry for asset {asset_id} has no tags field")]
    MissingTags { asset_id: String },

    #[error("Invalid numeric literal in quote response: {0}")]
    InvalidNumber(String),

    #[error("Failed to store snapshot: {0}")]
    Storage(#[from] AppError),
}

impl From<ItemError> for IngestError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::InvalidNumber(literal) => IngestError::InvalidNumber(literal),
        }
    }
}

/// Parse a quote response body, keeping every number as an exact decimal.
pub fn parse_quote_payload(body: &str) -> Result<ItemMap, IngestError> {
    let value: Value = serde_json::from_str(body)?;
    match ItemValue::try_from(value)? {
        ItemValue::Map(payload) => Ok(payload),
        other => Err(IngestError::UnexpectedShape {
            path: "$".to_string(),
            expected: "map",
            found: other.type_name(),
        }),
    }
}

/// `{timestamp} ∪ payload`, minus `data[asset_id].tags`.
pub fn build_snapshot_record(
    timestamp: i64,
    mut payload: ItemMap,
    asset_id: &str,
) -> Result<SnapshotRecord, IngestError> {
    if payload.contains_key(TIMESTAMP_KEY) {
        warn!("Quote payload carries its own '{}' field; keeping the fetch time", TIMESTAMP_KEY);
    }

    strip_asset_tags(&mut payload, asset_id)?;
    Ok(SnapshotRecord::new(timestamp, payload))
}

fn strip_asset_tags(payload: &mut ItemMap, asset_id: &str) -> Result<(), IngestError> {
    let data = payload
        .get_mut("data")
        .ok_or(IngestError::MissingDataSection)?;
    let found = data.type_name();
    let data = data.as_map_mut().ok_or_else(|| IngestError::UnexpectedShape {
        path: "data".to_string(),
        expected: "map",
        found,
    })?;

    let entry = data
        .get_mut(asset_id)
        .ok_or_else(|| IngestError::MissingAssetEntry {
            asset_id: asset_id.to_string(),
        })?;
    let found = entry.type_name();
    let entry = entry.as_map_mut().ok_or_else(|| IngestError::UnexpectedShape {
        path: format!("data.{}", asset_id),
        expected: "map",
        found,
    })?;

    entry
        .remove(TAGS_KEY)
        .map(|_| ())
        .ok_or_else(|| IngestError::MissingTags {
            asset_id: asset_id.to_string(),
        })
}

/// Fetches one quote and writes one snapshot per run
pub struct IngestionService {
    quotes: QuoteClient,
    table: Arc<dyn SnapshotTable>,
    clock: Arc<dyn Clock>,
}

impl IngestionService {
    pub fn new(quotes: QuoteClient, table: Arc<dyn SnapshotTable>) -> Self {
        Self {
            quotes,
            table,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// One ingestion run.
    ///
    /// Network-class failures on the quote request are logged and reported as
    /// `UpstreamUnavailable` with the usual 200 envelope; nothing is written.
    /// Every other failure is returned as an error.
    pub async fn run_once(&self) -> Result<IngestionReport, IngestError> {
        let body = match self.quotes.fetch_latest().await {
            Ok(body) => body,
            Err(e) if is_network_error(&e) => {
                error!("Quote API at {} unreachable, no snapshot written: {}", self.quotes.url(), e);
                return Ok(IngestionReport::upstream_unavailable(e.to_string()));
            }
            Err(e) => return Err(IngestError::Upstream(e)),
        };

        let timestamp = self.clock.now_epoch_seconds();
        let payload = parse_quote_payload(&body)?;
        let record = build_snapshot_record(timestamp, payload, BITCOIN_ASSET_ID)?;

        match serde_json::to_string(&record) {
            Ok(rendered) => info!(record = %rendered, "Constructed snapshot record"),
            Err(e) => warn!("Could not render snapshot record for logging: {}", e),
        }

        self.table.put(&record).await?;

        info!(
            "Stored snapshot {} ({}) in '{}'",
            timestamp,
            format_timestamp(timestamp),
            self.table.name()
        );
        Ok(IngestionReport::stored(timestamp))
    }

    /// Run on a fixed period until the process stops. A failed run is logged
    /// and the next tick runs as usual.
    pub async fn run_every(&self, period: Duration) {
        info!("Ingesting every {} seconds", period.as_secs());

        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.run_once().await {
                Ok(report) if report.is_stored() => {}
                Ok(report) => warn!("Ingestion run stored nothing: {:?}", report.outcome),
                Err(e) => error!("Ingestion run failed: {}", e),
            }
        }
    }
}
