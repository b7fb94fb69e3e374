use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::UpstreamSettings;
use crate::error::AppError;

pub const DEFAULT_QUOTES_URL: &str = "https://pro-api.coinmarketcap.com/v2/cryptocurrency/quotes/latest";
pub const QUOTE_SLUG: &str = "bitcoin";
pub const QUOTE_CONVERT: &str = "USD";
/// CoinMarketCap's id for Bitcoin; the key of its entry under `data`.
pub const BITCOIN_ASSET_ID: &str = "1";
pub const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Client for CoinMarketCap's latest-quotes endpoint
#[derive(Clone)]
pub struct QuoteClient {
    client: Client,
    url: String,
    api_key: String,
}

impl QuoteClient {
    pub fn new(url: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder()
            .user_agent(concat!("bitcoin-snapshots/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::ExternalApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_settings(settings: &UpstreamSettings) -> Result<Self, AppError> {
        Self::new(
            &settings.url,
            settings.require_api_key()?,
            settings.timeout_seconds.map(Duration::from_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw body of the latest Bitcoin/USD quote. The HTTP status is not checked;
    /// an error body fails later when its shape is inspected.
    pub async fn fetch_latest(&self) -> Result<String, reqwest::Error> {
        debug!("Requesting latest quote from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .query(&[("slug", QUOTE_SLUG), ("convert", QUOTE_CONVERT)])
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Quote API answered with status {}", status);
        }

        response.text().await
    }
}

/// Connection failures, timeouts and redirect loops. These are the failures an
/// ingestion run absorbs; anything else propagates.
pub fn is_network_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_redirect()
}
