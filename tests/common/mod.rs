#![allow(dead_code)]

use async_trait::async_trait;
use bitcoin_snapshots::{
    database::SnapshotTable,
    models::{ItemMap, ItemValue, SnapshotRecord},
    AppError,
};

pub const QUOTES_PATH: &str = "/v2/cryptocurrency/quotes/latest";
pub const TEST_API_KEY: &str = "test-api-key";

/// Trimmed-down CoinMarketCap v2 quotes/latest response for Bitcoin.
pub fn bitcoin_quote_body(price: &str) -> String {
    format!(
        r#"{{
  "status": {{"timestamp": "2023-11-14T22:13:20.000Z", "error_code": 0, "error_message": null, "credit_count": 1}},
  "data": {{
    "1": {{
      "id": 1,
      "name": "Bitcoin",
      "symbol": "BTC",
      "slug": "bitcoin",
      "circulating_supply": 19542768,
      "max_supply": 21000000,
      "tags": ["mineable", "pow", "sha-256", "store-of-value"],
      "quote": {{
        "USD": {{
          "price": {price},
          "volume_24h": 21348750917.829742,
          "percent_change_24h": -0.91584213,
          "market_cap": 715293870562.6313,
          "last_updated": "2023-11-14T22:12:00.000Z"
        }}
      }}
    }}
  }}
}}"#
    )
}

pub fn record_with_price(timestamp: i64, price: i64) -> SnapshotRecord {
    let mut usd = ItemMap::new();
    usd.insert("price".to_string(), ItemValue::from(price));
    let mut quote = ItemMap::new();
    quote.insert("USD".to_string(), ItemValue::Map(usd));
    let mut entry = ItemMap::new();
    entry.insert("quote".to_string(), ItemValue::Map(quote));
    let mut data = ItemMap::new();
    data.insert("1".to_string(), ItemValue::Map(entry));
    let mut attributes = ItemMap::new();
    attributes.insert("data".to_string(), ItemValue::Map(data));
    SnapshotRecord::new(timestamp, attributes)
}

/// A table whose every operation fails, like an unreachable database.
pub struct UnavailableTable;

#[async_trait]
impl SnapshotTable for UnavailableTable {
    fn name(&self) -> &str {
        "bitcoin"
    }

    async fn put(&self, _record: &SnapshotRecord) -> Result<(), AppError> {
        Err(AppError::DatabaseError("connection refused".to_string()))
    }

    async fn scan(&self) -> Result<Vec<SnapshotRecord>, AppError> {
        Err(AppError::DatabaseError("connection refused".to_string()))
    }
}
