use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ACKNOWLEDGMENT: &str = "Hello from Lambda!";

/// Transport envelope handed back to whatever triggered the ingestion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    /// Always 200 with the JSON-encoded greeting, whatever the run did.
    pub fn acknowledged() -> Self {
        Self {
            status_code: 200,
            body: Value::String(ACKNOWLEDGMENT.to_string()).to_string(),
        }
    }
}

/// What the run actually achieved. The envelope above does not tell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestionOutcome {
    Stored { timestamp: i64 },
    UpstreamUnavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionReport {
    pub outcome: IngestionOutcome,
    pub response: InvocationResponse,
}

impl IngestionReport {
    pub fn stored(timestamp: i64) -> Self {
        Self {
            outcome: IngestionOutcome::Stored { timestamp },
            response: InvocationResponse::acknowledged(),
        }
    }

    pub fn upstream_unavailable(reason: impl Into<String>) -> Self {
        Self {
            outcome: IngestionOutcome::UpstreamUnavailable { reason: reason.into() },
            response: InvocationResponse::acknowledged(),
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self.outcome, IngestionOutcome::Stored { .. })
    }
}
