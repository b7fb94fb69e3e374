use chrono::{DateTime, Utc};

/// Source of "now" for snapshot timestamps
pub trait Clock: Send + Sync {
    /// Whole seconds since the Unix epoch
    fn now_epoch_seconds(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> i64 {
        self.0
    }
}

/// Convert Unix timestamp to DateTime<Utc>
pub fn from_unix_timestamp(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}

/// Convert timestamp to human readable format
pub fn format_timestamp(timestamp: i64) -> String {
    match from_unix_timestamp(timestamp) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("invalid timestamp {}", timestamp),
    }
}
