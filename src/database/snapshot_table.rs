use std::collections::BTreeMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::AppError;
use crate::models::SnapshotRecord;

/// Whole-row document store keyed by snapshot timestamp.
#[async_trait]
pub trait SnapshotTable: Send + Sync {
    fn name(&self) -> &str;

    /// Full-row put. A row with the same timestamp is overwritten.
    async fn put(&self, record: &SnapshotRecord) -> Result<(), AppError>;

    /// Every row currently stored, in no particular order.
    async fn scan(&self) -> Result<Vec<SnapshotRecord>, AppError>;
}

/// Table names are spliced into SQL, so only plain identifiers pass.
pub fn validate_table_name(name: &str) -> Result<(), AppError> {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    let identifier = IDENTIFIER.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("identifier pattern is valid")
    });

    if identifier.is_match(name) {
        Ok(())
    } else {
        Err(AppError::ConfigError(format!("Invalid snapshot table name: '{}'", name)))
    }
}

/// PostgreSQL backend: one JSONB document per row. JSONB stores numbers as
/// `numeric`, so decimals come back exactly as written.
#[derive(Clone)]
pub struct PgSnapshotTable {
    pool: PgPool,
    table: String,
}

impl PgSnapshotTable {
    pub fn new(pool: PgPool, table: &str) -> Result<Self, AppError> {
        validate_table_name(table)?;
        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let sql = format!(
            r#"CREATE TABLE IF NOT EXISTS "{}" ("timestamp" BIGINT PRIMARY KEY, item JSONB NOT NULL)"#,
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;

        info!("Snapshot table '{}' is ready", self.table);
        Ok(())
    }
}

#[async_trait]
impl SnapshotTable for PgSnapshotTable {
    fn name(&self) -> &str {
        &self.table
    }

    async fn put(&self, record: &SnapshotRecord) -> Result<(), AppError> {
        let sql = format!(
            r#"
            INSERT INTO "{}" ("timestamp", item)
            VALUES ($1, $2)
            ON CONFLICT ("timestamp") DO UPDATE SET item = EXCLUDED.item
            "#,
            self.table
        );

        sqlx::query(&sql)
            .bind(record.timestamp)
            .bind(Json(record.to_json()?))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("put into '{}' failed: {}", self.table, e)))?;

        debug!("Stored snapshot {} in '{}'", record.timestamp, self.table);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<SnapshotRecord>, AppError> {
        let sql = format!(r#"SELECT item FROM "{}""#, self.table);

        let rows = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("scan of '{}' failed: {}", self.table, e)))?;

        rows.into_iter()
            .map(|Json(item)| {
                SnapshotRecord::from_json(item).map_err(|e| {
                    AppError::DatabaseError(format!("invalid row in '{}': {}", self.table, e))
                })
            })
            .collect()
    }
}

/// Process-local table, used by the test suite.
#[derive(Debug)]
pub struct InMemorySnapshotTable {
    name: String,
    rows: RwLock<BTreeMap<i64, SnapshotRecord>>,
}

impl InMemorySnapshotTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    pub async fn get(&self, timestamp: i64) -> Option<SnapshotRecord> {
        self.rows.read().await.get(&timestamp).cloned()
    }
}

#[async_trait]
impl SnapshotTable for InMemorySnapshotTable {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put(&self, record: &SnapshotRecord) -> Result<(), AppError> {
        self.rows.write().await.insert(record.timestamp, record.clone());
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<SnapshotRecord>, AppError> {
        Ok(self.rows.read().await.values().cloned().collect())
    }
}
