pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use error::types::*;

use std::sync::Arc;

use database::SnapshotTable;

/// Viewer state. The table handle is opened once at startup and only read.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<dyn SnapshotTable>,
}

impl AppState {
    pub fn new(table: Arc<dyn SnapshotTable>) -> Self {
        Self { table }
    }
}
