pub mod ingestion_service;
pub mod quote_client;

pub use ingestion_service::{IngestError, IngestionService};
pub use quote_client::QuoteClient;
