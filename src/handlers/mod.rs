pub mod health;
pub mod snapshots;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub use health::health_check;
pub use snapshots::{fetch_data, index, index_script};

pub fn create_viewer_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/index.js", get(index_script))
        .route("/fetch-data", get(fetch_data))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
