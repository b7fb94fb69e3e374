use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
};
use tracing::{debug, error};

use crate::error::AppError;
use crate::models::SnapshotRecord;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const INDEX_JS: &str = include_str!("../../static/index.js");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn index_script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript; charset=utf-8")], INDEX_JS)
}

/// Every stored snapshot as a JSON array. Read failures become a 500 with
/// `{"error": ...}`.
pub async fn fetch_data(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Vec<SnapshotRecord>>), AppError> {
    let records = state.table.scan().await.map_err(|e| {
        error!("Failed to scan snapshot table '{}': {}", state.table.name(), e);
        e
    })?;

    debug!("Serving {} snapshots", records.len());
    Ok((StatusCode::OK, Json(records)))
}
