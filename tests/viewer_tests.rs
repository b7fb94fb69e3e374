mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use bitcoin_snapshots::{
    database::{InMemorySnapshotTable, SnapshotTable},
    handlers::create_viewer_routes,
    models::SnapshotRecord,
    AppState,
};
use common::{record_with_price, UnavailableTable};
use serde_json::Value;
use tower::ServiceExt;

fn app(table: Arc<dyn SnapshotTable>) -> Router {
    create_viewer_routes(AppState::new(table))
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_fetch_data_on_empty_table_is_an_empty_array() {
    let response = get(app(Arc::new(InMemorySnapshotTable::new("bitcoin"))), "/fetch-data").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn test_fetch_data_returns_every_snapshot() {
    let table = Arc::new(InMemorySnapshotTable::new("bitcoin"));
    table.put(&record_with_price(1_700_000_000, 36584)).await.unwrap();
    table.put(&record_with_price(1_700_000_300, 36600)).await.unwrap();

    let response = get(app(table), "/fetch-data").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let records: Vec<SnapshotRecord> = rows
        .iter()
        .cloned()
        .map(|row| SnapshotRecord::from_json(row).unwrap())
        .collect();
    assert!(records.contains(&record_with_price(1_700_000_000, 36584)));
    assert!(records.contains(&record_with_price(1_700_000_300, 36600)));
}

#[tokio::test]
async fn test_fetch_data_renders_exact_decimals() {
    let table = Arc::new(InMemorySnapshotTable::new("bitcoin"));
    let row: Value = serde_json::from_str(
        r#"{"timestamp": 1700000000, "data": {"1": {"quote": {"USD": {"price": 36584.219183764918273645918273645}}}}}"#,
    )
    .unwrap();
    table.put(&SnapshotRecord::from_json(row).unwrap()).await.unwrap();

    let body = body_text(get(app(table), "/fetch-data").await).await;
    assert!(body.contains(r#""price":36584.219183764918273645918273645"#));
    assert!(body.starts_with(r#"[{"timestamp":1700000000,"#));
}

#[tokio::test]
async fn test_fetch_data_read_failure_is_a_500_with_error() {
    let response = get(app(Arc::new(UnavailableTable)), "/fetch-data").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let message = body["error"].as_str().expect("error string");
    assert!(message.contains("connection refused"));
}

#[tokio::test]
async fn test_index_page_and_script() {
    let table: Arc<dyn SnapshotTable> = Arc::new(InMemorySnapshotTable::new("bitcoin"));

    let page = get(app(table.clone()), "/").await;
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    let html = body_text(page).await;
    assert!(html.contains("bitcoinChart"));
    assert!(html.contains("/static/index.js"));

    let script = get(app(table), "/static/index.js").await;
    assert_eq!(script.status(), StatusCode::OK);
    assert!(script.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/javascript"));
    assert!(body_text(script).await.contains("/fetch-data"));
}

#[tokio::test]
async fn test_health_check() {
    let response = get(app(Arc::new(InMemorySnapshotTable::new("bitcoin"))), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["table"], "bitcoin");
}
