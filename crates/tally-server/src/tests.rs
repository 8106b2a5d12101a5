//! Server API tests

use super::*;
use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tally_core::config::SheetsConfig;
use tally_core::db::Database;
use tower::ServiceExt;

const HEADER: [&str; 16] = [
    "Transaction ID",
    "Date",
    "Time",
    "Type",
    "Name",
    "Emoji",
    "Category",
    "Amount",
    "Currency",
    "Local amount",
    "Local currency",
    "Notes and #tags",
    "Address",
    "Receipt",
    "Description",
    "Category split",
];

fn setup_test_app() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        default_owner: "alice".to_string(),
        ..Default::default()
    };
    (create_router(db.clone(), config), db)
}

fn monzo_rows() -> serde_json::Value {
    serde_json::json!([
        HEADER,
        ["tx_0001", "16/01/2026", "14:30:00", "Card payment", "Tesco", "", "Groceries", "-£10.00", "GBP"],
        ["tx_0002", "31/01/2026", "09:00:00", "Faster payment", "ACME Ltd", "", "Income", "£2,000.00", "GBP"],
        ["tx_0003", "aa/bb/cccc", "10:00:00", "Card payment", "Pret", "", "Eating out", "-£4.50", "GBP"],
    ])
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Minimal stand-in for the Sheets values API
async fn start_mock_sheets() -> String {
    async fn values(Path((id, _range)): Path<(String, String)>) -> axum::response::Response {
        if id == "broken" {
            return (StatusCode::FORBIDDEN, "The caller does not have permission").into_response();
        }
        if id == "empty" {
            return Json(serde_json::json!({})).into_response();
        }
        Json(serde_json::json!({ "values": monzo_rows() })).into_response()
    }

    let app = Router::new().route("/v4/spreadsheets/:id/values/:range", get(values));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v4/spreadsheets", addr)
}

fn sheets_app(api_base: &str, spreadsheet_id: &str) -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let config = ServerConfig {
        default_owner: "alice".to_string(),
        sheets: SheetsConfig {
            spreadsheet_id: Some(spreadsheet_id.to_string()),
            api_base: api_base.to_string(),
        },
        credentials: SheetsCredentials {
            api_key: Some("test-key".to_string()),
            access_token: None,
        },
        ..Default::default()
    };
    (create_router(db.clone(), config), db)
}

// ========== Sync API Tests ==========

#[tokio::test]
async fn test_sync_posted_rows() {
    let (app, db) = setup_test_app();

    let response = app
        .oneshot(post_json("/api/sync/sheets", serde_json::json!({ "rows": monzo_rows() })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Imported 2 transactions (0 skipped)");
    assert_eq!(json["data"]["totalRows"], 3);
    assert_eq!(json["data"]["imported"], 2);
    assert_eq!(json["data"]["skipped"], 0);
    assert_eq!(json["data"]["errors"][0]["row"], 4);
    let data_keys: Vec<_> = json["data"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(data_keys.len(), 4);
    assert!(json["data"].get("success").is_none());

    assert_eq!(db.count_transactions("alice").unwrap(), 2);
}

#[tokio::test]
async fn test_sync_uses_owner_header() {
    let (app, db) = setup_test_app();

    let mut request = post_json("/api/sync/sheets", serde_json::json!({ "rows": monzo_rows() }));
    request
        .headers_mut()
        .insert(OWNER_HEADER, HeaderValue::from_static("bob"));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(db.count_transactions("bob").unwrap(), 2);
    assert_eq!(db.count_transactions("alice").unwrap(), 0);
}

#[tokio::test]
async fn test_sync_twice_skips_duplicates() {
    let (app, _db) = setup_test_app();
    let body = serde_json::json!({ "rows": monzo_rows() });

    let first = app
        .clone()
        .oneshot(post_json("/api/sync/sheets", body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(post_json("/api/sync/sheets", body)).await.unwrap();
    let json = get_body_json(second).await;
    assert_eq!(json["message"], "Imported 0 transactions (2 skipped)");
}

#[tokio::test]
async fn test_sync_data_omits_warnings() {
    let (app, _db) = setup_test_app();
    let rows = serde_json::json!([
        HEADER,
        ["tx_0001", "16/01/2026", "14:30:00", "Card payment", "Tesco", "", "Groceries", "pending"],
    ]);

    let response = app
        .oneshot(post_json("/api/sync/sheets", serde_json::json!({ "rows": rows })))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json["data"]["imported"], 1);
    assert!(json["data"].get("warnings").is_none());
}

#[tokio::test]
async fn test_sync_empty_rows_is_not_found() {
    let (app, _db) = setup_test_app();

    let response = app
        .oneshot(post_json("/api/sync/sheets", serde_json::json!({ "rows": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "No data found in sheet");
}

#[tokio::test]
async fn test_sync_without_credentials() {
    let (app, _db) = setup_test_app();

    let response = app
        .oneshot(post_json("/api/sync/sheets", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = get_body_json(response).await;
    assert_eq!(
        json["error"],
        "Configuration error: Google Sheets API key or access token required"
    );
}

#[tokio::test]
async fn test_sync_fetches_sheet() {
    let base = start_mock_sheets().await;
    let (app, db) = sheets_app(&base, "sheet-1");

    let response = app
        .oneshot(post_json(
            "/api/sync/sheets",
            serde_json::json!({ "sheetName": "Personal Account Transactions" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["data"]["imported"], 2);

    let logs = db.list_import_logs("alice", 10, 0).unwrap();
    assert_eq!(logs[0].source, "monzo_sheets:Personal Account Transactions");
}

#[tokio::test]
async fn test_sync_fetch_failure() {
    let base = start_mock_sheets().await;
    let (app, _db) = sheets_app(&base, "broken");

    let response = app
        .oneshot(post_json("/api/sync/sheets", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = get_body_json(response).await;
    assert_eq!(
        json["error"],
        "Sync failed: Failed to fetch sheet data: 403 - The caller does not have permission"
    );
}

#[tokio::test]
async fn test_sync_empty_sheet_is_not_found() {
    let base = start_mock_sheets().await;
    let (app, _db) = sheets_app(&base, "empty");

    let response = app
        .oneshot(post_json("/api/sync/sheets", serde_json::json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Sync Status Tests ==========

#[tokio::test]
async fn test_sync_status_not_configured() {
    let (app, _db) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/sync/sheets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "not_configured");
    assert_eq!(json["message"], "Google Sheets API credentials not configured");
}

#[tokio::test]
async fn test_sync_status_connected() {
    let base = start_mock_sheets().await;
    let (app, _db) = sheets_app(&base, "sheet-1");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/sync/sheets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "connected");
    assert_eq!(json["spreadsheetId"], "sheet-1");
    assert_eq!(json["rowCount"], 4);
    assert_eq!(json["headers"][0], "Transaction ID");
}

#[tokio::test]
async fn test_sync_status_error() {
    let base = start_mock_sheets().await;
    let (app, _db) = sheets_app(&base, "broken");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/sync/sheets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "error");
    assert!(json["message"].as_str().unwrap().contains("403"));
}

// ========== Import Log Tests ==========

#[tokio::test]
async fn test_list_import_logs() {
    let (app, _db) = setup_test_app();

    for _ in 0..2 {
        app.clone()
            .oneshot(post_json("/api/sync/sheets", serde_json::json!({ "rows": monzo_rows() })))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/imports?limit=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["total"], 2);
    let logs = json["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["status"], "completed");
    assert_eq!(logs[0]["recordsImported"], 0);
}

#[tokio::test]
async fn test_list_import_logs_is_owner_scoped() {
    let (app, _db) = setup_test_app();

    app.clone()
        .oneshot(post_json("/api/sync/sheets", serde_json::json!({ "rows": monzo_rows() })))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/imports")
                .header(OWNER_HEADER, "bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json["total"], 0);
    assert!(json["logs"].as_array().unwrap().is_empty());
}
