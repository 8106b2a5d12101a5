//! Tally Web Server
//!
//! Axum-based REST API for syncing Monzo spreadsheets into Tally.
//!
//! - `POST /api/sync/sheets` imports posted rows or a sheet fetched from Google Sheets
//! - `GET /api/sync/sheets` reports whether the Sheets connection works
//! - `GET /api/imports` lists the owner's import log
//!
//! Every request is scoped to an owner taken from the `x-tally-owner` header.

use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use tally_core::config::{SheetsConfig, TallyConfig};
use tally_core::db::Database;
use tally_core::{ImportOptions, SheetsCredentials};

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Header naming the owner a request acts for
pub const OWNER_HEADER: &str = "x-tally-owner";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Owner used when a request carries no `x-tally-owner` header
    pub default_owner: String,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Spreadsheet to sync from
    pub sheets: SheetsConfig,
    pub credentials: SheetsCredentials,
    pub import_options: ImportOptions,
    /// Sheet fetched when a sync request names none
    pub default_sheet: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_tally_config(&TallyConfig::default(), SheetsCredentials::default())
    }
}

impl ServerConfig {
    pub fn from_tally_config(config: &TallyConfig, credentials: SheetsCredentials) -> Self {
        Self {
            default_owner: config.import.owner.clone(),
            allowed_origins: vec![],
            sheets: config.sheets.clone(),
            credentials,
            import_options: config.import_options(),
            default_sheet: config.import.source_label.clone(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Resolve the owner for a request
pub fn request_owner(headers: &HeaderMap, config: &ServerConfig) -> String {
    headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| config.default_owner.clone())
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    if config.credentials.is_configured() {
        info!(
            "Google Sheets sync configured (spreadsheet: {})",
            config.sheets.spreadsheet_id.as_deref().unwrap_or("none")
        );
    } else {
        info!("ℹ️  Google Sheets sync not configured (set GOOGLE_SHEETS_API_KEY or GOOGLE_ACCESS_TOKEN)");
    }

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let api_routes = Router::new()
        .route(
            "/sync/sheets",
            get(handlers::sync_status).post(handlers::sync_sheets),
        )
        .route("/imports", get(handlers::list_import_logs));

    let owner_header = HeaderName::from_static(OWNER_HEADER);

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, owner_header])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, owner_header])
    };

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16) -> anyhow::Result<()> {
    serve_with_config(db, host, port, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if host != "127.0.0.1" && host != "localhost" {
        warn!("⚠️  No authentication - requests pick their owner via {}", OWNER_HEADER);
    }

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Upstream (Google Sheets) failure, message passed through to the client
    pub fn bad_gateway(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
