//! Import log handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{request_owner, AppError, AppState, MAX_PAGE_LIMIT};
use tally_core::models::ImportLogEntry;

/// Query parameters for listing import log entries
#[derive(Debug, Deserialize)]
pub struct ImportLogsQuery {
    /// Maximum number of results (default 50)
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct ImportLogsResponse {
    pub logs: Vec<ImportLogEntry>,
    pub total: i64,
}

/// GET /api/imports - List the owner's import log, newest first
pub async fn list_import_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ImportLogsQuery>,
    headers: HeaderMap,
) -> Result<Json<ImportLogsResponse>, AppError> {
    let owner = request_owner(&headers, &state.config);
    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let offset = params.offset.max(0);

    let logs = state.db.list_import_logs(&owner, limit, offset)?;
    let total = state.db.count_import_logs(&owner)?;

    Ok(Json(ImportLogsResponse { logs, total }))
}
