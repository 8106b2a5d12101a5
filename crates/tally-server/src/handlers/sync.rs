//! Google Sheets sync handlers

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{request_owner, AppError, AppState};
use tally_core::{
    import_batch,
    models::{ImportError, ImportResult},
    SheetsClient,
};

/// Body of `POST /api/sync/sheets`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub sheet_name: Option<String>,
    /// Rows to import instead of fetching the sheet
    pub rows: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub data: SyncData,
}

/// Counts and row errors reported back to the client
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncData {
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

impl From<ImportResult> for SyncData {
    fn from(result: ImportResult) -> Self {
        Self {
            total_rows: result.total_rows,
            imported: result.imported,
            skipped: result.skipped,
            errors: result.errors,
        }
    }
}

/// Connection check result
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncStatus {
    NotConfigured {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Connected {
        spreadsheet_id: String,
        row_count: usize,
        headers: Vec<String>,
    },
    Error {
        message: String,
    },
}

/// POST /api/sync/sheets - Import a Monzo sheet for the requesting owner
pub async fn sync_sheets(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, AppError> {
    let owner = request_owner(&headers, &state.config);
    let sheet_name = request
        .sheet_name
        .unwrap_or_else(|| state.config.default_sheet.clone());

    let rows = match request.rows {
        Some(rows) => rows,
        None => {
            let client = SheetsClient::from_config(
                &state.config.sheets,
                state.config.credentials.clone(),
            )
            .map_err(|e| AppError::internal(&e.to_string()))?;

            client.fetch_values(&sheet_name).await.map_err(|e| {
                warn!("Sheet fetch failed: {}", e);
                AppError::bad_gateway(&format!("Sync failed: {}", e))
            })?
        }
    };

    if rows.is_empty() {
        return Err(AppError::not_found("No data found in sheet"));
    }

    let db = state.db.clone();
    let options = state.config.import_options.clone();
    let label = sheet_name.clone();
    let import_owner = owner.clone();
    let result = tokio::task::spawn_blocking(move || {
        import_batch(&db, &import_owner, &rows, &label, &options)
    })
    .await?;

    info!(
        "Sync for {} from {:?}: {} imported, {} skipped",
        owner, sheet_name, result.imported, result.skipped
    );

    let message = if result.success {
        format!(
            "Imported {} transactions ({} skipped)",
            result.imported, result.skipped
        )
    } else {
        "Import failed".to_string()
    };

    Ok(Json(SyncResponse {
        success: result.success,
        message,
        data: result.into(),
    }))
}

/// GET /api/sync/sheets - Test the Sheets connection
pub async fn sync_status(State(state): State<Arc<AppState>>) -> Json<SyncStatus> {
    let config = &state.config;
    if !config.credentials.is_configured() {
        return Json(SyncStatus::NotConfigured {
            message: "Google Sheets API credentials not configured".to_string(),
        });
    }

    let client = match SheetsClient::from_config(&config.sheets, config.credentials.clone()) {
        Ok(client) => client,
        Err(e) => {
            return Json(SyncStatus::Error {
                message: e.to_string(),
            })
        }
    };

    match client.fetch_values(&config.default_sheet).await {
        Ok(rows) => Json(SyncStatus::Connected {
            spreadsheet_id: client.spreadsheet_id().to_string(),
            row_count: rows.len(),
            headers: rows.into_iter().next().unwrap_or_default(),
        }),
        Err(e) => Json(SyncStatus::Error {
            message: e.to_string(),
        }),
    }
}
