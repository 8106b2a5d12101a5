//! Google Sheets values API client
//!
//! Fetches columns A through P of one sheet as a grid of strings.
//!
//! # Configuration
//!
//! Environment variables (at least one is required):
//! - `GOOGLE_SHEETS_API_KEY`: API key, sent as the `key` query parameter
//! - `GOOGLE_ACCESS_TOKEN`: OAuth token, sent as a bearer `Authorization` header

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{SheetsConfig, ACCESS_TOKEN_ENV, SHEETS_API_KEY_ENV};
use crate::error::{Error, Result};

/// Columns covered by the Monzo export
const SHEET_COLUMNS: &str = "A:P";

/// Credentials for the values API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetsCredentials {
    pub api_key: Option<String>,
    pub access_token: Option<String>,
}

impl SheetsCredentials {
    /// Read credentials from the environment, ignoring empty values
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_key: var(SHEETS_API_KEY_ENV),
            access_token: var(ACCESS_TOKEN_ENV),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() || self.access_token.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Client for one spreadsheet
#[derive(Clone)]
pub struct SheetsClient {
    http_client: Client,
    api_base: String,
    spreadsheet_id: String,
    credentials: SheetsCredentials,
}

impl SheetsClient {
    pub fn new(api_base: &str, spreadsheet_id: &str, credentials: SheetsCredentials) -> Self {
        Self {
            http_client: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            credentials,
        }
    }

    /// Build a client from configuration, failing if sync is not set up
    pub fn from_config(config: &SheetsConfig, credentials: SheetsCredentials) -> Result<Self> {
        if !credentials.is_configured() {
            return Err(Error::Config(
                "Google Sheets API key or access token required".to_string(),
            ));
        }
        let spreadsheet_id = config.spreadsheet_id.as_deref().ok_or_else(|| {
            Error::Config("No spreadsheet_id configured in [sheets]".to_string())
        })?;

        Ok(Self::new(&config.api_base, spreadsheet_id, credentials))
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    /// URL of the `<sheet>!A:P` range
    pub fn values_url(&self, sheet_name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| Error::Config(format!("Invalid Sheets API base {}: {}", self.api_base, e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid Sheets API base {}", self.api_base)))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{}!{}", sheet_name, SHEET_COLUMNS));

        Ok(url)
    }

    /// Fetch every row of a sheet
    ///
    /// A sheet with no data yields an empty grid.
    pub async fn fetch_values(&self, sheet_name: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(sheet_name)?;
        debug!("Fetching sheet {:?} from {}", sheet_name, self.spreadsheet_id);

        let mut req_builder = self.http_client.get(url);
        if let Some(ref api_key) = self.credentials.api_key {
            req_builder = req_builder.query(&[("key", api_key)]);
        }
        if let Some(ref token) = self.credentials.access_token {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", token));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Sheets(format!(
                "Failed to fetch sheet data: {} - {}",
                status.as_u16(),
                body
            )));
        }

        let range: ValueRange = response.json().await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

/// Render a cell from the values API as text
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
