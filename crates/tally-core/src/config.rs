//! Tally configuration
//!
//! Loaded from TOML with this precedence:
//! 1. An explicit path (`--config`)
//! 2. `<data_local_dir>/tally/config.toml`
//! 3. The defaults compiled into the binary (`config/tally.toml`)
//!
//! Google credentials come from the environment only.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::sheets::{AmountPolicy, ImportOptions, DEFAULT_ACCOUNT_NAME, DEFAULT_SHEET_NAME};

/// Embedded default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

/// API key for publicly shared sheets
pub const SHEETS_API_KEY_ENV: &str = "GOOGLE_SHEETS_API_KEY";

/// OAuth bearer token for private sheets
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub owner: String,
    pub account_name: String,
    pub source_label: String,
    pub amount_policy: AmountPolicy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            owner: "default".to_string(),
            account_name: DEFAULT_ACCOUNT_NAME.to_string(),
            source_label: DEFAULT_SHEET_NAME.to_string(),
            amount_policy: AmountPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub spreadsheet_id: Option<String>,
    pub api_base: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            api_base: DEFAULT_SHEETS_API_BASE.to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallyConfig {
    pub import: ImportConfig,
    pub sheets: SheetsConfig,
}

impl TallyConfig {
    /// Load configuration, preferring `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) if path.exists() => read_config(path)?,
            Some(path) => {
                warn!("Config {} not found, using defaults", path.display());
                DEFAULT_CONFIG.to_string()
            }
            None => match default_config_path() {
                Some(default_path) if default_path.exists() => read_config(&default_path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// Options passed to the import pipeline
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            amount_policy: self.import.amount_policy,
            account_name: self.import.account_name.clone(),
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    debug!("Loading config from {}", path.display());
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    import: Option<RawImport>,
    sheets: Option<RawSheets>,
}

#[derive(Debug, Deserialize)]
struct RawImport {
    owner: Option<String>,
    account_name: Option<String>,
    source_label: Option<String>,
    amount_policy: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSheets {
    spreadsheet_id: Option<String>,
    api_base: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<TallyConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = TallyConfig::default();

    if let Some(import) = raw.import {
        if let Some(owner) = import.owner {
            config.import.owner = owner;
        }
        if let Some(account_name) = import.account_name {
            config.import.account_name = account_name;
        }
        if let Some(source_label) = import.source_label {
            config.import.source_label = source_label;
        }
        if let Some(policy) = import.amount_policy {
            config.import.amount_policy = policy.parse().map_err(Error::Config)?;
        }
    }

    if let Some(sheets) = raw.sheets {
        config.sheets.spreadsheet_id = sheets.spreadsheet_id.filter(|id| !id.trim().is_empty());
        if let Some(api_base) = sheets.api_base {
            config.sheets.api_base = api_base;
        }
    }

    Ok(config)
}
