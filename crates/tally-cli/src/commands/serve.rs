//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{SheetsCredentials, TallyConfig};
use tally_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    config: &TallyConfig,
    owner: &str,
) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Default owner: {}", owner);

    let credentials = SheetsCredentials::from_env();
    if credentials.is_configured() {
        match &config.sheets.spreadsheet_id {
            Some(id) => println!("   📄 Sheets sync: {}", id),
            None => println!("   ⚠️  Sheets credentials set but no [sheets] spreadsheet_id"),
        }
    } else {
        println!("   💡 Tip: Set GOOGLE_SHEETS_API_KEY or GOOGLE_ACCESS_TOKEN to enable sync");
    }

    // Parse allowed CORS origins (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("TALLY_CORS_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let mut server_config = ServerConfig::from_tally_config(config, credentials);
    server_config.default_owner = owner.to_string();
    server_config.allowed_origins = allowed_origins;

    let db = open_db(db_path)?;
    tally_server::serve_with_config(db, host, port, server_config)
        .await
        .context("Server error")
}
