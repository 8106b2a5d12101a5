//! Import and sync command implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use tally_core::{
    db::Database,
    import_batch,
    models::ImportResult,
    sheets::read_grid_from_path,
    ImportOptions, SheetsClient, SheetsCredentials, TallyConfig,
};

/// Errors listed before the rest are summarised
const MAX_LISTED_ERRORS: usize = 10;

pub fn cmd_import(
    db: &Database,
    owner: &str,
    file: &Path,
    sheet_name: &str,
    options: &ImportOptions,
) -> Result<ImportResult> {
    println!("📥 Importing {} for {}...", file.display(), owner);

    let rows = read_grid_from_path(file)
        .with_context(|| format!("Failed to read CSV: {}", file.display()))?;
    println!("   Found {} rows", rows.len());

    Ok(import_batch(db, owner, &rows, sheet_name, options))
}

pub async fn cmd_sync(
    db: &Database,
    owner: &str,
    config: &TallyConfig,
    sheet_name: &str,
) -> Result<ImportResult> {
    let client = SheetsClient::from_config(&config.sheets, SheetsCredentials::from_env())
        .context("Google Sheets sync is not configured")?;

    println!(
        "🔄 Fetching {:?} from spreadsheet {}...",
        sheet_name,
        client.spreadsheet_id()
    );
    let rows = client.fetch_values(sheet_name).await?;
    if rows.is_empty() {
        bail!("No data found in sheet");
    }
    println!("   Found {} rows", rows.len());

    let db = db.clone();
    let owner = owner.to_string();
    let sheet_name = sheet_name.to_string();
    let options = config.import_options();
    let result = tokio::task::spawn_blocking(move || {
        import_batch(&db, &owner, &rows, &sheet_name, &options)
    })
    .await
    .context("Import task panicked")?;

    Ok(result)
}

pub fn print_import_result(result: &ImportResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    if result.success {
        println!("✅ Import complete!");
    } else {
        println!("❌ Import failed");
    }
    println!("   Rows: {}", result.total_rows);
    println!("   Imported: {}", result.imported);
    println!("   Skipped (duplicates): {}", result.skipped);

    if !result.errors.is_empty() {
        println!();
        println!("⚠️  {} error(s):", result.errors.len());
        for err in result.errors.iter().take(MAX_LISTED_ERRORS) {
            match (&err.transaction_id, err.row) {
                (Some(id), _) => println!("   {}: {}", id, err.message),
                (None, 0) => println!("   {}", err.message),
                (None, row) => println!("   Row {}: {}", row, err.message),
            }
        }
        if result.errors.len() > MAX_LISTED_ERRORS {
            println!("   ... and {} more", result.errors.len() - MAX_LISTED_ERRORS);
        }
    }

    if !result.warnings.is_empty() {
        println!();
        println!("💡 {} warning(s):", result.warnings.len());
        for warning in result.warnings.iter().take(MAX_LISTED_ERRORS) {
            println!("   Row {}: {}", warning.row, warning.message);
        }
    }

    if !result.success {
        bail!("Import failed");
    }

    Ok(())
}
