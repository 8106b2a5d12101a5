//! Import orchestration
//!
//! Sequence for one grid: parse, reconcile categories, resolve the account,
//! write, then log. Any store failure along the way turns into a `failed` log
//! entry and an unsuccessful `ImportResult` rather than an `Err`.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::normalize::AmountPolicy;
use super::parse::parse_batch;
use super::reconcile::reconcile;
use super::writer::write;
use crate::error::Result;
use crate::models::{
    AccountType, ImportError, ImportResult, ImportStatus, NewAccount, NewImportLog,
};
use crate::store::ImportStore;

/// Log source for Monzo spreadsheet imports
pub const IMPORT_SOURCE: &str = "monzo_sheets";

/// Sheet imported when none is named
pub const DEFAULT_SHEET_NAME: &str = "Personal Account Transactions";

/// Name of the account created when the owner has none
pub const DEFAULT_ACCOUNT_NAME: &str = "Monzo Personal";

/// Knobs for a single import
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub amount_policy: AmountPolicy,
    /// Name used if an account has to be created
    pub account_name: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            amount_policy: AmountPolicy::default(),
            account_name: DEFAULT_ACCOUNT_NAME.to_string(),
        }
    }
}

/// Import one spreadsheet grid for `owner`
///
/// `source_label` is usually the sheet name and ends up in the import log as
/// `monzo_sheets:<source_label>`.
pub fn import_batch<S, R>(
    store: &S,
    owner: &str,
    rows: &[R],
    source_label: &str,
    options: &ImportOptions,
) -> ImportResult
where
    S: ImportStore + ?Sized,
    R: AsRef<[String]>,
{
    let total_rows = rows.len().saturating_sub(1);

    match run_import(store, owner, rows, source_label, options) {
        Ok(mut result) => {
            result.total_rows = total_rows;
            result
        }
        Err(e) => {
            let message = e.to_string();
            warn!("Import for {} failed: {}", owner, message);

            let entry = NewImportLog {
                owner: owner.to_string(),
                source: IMPORT_SOURCE.to_string(),
                records_processed: 0,
                records_imported: 0,
                status: ImportStatus::Failed,
                error_message: Some(message.clone()),
                completed_at: Utc::now(),
            };
            if let Err(log_err) = store.append_import_log(&entry) {
                warn!("Failed to record failed import: {}", log_err);
            }

            ImportResult {
                success: false,
                total_rows,
                imported: 0,
                skipped: 0,
                errors: vec![ImportError::at_row(0, message)],
                warnings: Vec::new(),
            }
        }
    }
}

fn run_import<S, R>(
    store: &S,
    owner: &str,
    rows: &[R],
    source_label: &str,
    options: &ImportOptions,
) -> Result<ImportResult>
where
    S: ImportStore + ?Sized,
    R: AsRef<[String]>,
{
    let parsed = parse_batch(rows, options.amount_policy);
    let mut errors = parsed.errors;

    if parsed.transactions.is_empty() {
        return Ok(ImportResult {
            success: true,
            errors,
            warnings: parsed.warnings,
            ..Default::default()
        });
    }

    let category_map = reconcile(
        store,
        owner,
        parsed
            .transactions
            .iter()
            .map(|t| t.external_category.as_str()),
    )?;

    let account_id = resolve_account(store, owner, &options.account_name)?;

    let outcome = write(store, account_id, &parsed.transactions, &category_map)?;
    errors.extend(outcome.errors);

    store.append_import_log(&NewImportLog {
        owner: owner.to_string(),
        source: format!("{}:{}", IMPORT_SOURCE, source_label),
        records_processed: parsed.transactions.len() as i64,
        records_imported: outcome.imported as i64,
        status: ImportStatus::Completed,
        error_message: None,
        completed_at: Utc::now(),
    })?;

    info!(
        "Imported {} transactions for {} ({} skipped, {} errors)",
        outcome.imported,
        owner,
        outcome.skipped,
        errors.len()
    );

    Ok(ImportResult {
        success: true,
        total_rows: 0,
        imported: outcome.imported,
        skipped: outcome.skipped,
        errors,
        warnings: parsed.warnings,
    })
}

/// Pick the account imported rows belong to, creating one if needed
///
/// Prefers an account that mentions Monzo in its name or institution, then the
/// owner's first account.
pub fn resolve_account<S: ImportStore + ?Sized>(
    store: &S,
    owner: &str,
    account_name: &str,
) -> Result<i64> {
    let accounts = store.list_accounts(owner)?;

    let mentions_monzo = |s: &str| s.to_lowercase().contains("monzo");
    let monzo = accounts.iter().find(|a| {
        mentions_monzo(&a.name) || a.institution.as_deref().is_some_and(mentions_monzo)
    });

    if let Some(account) = monzo.or_else(|| accounts.first()) {
        return Ok(account.id);
    }

    let id = store.insert_account(&NewAccount {
        owner: owner.to_string(),
        name: account_name.to_string(),
        account_type: AccountType::Checking,
        institution: Some("Monzo".to_string()),
        currency: "GBP".to_string(),
        balance: Decimal::ZERO,
    })?;
    info!("Created account {:?} for {}", account_name, owner);

    Ok(id)
}
