//! Domain models for Tally

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// External category used when the spreadsheet leaves the category cell blank
pub const DEFAULT_EXTERNAL_CATEGORY: &str = "General";

/// External category that marks internal money movements
pub const TRANSFERS_CATEGORY: &str = "Transfers";

/// Account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    CreditCard,
    Loan,
    Mortgage,
    Investment,
    Pension,
    Asset,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::CreditCard => "credit_card",
            Self::Loan => "loan",
            Self::Mortgage => "mortgage",
            Self::Investment => "investment",
            Self::Pension => "pension",
            Self::Asset => "asset",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "credit_card" | "credit" => Ok(Self::CreditCard),
            "loan" => Ok(Self::Loan),
            "mortgage" => Ok(Self::Mortgage),
            "investment" => Ok(Self::Investment),
            "pension" => Ok(Self::Pension),
            "asset" => Ok(Self::Asset),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A bank account owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub account_type: AccountType,
    pub institution: Option<String>,
    pub currency: String,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Account to be created
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub owner: String,
    pub name: String,
    pub account_type: AccountType,
    pub institution: Option<String>,
    pub currency: String,
    pub balance: Decimal,
}

/// An internal spending category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub is_system: bool,
    /// External (Monzo) category label this category was created for
    pub external_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Category to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
    pub icon: String,
    pub is_system: bool,
    pub external_key: Option<String>,
}

/// Monzo transaction type, derived from the spreadsheet's type column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    CardPayment,
    PotTransfer,
    FasterPayment,
    MonzoPaid,
    MonzoToMonzo,
    DirectDebit,
    StandingOrder,
    #[default]
    Other,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CardPayment => "card_payment",
            Self::PotTransfer => "pot_transfer",
            Self::FasterPayment => "faster_payment",
            Self::MonzoPaid => "monzo_paid",
            Self::MonzoToMonzo => "monzo_to_monzo",
            Self::DirectDebit => "direct_debit",
            Self::StandingOrder => "standing_order",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "card_payment" => Ok(Self::CardPayment),
            "pot_transfer" => Ok(Self::PotTransfer),
            "faster_payment" => Ok(Self::FasterPayment),
            "monzo_paid" => Ok(Self::MonzoPaid),
            "monzo_to_monzo" => Ok(Self::MonzoToMonzo),
            "direct_debit" => Ok(Self::DirectDebit),
            "standing_order" => Ok(Self::StandingOrder),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spreadsheet row after parsing, before category and account resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTransaction {
    /// Monzo transaction ID (`tx_...`), the idempotence key
    pub external_id: String,
    pub occurred_at: NaiveDateTime,
    pub amount: Decimal,
    pub description: String,
    pub merchant: Option<String>,
    pub external_category: String,
    pub notes: Option<String>,
    pub kind: TransactionKind,
    pub currency: Option<String>,
}

impl NormalizedTransaction {
    /// Internal money movements are kept out of spend totals
    pub fn excluded_from_budget(&self) -> bool {
        is_excluded_from_budget(self.kind, &self.external_category)
    }
}

/// Whether a transaction of this kind and external category is excluded from budgets
pub fn is_excluded_from_budget(kind: TransactionKind, external_category: &str) -> bool {
    kind == TransactionKind::PotTransfer || external_category == TRANSFERS_CATEGORY
}

/// A transaction row ready to be inserted
#[derive(Debug, Clone)]
pub struct NewTransactionRecord {
    pub account_id: i64,
    pub external_id: String,
    pub occurred_at: NaiveDateTime,
    pub amount: Decimal,
    pub description: String,
    pub merchant: Option<String>,
    pub category_id: Option<i64>,
    pub notes: Option<String>,
    pub kind: TransactionKind,
    pub currency: Option<String>,
    pub excluded_from_budget: bool,
}

impl NewTransactionRecord {
    pub fn from_normalized(
        account_id: i64,
        tx: &NormalizedTransaction,
        category_id: Option<i64>,
    ) -> Self {
        Self {
            account_id,
            external_id: tx.external_id.clone(),
            occurred_at: tx.occurred_at,
            amount: tx.amount,
            description: tx.description.clone(),
            merchant: tx.merchant.clone(),
            category_id,
            notes: tx.notes.clone(),
            kind: tx.kind,
            currency: tx.currency.clone(),
            excluded_from_budget: tx.excluded_from_budget(),
        }
    }
}

/// A stored transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub external_id: Option<String>,
    pub occurred_at: NaiveDateTime,
    pub amount: Decimal,
    pub description: String,
    pub merchant: Option<String>,
    pub category_id: Option<i64>,
    pub notes: Option<String>,
    pub kind: TransactionKind,
    pub currency: Option<String>,
    pub excluded_from_budget: bool,
    pub created_at: DateTime<Utc>,
}

/// Terminal status of an import attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Completed,
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for ImportStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Unknown import status: {}", s)),
        }
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the append-only import audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportLogEntry {
    pub id: i64,
    pub owner: String,
    pub source: String,
    pub records_processed: i64,
    pub records_imported: i64,
    pub status: ImportStatus,
    pub error_message: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// Import log entry to be appended
#[derive(Debug, Clone)]
pub struct NewImportLog {
    pub owner: String,
    pub source: String,
    pub records_processed: i64,
    pub records_imported: i64,
    pub status: ImportStatus,
    pub error_message: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// A problem with a single row or record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportError {
    /// 1-indexed sheet row (header is row 1); 0 when the row is not known
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub message: String,
}

impl ImportError {
    pub fn at_row(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            transaction_id: None,
            message: message.into(),
        }
    }

    pub fn for_transaction(transaction_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row: 0,
            transaction_id: Some(transaction_id.into()),
            message: message.into(),
        }
    }
}

/// A value that was accepted leniently but deserves attention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportWarning {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub message: String,
}

/// Outcome of importing one spreadsheet grid
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    /// Input row count minus the header
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ImportWarning>,
}

/// Format an amount for storage with two fractional digits
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}
