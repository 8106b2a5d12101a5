//! Turning a decoded row into a typed transaction
//!
//! Rows with no transaction ID or no date are not transactions (blank lines,
//! a repeated header) and are skipped rather than reported.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use thiserror::Error;

use super::decode::DecodedRow;
use crate::models::{NormalizedTransaction, TransactionKind, DEFAULT_EXTERNAL_CATEGORY};

/// Header cell of the transaction ID column
pub const HEADER_LABEL: &str = "Transaction ID";

const UNKNOWN_DESCRIPTION: &str = "Unknown transaction";

/// Characters dropped from amount cells before parsing
const AMOUNT_NOISE: &[char] = &['£', '$', '€', ','];

/// Type keywords in priority order; the first one found in the squashed type wins
const KIND_KEYWORDS: &[(&str, TransactionKind)] = &[
    ("cardpayment", TransactionKind::CardPayment),
    ("pottransfer", TransactionKind::PotTransfer),
    ("fasterpayment", TransactionKind::FasterPayment),
    ("monzopaid", TransactionKind::MonzoPaid),
    ("monzotomonzo", TransactionKind::MonzoToMonzo),
    ("directdebit", TransactionKind::DirectDebit),
    ("standingorder", TransactionKind::StandingOrder),
];

/// A problem that makes a single row unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// How to treat amount cells that do not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountPolicy {
    /// Record the amount as zero and raise a warning
    #[default]
    Lenient,
    /// Reject the row
    Strict,
}

impl AmountPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for AmountPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("Unknown amount policy: {}", s)),
        }
    }
}

impl std::fmt::Display for AmountPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized row plus anything that was accepted leniently
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub transaction: NormalizedTransaction,
    pub warning: Option<String>,
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Normalize a decoded row
///
/// Returns `Ok(None)` for rows that should be skipped silently.
pub fn normalize(
    row: &DecodedRow,
    policy: AmountPolicy,
) -> std::result::Result<Option<Normalized>, RowError> {
    let external_id = match non_empty(&row.transaction_id) {
        Some(id) if id != HEADER_LABEL => id,
        _ => return Ok(None),
    };
    let Some(date_text) = non_empty(&row.date) else {
        return Ok(None);
    };

    let occurred_at = parse_datetime(date_text, &row.time)?;

    // A missing amount cell is zero, not malformed text
    let (amount, warning) = match non_empty(&row.amount).map(parse_amount) {
        None => (Decimal::ZERO, None),
        Some(Some(amount)) => (amount, None),
        Some(None) => match policy {
            AmountPolicy::Lenient => (
                Decimal::ZERO,
                Some(format!("Unparseable amount {:?} recorded as 0", row.amount)),
            ),
            AmountPolicy::Strict => return Err(RowError::InvalidAmount(row.amount.clone())),
        },
    };

    let merchant = non_empty(&row.name);
    let description = merchant
        .or_else(|| non_empty(&row.description))
        .unwrap_or(UNKNOWN_DESCRIPTION);

    Ok(Some(Normalized {
        transaction: NormalizedTransaction {
            external_id: external_id.to_string(),
            occurred_at,
            amount,
            description: description.to_string(),
            merchant: merchant.map(str::to_string),
            external_category: non_empty(&row.category)
                .unwrap_or(DEFAULT_EXTERNAL_CATEGORY)
                .to_string(),
            notes: build_notes(row),
            kind: classify_kind(&row.kind),
            currency: non_empty(&row.currency).map(str::to_string),
        },
        warning,
    }))
}

/// Parse `DD/MM/YYYY` plus `HH:MM:SS` into a local date-time
///
/// A blank time means midnight; missing minute or second components are zero.
pub fn parse_datetime(date: &str, time: &str) -> std::result::Result<NaiveDateTime, RowError> {
    let invalid_date = || RowError::InvalidDate(date.to_string());

    let parts: Vec<&str> = date.trim().split('/').map(str::trim).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(invalid_date());
    };
    let day: u32 = day.parse().map_err(|_| invalid_date())?;
    let month: u32 = month.parse().map_err(|_| invalid_date())?;
    let year: i32 = year.parse().map_err(|_| invalid_date())?;
    let date_part = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid_date)?;

    let time_part = match non_empty(time) {
        None => NaiveTime::MIN,
        Some(time_text) => {
            let invalid_time = || RowError::InvalidTime(time.to_string());
            let parts: Vec<&str> = time_text.split(':').map(str::trim).collect();
            if parts.len() > 3 {
                return Err(invalid_time());
            }
            let mut hms = [0u32; 3];
            for (slot, part) in hms.iter_mut().zip(&parts) {
                *slot = part.parse().map_err(|_| invalid_time())?;
            }
            NaiveTime::from_hms_opt(hms[0], hms[1], hms[2]).ok_or_else(invalid_time)?
        }
    };

    Ok(date_part.and_time(time_part))
}

/// Parse an amount cell, ignoring currency symbols, thousands separators and whitespace
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && !AMOUNT_NOISE.contains(c))
        .collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(cleaned).ok()
}

/// Classify a free-text Monzo type
pub fn classify_kind(text: &str) -> TransactionKind {
    let squashed: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_') && !c.is_whitespace())
        .collect();

    KIND_KEYWORDS
        .iter()
        .find(|(keyword, _)| squashed.contains(keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or_default()
}

fn build_notes(row: &DecodedRow) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(notes) = non_empty(&row.notes_and_tags) {
        parts.push(notes.to_string());
    }
    if let Some(address) = non_empty(&row.address) {
        parts.push(format!("Location: {}", address));
    }
    (!parts.is_empty()).then(|| parts.join(" | "))
}
