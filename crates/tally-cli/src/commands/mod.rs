//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `import` - CSV import and Google Sheets sync
//! - `serve` - Web server command
//! - `status` - Accounts, categories and import history listings
//! - `transactions` - Transaction listing

pub mod core;
pub mod import;
pub mod serve;
pub mod status;
pub mod transactions;

// Re-export command functions for main.rs
pub use core::*;
pub use import::*;
pub use serve::*;
pub use status::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
