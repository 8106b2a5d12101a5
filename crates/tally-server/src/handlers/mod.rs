//! HTTP request handlers organized by domain

pub mod import_history;
pub mod sync;

// Re-export all handlers for use in router
pub use import_history::*;
pub use sync::*;
