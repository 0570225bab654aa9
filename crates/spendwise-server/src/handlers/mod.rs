//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod ai;
pub mod analytics;
pub mod health;
pub mod ledger;

// Re-export all handlers for use in router
pub use ai::*;
pub use analytics::*;
pub use health::*;
pub use ledger::*;

use chrono::NaiveDate;
use serde::Deserialize;

/// Optional reference date for month-scoped analytics
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<NaiveDate>,
}
