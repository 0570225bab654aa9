//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ai` - AI-backed commands (categorize, insights, ai test)
//! - `config` - Analytics configuration commands
//! - `prompts` - Prompt library management commands
//! - `reports` - Rule-based report commands
//! - `serve` - Web server command
//! - `shared` - Shared utilities (config, ledger and date loading, advisor)

pub mod ai;
pub mod config;
pub mod prompts;
pub mod reports;
pub mod serve;
pub mod shared;

// Re-export command functions for main.rs
pub use ai::*;
pub use config::*;
pub use prompts::*;
pub use reports::*;
pub use serve::*;
pub use shared::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
