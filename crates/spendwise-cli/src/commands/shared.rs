//! Shared utilities for commands
//!
//! This module contains:
//! - `load_config` - Resolve the analytics configuration
//! - `load_ledger` - Read expenses, income and budgets from files
//! - `resolve_date` - Parse the reference date
//! - `build_advisor` - Analytics engine plus the AI backend from the environment

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use spendwise_core::import::{load_budgets, load_transactions};
use spendwise_core::models::DATE_FORMAT;
use spendwise_core::{AIClient, Advisor, AnalyticsConfig, AnalyticsEngine, Ledger};
use tracing::debug;

/// Explicit config file, else the data directory override, else built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    match path {
        Some(p) => AnalyticsConfig::load_from(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => AnalyticsConfig::load().context("Failed to load analytics config"),
    }
}

/// Read the ledger described by the shared `--file/--income/--budgets` flags
pub fn load_ledger(args: &crate::cli::LedgerArgs) -> Result<Ledger> {
    let mut ledger = Ledger::load(&args.file, args.signed)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    if let Some(ref path) = args.income {
        let income = load_transactions(path)
            .with_context(|| format!("Failed to load income from {}", path.display()))?;
        ledger.income.extend(income);
    }

    if let Some(ref path) = args.budgets {
        let budgets = load_budgets(path)
            .with_context(|| format!("Failed to load budgets from {}", path.display()))?;
        ledger.budgets.extend(budgets);
    }

    ledger.validate().context("Invalid ledger")?;
    Ok(ledger)
}

/// Parse `--date`, defaulting to today
pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => NaiveDate::parse_from_str(d, DATE_FORMAT)
            .with_context(|| format!("Invalid --date '{}' (use YYYY-MM-DD)", d)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Advisor using the AI backend configured in the environment, if any
pub fn build_advisor(config: AnalyticsConfig) -> Result<Advisor> {
    let ai = match AIClient::from_env(config.ai_timeout) {
        Ok(client) => Some(client),
        Err(e) => {
            debug!(reason = %e, "AI backend not configured");
            None
        }
    };
    Ok(Advisor::new(AnalyticsEngine::with_config(config), ai)?)
}
