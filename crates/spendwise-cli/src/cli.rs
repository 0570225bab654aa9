//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Spendwise - Expense analytics with an AI assist
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Expense tracker analytics with AI insights and rule-based fallback", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analytics config file (defaults to the data directory override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (the browser frontend)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Ledger file (CSV, JSON array or JSON ledger object) to seed the store with
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Treat ledger amounts as signed (negative = expense, positive = income)
        #[arg(long)]
        signed: bool,

        /// Allowed CORS origin (repeatable, `*` for any)
        #[arg(long = "allow-origin")]
        allow_origins: Vec<String>,
    },

    /// Print rule-based reports for a ledger file
    Report {
        /// Which report to print
        #[arg(value_enum, default_value = "all")]
        kind: ReportKind,

        #[command(flatten)]
        input: LedgerArgs,

        /// Output JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Suggest a category for an expense name
    Categorize {
        /// Expense name, e.g. "Uber to airport"
        name: String,

        /// Expense amount
        #[arg(short, long, default_value = "0")]
        amount: f64,
    },

    /// Spending observations (AI when configured, rules otherwise)
    Insights {
        #[command(flatten)]
        input: LedgerArgs,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// AI backend commands
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },

    /// Manage AI prompts (list, show, path)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Show analytics configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// Ledger input shared by report-style commands
#[derive(clap::Args, Debug, Clone)]
pub struct LedgerArgs {
    /// Expenses file (.csv, .json array, or .json ledger object)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Income file (.csv or .json array)
    #[arg(long)]
    pub income: Option<PathBuf>,

    /// Budgets file (.csv or .json array)
    #[arg(long)]
    pub budgets: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Treat amounts in --file as signed (negative = expense, positive = income)
    #[arg(long)]
    pub signed: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    /// Totals, category breakdown and monthly trend
    Summary,
    /// Budget warning and danger alerts
    Alerts,
    /// Progress of every budget this month
    Budgets,
    /// Financial health score
    Health,
    /// Next-month expense prediction
    Predict,
    /// Savings advice
    Advice,
    /// Everything above
    All,
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Check the configured backend and run each AI feature once
    Test {
        /// Expense name to categorize
        #[arg(long, default_value = "Uber to airport")]
        name: String,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., suggest_category, predict_expenses)
        id: String,
    },

    /// Show the prompts override directory path
    Path,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML-like key/values
    Show,

    /// Show the config override path
    Path,
}
