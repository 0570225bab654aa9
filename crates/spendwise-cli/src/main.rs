//! Spendwise CLI - Expense analytics with an AI assist
//!
//! Usage:
//!   spendwise report all --file expenses.csv    Print rule-based reports
//!   spendwise categorize "Uber to airport"      Suggest a category
//!   spendwise insights --file expenses.csv      Spending observations
//!   spendwise serve --port 8000                 Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
            ledger,
            signed,
            allow_origins,
        } => {
            commands::cmd_serve(
                config,
                &host,
                port,
                static_dir.as_deref(),
                ledger.as_deref(),
                signed,
                allow_origins,
            )
            .await
        }
        Commands::Report { kind, input, json } => {
            let ledger = commands::load_ledger(&input)?;
            let today = commands::resolve_date(input.date.as_deref())?;
            commands::cmd_report(config, &ledger, kind, today, json)
        }
        Commands::Categorize { name, amount } => {
            commands::cmd_categorize(config, &name, amount).await
        }
        Commands::Insights { input, json } => {
            let ledger = commands::load_ledger(&input)?;
            let today = commands::resolve_date(input.date.as_deref())?;
            commands::cmd_insights(config, &ledger, today, json).await
        }
        Commands::Ai { action } => match action {
            AiAction::Test { name } => commands::cmd_ai_test(config, &name).await,
        },
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { id }) => commands::cmd_prompts_show(&id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Config { action } => match action {
            None | Some(ConfigAction::Show) => commands::cmd_config_show(&config),
            Some(ConfigAction::Path) => commands::cmd_config_path(),
        },
    }
}
