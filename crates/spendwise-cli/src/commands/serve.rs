//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendwise_core::{AnalyticsConfig, Ledger, LedgerStore};

pub async fn cmd_serve(
    config: AnalyticsConfig,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    ledger_path: Option<&Path>,
    signed: bool,
    allowed_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Spendwise web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let store = match ledger_path {
        Some(path) => {
            let ledger = Ledger::load(path, signed)
                .with_context(|| format!("Failed to load ledger {}", path.display()))?;
            println!(
                "   Ledger: {} ({} expenses, {} income, {} budgets)",
                path.display(),
                ledger.expenses.len(),
                ledger.income.len(),
                ledger.budgets.len()
            );
            LedgerStore::with_ledger(ledger)?
        }
        None => {
            println!("   Ledger: empty (in-memory)");
            LedgerStore::new()
        }
    };

    if allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let advisor = spendwise_server::build_advisor(config).await?;

    let server_config = spendwise_server::ServerConfig {
        allowed_origins,
        fixed_today: None,
    };

    let static_dir_str = match static_dir {
        Some(p) => Some(
            p.to_str()
                .context("static_dir path must be valid UTF-8")?,
        ),
        None => None,
    };
    spendwise_server::serve_with_config(store, advisor, host, port, static_dir_str, server_config)
        .await?;

    Ok(())
}
