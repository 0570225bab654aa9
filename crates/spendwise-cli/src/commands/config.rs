//! Config command implementations

use anyhow::Result;
use spendwise_core::config::default_config_path;
use spendwise_core::AnalyticsConfig;

/// Print the effective analytics configuration
pub fn cmd_config_show(config: &AnalyticsConfig) -> Result<()> {
    println!("⚙️  Analytics Configuration\n");
    println!("[alerts]");
    println!("warning_threshold = {}", config.warning_threshold);
    println!("danger_threshold = {}", config.danger_threshold);
    println!();
    println!("[trend]");
    println!("months_back = {}", config.months_back);
    println!();
    println!("[prediction]");
    println!("window_days = {}", config.prediction_window_days);
    println!("growth_factor = {}", config.growth_factor);
    println!();
    println!("[advice]");
    println!("max_items = {}", config.max_advice);
    println!();
    println!("[ai]");
    println!("timeout_secs = {}", config.ai_timeout.as_secs());
    Ok(())
}

/// Show where a config override is read from
pub fn cmd_config_path() -> Result<()> {
    match default_config_path() {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                eprintln!();
                eprintln!("Note: No override file yet; built-in defaults are in use.");
            }
        }
        None => {
            eprintln!("Could not determine config directory.");
            eprintln!("The data directory is not available on this system.");
        }
    }
    Ok(())
}
