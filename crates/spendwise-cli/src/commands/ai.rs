//! AI-backed command implementations (categorize, insights, ai test)

use anyhow::Result;
use chrono::NaiveDate;
use spendwise_core::ai::AIBackend;
use spendwise_core::{AIClient, AdviceSource, AnalyticsConfig, Insight, Ledger, Transaction};

use super::build_advisor;

/// Suggest a category for an expense name
pub async fn cmd_categorize(config: AnalyticsConfig, name: &str, amount: f64) -> Result<()> {
    let advisor = build_advisor(config)?;
    let advice = advisor.suggest_category(name, amount).await;

    println!("{} → {}", name, advice.value);
    println!("   Source: {}", source_label(advice.source));
    Ok(())
}

/// Print spending observations for a ledger
pub async fn cmd_insights(
    config: AnalyticsConfig,
    ledger: &Ledger,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let advisor = build_advisor(config)?;
    let advice = advisor.insights(&ledger.expenses, today).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
        return Ok(());
    }

    println!();
    println!("🧠 Spending Insights ({})", source_label(advice.source));
    println!("   ─────────────────────────────────────────────────────────────");
    print_insights(&advice.value);
    Ok(())
}

fn print_insights(insights: &[Insight]) {
    if insights.is_empty() {
        println!("   No expenses to analyze.");
        return;
    }
    for insight in insights {
        println!(
            "   [{}] {} ({:.0}% confidence)",
            insight.kind.as_str(),
            insight.message,
            insight.confidence * 100.0
        );
    }
}

fn source_label(source: AdviceSource) -> &'static str {
    match source {
        AdviceSource::Ai => "AI",
        AdviceSource::Rules => "rule-based",
    }
}

/// Test the configured AI backend and each AI feature
pub async fn cmd_ai_test(config: AnalyticsConfig, name: &str) -> Result<()> {
    println!("🔍 Testing AI backend...\n");

    let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());
    println!("  AI_BACKEND: {}", backend);

    let client = match AIClient::from_env(config.ai_timeout) {
        Ok(client) => client,
        Err(e) => {
            println!("\n⚠️  {}", e);
            println!("\nTo configure a backend, set one of:");
            println!("  AI_BACKEND=gemini            GOOGLE_API_KEY=...");
            println!("  AI_BACKEND=openai_compatible OPENAI_COMPATIBLE_HOST=http://localhost:8080");
            println!("  AI_BACKEND=ollama            OLLAMA_HOST=http://localhost:11434");
            println!("\nRule-based analytics keep working without a backend.");
            return Ok(());
        }
    };

    println!("  Host: {}", client.host());
    println!("  Model: {}\n", client.model());

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {} at {}", client.kind(), client.host());
        return Ok(());
    }

    println!("\n📋 Testing category suggestion...\n");
    print!("  \"{}\" → ", name);
    match client.suggest_category(name, 0.0).await {
        Ok(category) => println!("{}", category),
        Err(e) => println!("❌ Error: {}", e),
    }

    let sample = sample_expenses();

    println!("\n🔮 Testing expense prediction...\n");
    match client
        .predict_expenses(&sample, config.prediction_window_days)
        .await
    {
        Ok(prediction) => {
            println!("  Predicted total: {:.2}", prediction.predicted_total);
            for (category, amount) in &prediction.category_breakdown {
                println!("    {:20} {:>10.2}", category, amount);
            }
        }
        Err(e) => println!("  ❌ Error: {}", e),
    }

    println!("\n🧠 Testing spending insights...\n");
    match client.spending_insights(&sample).await {
        Ok(insights) => print_insights(&insights),
        Err(e) => println!("  ❌ Error: {}", e),
    }

    println!("\n✅ AI test complete");
    Ok(())
}

fn sample_expenses() -> Vec<Transaction> {
    let today = chrono::Local::now().date_naive();
    let day = |offset: i64| {
        (today - chrono::Duration::days(offset))
            .format(spendwise_core::models::DATE_FORMAT)
            .to_string()
    };
    vec![
        Transaction::new("Groceries", 85.40, &day(3), "Food"),
        Transaction::new("Metro card", 30.00, &day(10), "Transportation"),
        Transaction::new("Electricity bill", 62.15, &day(20), "Bills"),
        Transaction::new("Movie night", 24.00, &day(35), "Entertainment"),
        Transaction::new("Rent", 1200.00, &day(40), "Housing"),
    ]
}
