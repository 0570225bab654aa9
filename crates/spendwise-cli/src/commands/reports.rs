//! Report command implementations

use anyhow::Result;
use chrono::NaiveDate;
use spendwise_core::{
    AnalyticsConfig, AnalyticsEngine, AnalyticsReport, BudgetAlert, BudgetStatus,
    ExpenseAnalytics, ExpensePrediction, HealthScore, Ledger, SavingsAdvice,
};

use super::truncate;
use crate::cli::ReportKind;

/// Print one or all rule-based reports for a ledger
pub fn cmd_report(
    config: AnalyticsConfig,
    ledger: &Ledger,
    kind: ReportKind,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let engine = AnalyticsEngine::with_config(config);
    let report = engine.report(ledger, today);

    if json {
        let value = match kind {
            ReportKind::Summary => serde_json::to_value(&report.analytics)?,
            ReportKind::Alerts => serde_json::to_value(&report.alerts)?,
            ReportKind::Budgets => serde_json::to_value(&report.budget_status)?,
            ReportKind::Health => serde_json::to_value(&report.health)?,
            ReportKind::Predict => serde_json::to_value(&report.prediction)?,
            ReportKind::Advice => serde_json::to_value(&report.advice)?,
            ReportKind::All => serde_json::to_value(&report)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_report(&report, kind);
    Ok(())
}

fn print_report(report: &AnalyticsReport, kind: ReportKind) {
    let all = kind == ReportKind::All;
    if all || kind == ReportKind::Summary {
        print_summary(&report.analytics);
    }
    if all || kind == ReportKind::Alerts {
        print_alerts(&report.alerts);
    }
    if all || kind == ReportKind::Budgets {
        print_budgets(&report.budget_status);
    }
    if all || kind == ReportKind::Health {
        print_health(&report.health);
    }
    if all || kind == ReportKind::Predict {
        print_prediction(&report.prediction);
    }
    if all || kind == ReportKind::Advice {
        print_advice(&report.advice);
    }
}

fn print_summary(analytics: &ExpenseAnalytics) {
    println!();
    println!("📊 Spending Summary");
    println!("   ─────────────────────────────────────────────────────────────");

    if analytics.category_breakdown.is_empty() {
        println!("   No expenses found.");
        return;
    }

    println!("   Total: {:.2}", analytics.total_expenses);
    println!();
    println!("   {:25} │ {:>10} │ {:>6}", "Category", "Amount", "%");
    println!("   ──────────────────────────┼────────────┼────────");

    let mut categories: Vec<_> = analytics.category_breakdown.iter().collect();
    categories.sort_by(|a, b| b.1.total_cmp(a.1));
    for (category, amount) in categories {
        let share = if analytics.total_expenses > 0.0 {
            amount / analytics.total_expenses * 100.0
        } else {
            0.0
        };
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}%",
            truncate(category, 25),
            amount,
            share
        );
    }

    println!();
    println!("   {:12} │ {:>10} │ {:>5}", "Month", "Amount", "Count");
    println!("   ─────────────┼────────────┼───────");
    for month in &analytics.monthly_trend {
        println!(
            "   {:12} │ {:>10.2} │ {:>5}",
            month.month, month.total, month.count
        );
    }
}

fn print_alerts(alerts: &[BudgetAlert]) {
    println!();
    println!("🚨 Budget Alerts");
    println!("   ─────────────────────────────────────────────────────────────");

    if alerts.is_empty() {
        println!("   ✅ No budgets near their limit.");
        return;
    }

    for alert in alerts {
        let icon = match alert.alert_type {
            spendwise_core::AlertType::Danger => "🔴",
            spendwise_core::AlertType::Warning => "🟡",
        };
        println!(
            "   {} {:20} {:>10.2} of {:>10.2} ({:.1}%)",
            icon,
            truncate(&alert.category, 20),
            alert.spent_amount,
            alert.budget_amount,
            alert.percentage_used
        );
    }
}

fn print_budgets(statuses: &[BudgetStatus]) {
    println!();
    println!("💰 Budget Status");
    println!("   ─────────────────────────────────────────────────────────────");

    if statuses.is_empty() {
        println!("   No budgets defined.");
        return;
    }

    println!(
        "   {:20} │ {:>10} │ {:>10} │ {:>10} │ {}",
        "Category", "Budget", "Spent", "Remaining", "Status"
    );
    println!("   ─────────────────────┼────────────┼────────────┼────────────┼──────────");
    for status in statuses {
        println!(
            "   {:20} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {}",
            truncate(&status.category, 20),
            status.budget_amount,
            status.spent_amount,
            status.remaining,
            status.status
        );
    }
}

fn print_health(health: &HealthScore) {
    println!();
    println!("❤️  Financial Health");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Score: {}/100 ({})", health.score, health.grade.as_str());
    println!("   {}", health.message);

    if !health.factors.is_empty() {
        println!();
        println!("   Factors:");
        for factor in &health.factors {
            println!("      • {}", factor);
        }
    }
    if !health.recommendations.is_empty() {
        println!();
        println!("   Recommendations:");
        for rec in &health.recommendations {
            println!("      • {}", rec);
        }
    }
}

fn print_prediction(prediction: &ExpensePrediction) {
    println!();
    println!("🔮 Next Month Prediction");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {}", prediction.message);
    println!(
        "   Method: {}   Confidence: {:.0}%   Months analyzed: {}",
        prediction.method.as_str(),
        prediction.confidence * 100.0,
        prediction.months_analyzed
    );

    if !prediction.category_breakdown.is_empty() {
        println!();
        for (category, amount) in &prediction.category_breakdown {
            println!("   {:25} │ {:>10.2}", truncate(category, 25), amount);
        }
    }
}

fn print_advice(advice: &[SavingsAdvice]) {
    println!();
    println!("💡 Savings Advice");
    println!("   ─────────────────────────────────────────────────────────────");

    for item in advice {
        println!("   [{}] {}", item.priority.as_str(), item.title);
        println!("      {}", item.message);
        if item.potential_savings > 0.0 {
            println!("      Potential savings: {:.2}", item.potential_savings);
        }
    }
}
