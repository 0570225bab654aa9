//! Rule-based spending observations
//!
//! Used in place of LLM insights when no AI backend is configured or the
//! backend fails.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde_json::json;

use crate::aggregate::{category_breakdown, monthly_trend, total_amount};
use crate::models::Transaction;

use super::types::{Insight, InsightKind};

pub const OBSERVATION_CONFIDENCE: f64 = 0.6;

/// Share of spending above which the top category becomes a warning
const DOMINANT_SHARE: f64 = 0.5;
/// Month-over-month increase that becomes a warning
const SHARP_INCREASE: f64 = 0.2;

pub fn observations(expenses: &[Transaction], reference: NaiveDate) -> Vec<Insight> {
    if expenses.is_empty() {
        return vec![];
    }

    let mut insights = Vec::new();
    let total = total_amount(expenses);
    let breakdown = category_breakdown(expenses);

    if let Some((category, amount)) = breakdown
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
    {
        if total > 0.0 {
            let share = amount / total;
            let kind = if share > DOMINANT_SHARE {
                InsightKind::Warning
            } else {
                InsightKind::Insight
            };
            insights.push(
                Insight::new(
                    kind,
                    format!(
                        "{} is your largest expense category at {:.0}% of total spending",
                        category,
                        share * 100.0
                    ),
                    OBSERVATION_CONFIDENCE,
                )
                .with_data(json!({
                    "category": category,
                    "amount": amount,
                    "percentage": share * 100.0,
                })),
            );
        }
    }

    let average = total / expenses.len() as f64;
    insights.push(
        Insight::new(
            InsightKind::Insight,
            format!(
                "Your average expense is {:.2} across {} transactions",
                average,
                expenses.len()
            ),
            OBSERVATION_CONFIDENCE,
        )
        .with_data(json!({
            "average": average,
            "count": expenses.len(),
        })),
    );

    let trend = monthly_trend(expenses, reference, 2);
    if let [previous, current] = trend.as_slice() {
        if previous.total > 0.0 {
            let change = (current.total - previous.total) / previous.total;
            let kind = if change > SHARP_INCREASE {
                InsightKind::Warning
            } else {
                InsightKind::Insight
            };
            let direction = if change >= 0.0 { "up" } else { "down" };
            insights.push(
                Insight::new(
                    kind,
                    format!(
                        "Spending in {} is {} {:.0}% compared to {}",
                        current.month,
                        direction,
                        change.abs() * 100.0,
                        previous.month
                    ),
                    OBSERVATION_CONFIDENCE,
                )
                .with_data(json!({
                    "previous_month": previous.month,
                    "previous_total": previous.total,
                    "current_month": current.month,
                    "current_total": current.total,
                    "change_percentage": change * 100.0,
                })),
            );
        }
    }

    if let Some(largest) = expenses
        .iter()
        .max_by(|a, b| a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal))
    {
        insights.push(
            Insight::new(
                InsightKind::Insight,
                format!(
                    "Your largest single expense was {} ({:.2}) on {}",
                    largest.name, largest.amount, largest.date
                ),
                OBSERVATION_CONFIDENCE,
            )
            .with_data(json!({
                "name": largest.name,
                "amount": largest.amount,
                "category": largest.category,
                "date": largest.date,
            })),
        );
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 15).unwrap()
    }

    #[test]
    fn test_empty_gives_nothing() {
        assert!(observations(&[], reference()).is_empty());
    }

    #[test]
    fn test_dominant_category_is_warning() {
        let expenses = vec![
            Transaction::new("Rent", 900.0, "2025-02-01", "Housing"),
            Transaction::new("Lunch", 100.0, "2025-02-02", "Food"),
        ];
        let insights = observations(&expenses, reference());
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[0].data["category"], "Housing");
        assert!(insights
            .iter()
            .all(|i| (i.confidence - OBSERVATION_CONFIDENCE).abs() < 1e-9));
    }

    #[test]
    fn test_month_over_month_increase() {
        let expenses = vec![
            Transaction::new("Lunch", 100.0, "2025-01-10", "Food"),
            Transaction::new("Dinner", 150.0, "2025-02-10", "Food"),
        ];
        let insights = observations(&expenses, reference());
        let mom = insights
            .iter()
            .find(|i| i.data.get("change_percentage").is_some())
            .unwrap();
        assert_eq!(mom.kind, InsightKind::Warning);
        assert!(mom.message.contains("up 50%"));
    }

    #[test]
    fn test_no_month_over_month_without_previous_month() {
        let expenses = vec![Transaction::new("Lunch", 100.0, "2025-02-10", "Food")];
        let insights = observations(&expenses, reference());
        assert!(insights
            .iter()
            .all(|i| i.data.get("change_percentage").is_none()));
        assert!(insights.iter().any(|i| i.message.contains("Lunch")));
    }
}
