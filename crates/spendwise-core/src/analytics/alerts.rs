//! Budget alerts and budget status
//!
//! Spending is measured against the calendar month of the reference date,
//! whatever period the budget declares.

use chrono::{Datelike, NaiveDate};

use crate::aggregate::dated;
use crate::models::{Budget, Transaction};

use super::types::{AlertType, BudgetAlert, BudgetState, BudgetStatus};

/// Sum of `category` expenses in the calendar month containing `reference`
pub fn month_spending(expenses: &[Transaction], category: &str, reference: NaiveDate) -> f64 {
    dated(expenses)
        .filter(|(tx, date)| {
            tx.category == category
                && date.year() == reference.year()
                && date.month() == reference.month()
        })
        .map(|(tx, _)| tx.amount)
        .sum()
}

/// Share of a budget already spent, as a percentage. 0 for non-positive budgets.
pub fn percentage_used(spent: f64, budget_amount: f64) -> f64 {
    if budget_amount > 0.0 {
        (spent / budget_amount * 100.0).max(0.0)
    } else {
        0.0
    }
}

/// Alerts for every budget at or above `warning_threshold` percent this month
pub fn budget_alerts(
    expenses: &[Transaction],
    budgets: &[Budget],
    reference: NaiveDate,
    warning_threshold: f64,
    danger_threshold: f64,
) -> Vec<BudgetAlert> {
    budgets
        .iter()
        .filter_map(|budget| {
            let spent = month_spending(expenses, &budget.category, reference);
            let percentage = percentage_used(spent, budget.amount);
            if percentage < warning_threshold {
                return None;
            }
            let alert_type = if percentage >= danger_threshold {
                AlertType::Danger
            } else {
                AlertType::Warning
            };
            tracing::debug!(
                category = %budget.category,
                percentage,
                alert = alert_type.as_str(),
                "Budget alert raised"
            );
            Some(BudgetAlert {
                category: budget.category.clone(),
                budget_amount: budget.amount,
                spent_amount: spent,
                percentage_used: percentage,
                alert_type,
            })
        })
        .collect()
}

/// Progress of every budget this month
pub fn budget_status(
    expenses: &[Transaction],
    budgets: &[Budget],
    reference: NaiveDate,
) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|budget| {
            let spent = month_spending(expenses, &budget.category, reference);
            let percentage = percentage_used(spent, budget.amount);
            BudgetStatus {
                budget_id: budget.id.clone(),
                category: budget.category.clone(),
                period: budget.period,
                budget_amount: budget.amount,
                spent_amount: spent,
                remaining: budget.amount - spent,
                percentage_used: percentage,
                status: BudgetState::from_percentage(percentage),
            }
        })
        .collect()
}
