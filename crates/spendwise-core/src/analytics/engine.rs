//! Analytics Engine - applies configured rules to aggregated spending

use chrono::NaiveDate;

use crate::aggregate::{category_breakdown, monthly_trend, total_amount};
use crate::config::AnalyticsConfig;
use crate::ledger::Ledger;
use crate::models::{Budget, Transaction, DATE_FORMAT};

use super::types::{
    AnalyticsReport, BudgetAlert, BudgetStatus, ExpenseAnalytics, ExpensePrediction, HealthScore,
    Insight, SavingsAdvice,
};
use super::{advice, alerts, forecast, health, observations};

/// Rule-based analytics over in-memory transaction lists
///
/// Every operation is pure: the caller supplies the data and the reference
/// date, and nothing is retained between calls.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    /// Create an engine with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Totals, category breakdown and monthly trend
    ///
    /// An empty list gives an empty trend rather than a run of zero months.
    pub fn expense_analytics(
        &self,
        expenses: &[Transaction],
        reference: NaiveDate,
    ) -> ExpenseAnalytics {
        if expenses.is_empty() {
            return ExpenseAnalytics {
                total_expenses: 0.0,
                category_breakdown: Default::default(),
                monthly_trend: vec![],
            };
        }
        ExpenseAnalytics {
            total_expenses: total_amount(expenses),
            category_breakdown: category_breakdown(expenses),
            monthly_trend: monthly_trend(expenses, reference, self.config.months_back),
        }
    }

    pub fn budget_alerts(
        &self,
        expenses: &[Transaction],
        budgets: &[Budget],
        reference: NaiveDate,
    ) -> Vec<BudgetAlert> {
        alerts::budget_alerts(
            expenses,
            budgets,
            reference,
            self.config.warning_threshold,
            self.config.danger_threshold,
        )
    }

    pub fn budget_status(
        &self,
        expenses: &[Transaction],
        budgets: &[Budget],
        reference: NaiveDate,
    ) -> Vec<BudgetStatus> {
        alerts::budget_status(expenses, budgets, reference)
    }

    pub fn health_score(&self, expenses: &[Transaction], income: &[Transaction]) -> HealthScore {
        health::health_score(expenses, income)
    }

    pub fn predict(&self, expenses: &[Transaction], reference: NaiveDate) -> ExpensePrediction {
        forecast::predict(
            expenses,
            reference,
            self.config.prediction_window_days,
            self.config.growth_factor,
        )
    }

    /// Expenses inside the prediction window
    pub fn recent_expenses(
        &self,
        expenses: &[Transaction],
        reference: NaiveDate,
    ) -> Vec<Transaction> {
        forecast::recent_expenses(expenses, reference, self.config.prediction_window_days)
    }

    pub fn savings_advice(&self, expenses: &[Transaction]) -> Vec<SavingsAdvice> {
        advice::savings_advice(expenses, self.config.max_advice)
    }

    pub fn observations(&self, expenses: &[Transaction], reference: NaiveDate) -> Vec<Insight> {
        observations::observations(expenses, reference)
    }

    /// Run every rule-based operation over a ledger
    pub fn report(&self, ledger: &Ledger, reference: NaiveDate) -> AnalyticsReport {
        let report = AnalyticsReport {
            reference_date: reference.format(DATE_FORMAT).to_string(),
            analytics: self.expense_analytics(&ledger.expenses, reference),
            alerts: self.budget_alerts(&ledger.expenses, &ledger.budgets, reference),
            budget_status: self.budget_status(&ledger.expenses, &ledger.budgets, reference),
            health: self.health_score(&ledger.expenses, &ledger.income),
            prediction: self.predict(&ledger.expenses, reference),
            advice: self.savings_advice(&ledger.expenses),
            observations: self.observations(&ledger.expenses, reference),
        };

        tracing::info!(
            expenses = ledger.expenses.len(),
            income = ledger.income.len(),
            budgets = ledger.budgets.len(),
            alerts = report.alerts.len(),
            score = report.health.score,
            "Analytics report generated"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::{AlertType, PredictionMethod};

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    #[test]
    fn test_expense_analytics_empty() {
        let engine = AnalyticsEngine::new();
        let analytics = engine.expense_analytics(&[], reference());
        assert_eq!(analytics.total_expenses, 0.0);
        assert!(analytics.category_breakdown.is_empty());
        assert!(analytics.monthly_trend.is_empty());
    }

    #[test]
    fn test_expense_analytics_uses_configured_months() {
        let config = AnalyticsConfig {
            months_back: 3,
            ..Default::default()
        };
        let engine = AnalyticsEngine::with_config(config);
        let expenses = vec![Transaction::new("Lunch", 10.0, "2025-05-01", "Food")];
        let analytics = engine.expense_analytics(&expenses, reference());
        assert_eq!(analytics.monthly_trend.len(), 3);
        assert_eq!(analytics.monthly_trend[2].month, "2025-05");
    }

    #[test]
    fn test_custom_alert_threshold() {
        let config = AnalyticsConfig {
            warning_threshold: 50.0,
            ..Default::default()
        };
        let engine = AnalyticsEngine::with_config(config);
        let expenses = vec![Transaction::new("Lunch", 60.0, "2025-05-01", "Food")];
        let budgets = vec![Budget::monthly("Food", 100.0)];
        let alerts = engine.budget_alerts(&expenses, &budgets, reference());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::Warning);

        let default_alerts =
            AnalyticsEngine::new().budget_alerts(&expenses, &budgets, reference());
        assert!(default_alerts.is_empty());
    }

    #[test]
    fn test_report_on_empty_ledger() {
        let engine = AnalyticsEngine::new();
        let report = engine.report(&Ledger::default(), reference());
        assert_eq!(report.reference_date, "2025-05-20");
        assert_eq!(report.health.score, 75);
        assert_eq!(report.prediction.method, PredictionMethod::InsufficientData);
        assert_eq!(report.advice.len(), 1);
        assert!(report.observations.is_empty());
        assert!(report.alerts.is_empty());
    }
}
