//! Analytics Engine - rule-based spending analysis
//!
//! Turns aggregated transactions into actionable results without any
//! external service. The same rules serve as the fallback whenever an AI
//! backend is missing or fails.
//!
//! ## Operations
//!
//! - **Budget alerts** - budgets at or above the warning threshold this month
//! - **Budget status** - progress of every budget this month
//! - **Health score** - banded 0-100 score with grade and recommendations
//! - **Prediction** - naive next-month forecast from the trailing window
//! - **Savings advice** - templated advice ranked by potential savings
//! - **Observations** - rule-based stand-ins for AI insights
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendwise_core::analytics::AnalyticsEngine;
//!
//! let engine = AnalyticsEngine::new();
//! let today = chrono::Local::now().date_naive();
//! let alerts = engine.budget_alerts(&ledger.expenses, &ledger.budgets, today);
//! ```

pub mod advice;
pub mod alerts;
pub mod engine;
pub mod forecast;
pub mod health;
pub mod observations;
pub mod types;

pub use engine::AnalyticsEngine;
pub use types::{
    AlertType, AnalyticsReport, BudgetAlert, BudgetState, BudgetStatus, ExpenseAnalytics,
    ExpensePrediction, Grade, HealthMetrics, HealthScore, Insight, InsightKind, PredictionMethod,
    Priority, SavingsAdvice,
};
