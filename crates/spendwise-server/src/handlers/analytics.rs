//! Stateless analytics handlers
//!
//! These endpoints compute over the records in the request body and never
//! touch the stored ledger. Records are validated before any computation.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use spendwise_core::ledger::validate_transactions;
use spendwise_core::{
    Budget, BudgetAlert, BudgetStatus, ExpenseAnalytics, HealthScore, SavingsAdvice, Transaction,
};

use super::AsOfQuery;
use crate::{ApiJson, AppError, AppState};

/// Request body carrying a list of expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseListRequest {
    pub expenses: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
pub struct BudgetRequest {
    pub expenses: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

#[derive(Debug, Deserialize)]
pub struct HealthRequest {
    pub expenses: Vec<Transaction>,
    #[serde(default)]
    pub income: Vec<Transaction>,
}

fn validate_budgets(budgets: &[Budget]) -> Result<(), AppError> {
    for budget in budgets {
        budget.validate()?;
    }
    Ok(())
}

/// POST /api/expenses/analytics - Totals, breakdown and monthly trend
pub async fn expense_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AsOfQuery>,
    ApiJson(req): ApiJson<ExpenseListRequest>,
) -> Result<Json<ExpenseAnalytics>, AppError> {
    validate_transactions(&req.expenses)?;
    let today = query.as_of.unwrap_or_else(|| state.today());
    Ok(Json(state.engine().expense_analytics(&req.expenses, today)))
}

/// POST /api/budget/alerts - Warning and danger alerts for this month
pub async fn budget_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AsOfQuery>,
    ApiJson(req): ApiJson<BudgetRequest>,
) -> Result<Json<Vec<BudgetAlert>>, AppError> {
    validate_transactions(&req.expenses)?;
    validate_budgets(&req.budgets)?;
    let today = query.as_of.unwrap_or_else(|| state.today());
    Ok(Json(
        state
            .engine()
            .budget_alerts(&req.expenses, &req.budgets, today),
    ))
}

/// POST /api/budget/status - Spend against every budget for this month
pub async fn budget_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AsOfQuery>,
    ApiJson(req): ApiJson<BudgetRequest>,
) -> Result<Json<Vec<BudgetStatus>>, AppError> {
    validate_transactions(&req.expenses)?;
    validate_budgets(&req.budgets)?;
    let today = query.as_of.unwrap_or_else(|| state.today());
    Ok(Json(
        state
            .engine()
            .budget_status(&req.expenses, &req.budgets, today),
    ))
}

/// POST /api/health-score - Financial health score
pub async fn health_score(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<HealthRequest>,
) -> Result<Json<HealthScore>, AppError> {
    validate_transactions(&req.expenses)?;
    validate_transactions(&req.income)?;
    Ok(Json(state.engine().health_score(&req.expenses, &req.income)))
}

/// POST /api/savings/advice - Savings tips for the largest categories
pub async fn savings_advice(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ExpenseListRequest>,
) -> Result<Json<Vec<SavingsAdvice>>, AppError> {
    validate_transactions(&req.expenses)?;
    Ok(Json(state.engine().savings_advice(&req.expenses)))
}
