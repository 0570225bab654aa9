//! Stored ledger handlers (expenses, income, budgets)

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use spendwise_core::{AnalyticsReport, Budget, Transaction};

use super::AsOfQuery;
use crate::{ApiJson, AppError, AppState, SuccessResponse};

/// GET /api/expenses - List stored expenses
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.store.expenses()?))
}

/// POST /api/expenses - Store an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    ApiJson(tx): ApiJson<Transaction>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let stored = state.store.add_expense(tx)?;
    info!(id = %stored.id, category = %stored.category, amount = stored.amount, "Expense added");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /api/expenses/:id - Remove an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.store.remove_expense(&id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/income - List stored income
pub async fn list_income(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.store.income()?))
}

/// POST /api/income - Store an income record
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    ApiJson(tx): ApiJson<Transaction>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let stored = state.store.add_income(tx)?;
    info!(id = %stored.id, amount = stored.amount, "Income added");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /api/income/:id - Remove an income record
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.store.remove_income(&id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/budgets - List budgets
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Budget>>, AppError> {
    Ok(Json(state.store.budgets()?))
}

/// POST /api/budgets - Create a budget (one per category)
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    ApiJson(budget): ApiJson<Budget>,
) -> Result<(StatusCode, Json<Budget>), AppError> {
    let stored = state.store.add_budget(budget)?;
    info!(id = %stored.id, category = %stored.category, amount = stored.amount, "Budget added");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// DELETE /api/budgets/:id - Remove a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.store.remove_budget(&id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/ledger/report - Full rule-based report over the stored ledger
pub async fn ledger_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let ledger = state.store.snapshot()?;
    let today = query.as_of.unwrap_or_else(|| state.today());
    Ok(Json(state.engine().report(&ledger, today)))
}
