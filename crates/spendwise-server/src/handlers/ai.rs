//! AI-backed handlers
//!
//! Every endpoint here answers even without an AI backend: the advisor
//! falls back to the rule-based engine and reports which path was used.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use spendwise_core::ledger::validate_transactions;
use spendwise_core::{AdviceSource, Insight};

use super::{AsOfQuery, ExpenseListRequest};
use crate::{ApiJson, AppError, AppState};

/// POST /api/expenses/predict - Next-month prediction
pub async fn predict_expenses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AsOfQuery>,
    ApiJson(req): ApiJson<ExpenseListRequest>,
) -> Result<Json<Insight>, AppError> {
    validate_transactions(&req.expenses)?;
    let today = query.as_of.unwrap_or_else(|| state.today());
    let advice = state.advisor.predict(&req.expenses, today).await;
    Ok(Json(advice.value))
}

#[derive(Debug, Deserialize)]
pub struct CategorizeQuery {
    pub expense_name: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct CategorizeResponse {
    pub suggested_category: String,
    pub source: AdviceSource,
}

/// GET /api/expenses/categorize - Suggest a category for an expense name
pub async fn categorize_expense(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategorizeQuery>,
) -> Result<Json<CategorizeResponse>, AppError> {
    if query.expense_name.trim().is_empty() {
        return Err(AppError::bad_request("expense_name is required"));
    }
    let advice = state
        .advisor
        .suggest_category(&query.expense_name, query.amount)
        .await;
    Ok(Json(CategorizeResponse {
        suggested_category: advice.value,
        source: advice.source,
    }))
}

/// POST /api/expenses/insights - Observations about the spending pattern
pub async fn spending_insights(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AsOfQuery>,
    ApiJson(req): ApiJson<ExpenseListRequest>,
) -> Result<Json<Vec<Insight>>, AppError> {
    validate_transactions(&req.expenses)?;
    let today = query.as_of.unwrap_or_else(|| state.today());
    let advice = state.advisor.insights(&req.expenses, today).await;
    Ok(Json(advice.value))
}
