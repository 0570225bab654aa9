//! Naive next-month expense prediction
//!
//! Looks at expenses inside a trailing window and either:
//! - averages the monthly totals and applies a growth factor (one month of data)
//! - fits a least-squares line per category and extrapolates one month
//!   (two or more months of data)

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};

use crate::aggregate::{dated, CategoryBreakdown};
use crate::models::Transaction;

use super::types::{ExpensePrediction, PredictionMethod};

pub const INSUFFICIENT_DATA_CONFIDENCE: f64 = 0.1;
pub const AVERAGE_CONFIDENCE: f64 = 0.6;
pub const TREND_CONFIDENCE: f64 = 0.8;

/// Message shared by rule-based and AI-backed predictions
pub fn prediction_message(predicted_total: f64) -> String {
    format!(
        "Based on your spending patterns, predicted next month expenses: {:.2}",
        predicted_total
    )
}

/// Expenses dated inside `(reference - window_days) ..= reference`
pub fn recent_expenses(
    expenses: &[Transaction],
    reference: NaiveDate,
    window_days: u32,
) -> Vec<Transaction> {
    let start = reference
        .checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(NaiveDate::MIN);
    dated(expenses)
        .filter(|(_, date)| *date >= start && *date <= reference)
        .map(|(tx, _)| tx.clone())
        .collect()
}

/// Prediction returned when the window holds no expenses
pub fn insufficient_data() -> ExpensePrediction {
    ExpensePrediction {
        predicted_total: 0.0,
        category_breakdown: CategoryBreakdown::new(),
        method: PredictionMethod::InsufficientData,
        months_analyzed: 0,
        transactions_analyzed: 0,
        confidence: INSUFFICIENT_DATA_CONFIDENCE,
        message: "Insufficient data: not enough recent expenses for an accurate prediction"
            .to_string(),
        insights: vec![],
        recommendations: vec![],
    }
}

/// Predict next month's spending from the trailing `window_days` of expenses
pub fn predict(
    expenses: &[Transaction],
    reference: NaiveDate,
    window_days: u32,
    growth_factor: f64,
) -> ExpensePrediction {
    let recent = recent_expenses(expenses, reference, window_days);
    if recent.is_empty() {
        return insufficient_data();
    }

    // Month index per calendar month present in the window, oldest first
    let months: Vec<(i32, u32)> = dated(&recent)
        .map(|(_, d)| (d.year(), d.month()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let month_count = months.len();

    let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (tx, date) in dated(&recent) {
        let Some(index) = months.iter().position(|m| *m == (date.year(), date.month())) else {
            continue;
        };
        series
            .entry(tx.category.clone())
            .or_insert_with(|| vec![0.0; month_count])[index] += tx.amount;
    }

    let (method, confidence) = if month_count >= 2 {
        (PredictionMethod::LinearTrend, TREND_CONFIDENCE)
    } else {
        (PredictionMethod::Average, AVERAGE_CONFIDENCE)
    };

    let category_breakdown: CategoryBreakdown = series
        .into_iter()
        .map(|(category, values)| {
            let active_months = values.iter().filter(|v| **v > 0.0).count();
            let predicted = if method == PredictionMethod::LinearTrend && active_months >= 2 {
                linear_forecast(&values).max(0.0)
            } else {
                mean(&values) * growth_factor
            };
            (category, predicted)
        })
        .collect();

    let predicted_total: f64 = category_breakdown.values().sum();

    tracing::debug!(
        method = method.as_str(),
        months = month_count,
        transactions = recent.len(),
        predicted_total,
        "Expense prediction computed"
    );

    ExpensePrediction {
        predicted_total,
        category_breakdown,
        method,
        months_analyzed: month_count,
        transactions_analyzed: recent.len(),
        confidence,
        message: prediction_message(predicted_total),
        insights: vec![],
        recommendations: vec![],
    }
}

/// Least-squares fit of `values` against their index, evaluated at the next index
pub fn linear_forecast(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return mean(values);
    }
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let x_mean = mean(&xs);
    let y_mean = mean(values);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, y) in xs.iter().zip(values) {
        numerator += (x - x_mean) * (y - y_mean);
        denominator += (x - x_mean).powi(2);
    }
    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };
    let intercept = y_mean - slope * x_mean;
    intercept + slope * n as f64
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
