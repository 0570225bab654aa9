//! Aggregation of transaction lists
//!
//! Pure reductions used by every analytics operation: totals, category
//! breakdowns, calendar-month trends and per-day totals. Records whose date
//! cannot be parsed are left out of date-bucketed results and reported as a
//! data-quality warning; they still count toward totals and categories.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::MAX_MONTHS_BACK;
use crate::models::Transaction;

/// Category name to summed amount
pub type CategoryBreakdown = BTreeMap<String, f64>;

/// Spending for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub total: f64,
    pub count: usize,
}

/// Sum of all amounts. Empty input gives 0.
pub fn total_amount(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|t| t.amount).sum()
}

/// Sum amounts per category
pub fn category_breakdown(transactions: &[Transaction]) -> CategoryBreakdown {
    let mut breakdown = CategoryBreakdown::new();
    for tx in transactions {
        *breakdown.entry(tx.category.clone()).or_insert(0.0) += tx.amount;
    }
    breakdown
}

/// Fraction of the total spent in `category`, in `[0, 1]`
pub fn category_percentage(transactions: &[Transaction], category: &str) -> f64 {
    let total = total_amount(transactions);
    if total <= 0.0 {
        return 0.0;
    }
    let spent: f64 = transactions
        .iter()
        .filter(|t| t.category == category)
        .map(|t| t.amount)
        .sum();
    (spent / total).clamp(0.0, 1.0)
}

/// Format a date's month as `YYYY-MM`
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// The `count` calendar months ending with `reference`'s month, oldest first
pub fn months_ending_at(reference: NaiveDate, count: u32) -> Vec<(i32, u32)> {
    let mut months = Vec::with_capacity(count.min(MAX_MONTHS_BACK) as usize);
    let (mut year, mut month) = (reference.year(), reference.month());
    for _ in 0..count {
        months.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    months.reverse();
    months
}

/// Monthly totals for the `months_back` months ending at `reference_date`
///
/// Always returns exactly `months_back` entries in ascending order; months
/// without activity have a zero total.
pub fn monthly_trend(
    transactions: &[Transaction],
    reference_date: NaiveDate,
    months_back: u32,
) -> Vec<MonthlyTrend> {
    let mut buckets: HashMap<(i32, u32), (f64, usize)> = HashMap::new();
    for (tx, date) in dated(transactions) {
        let bucket = buckets.entry((date.year(), date.month())).or_insert((0.0, 0));
        bucket.0 += tx.amount;
        bucket.1 += 1;
    }

    months_ending_at(reference_date, months_back)
        .into_iter()
        .map(|(year, month)| {
            let (total, count) = buckets.get(&(year, month)).copied().unwrap_or((0.0, 0));
            MonthlyTrend {
                month: format!("{:04}-{:02}", year, month),
                total,
                count,
            }
        })
        .collect()
}

/// Sum amounts per calendar day
pub fn daily_totals(transactions: &[Transaction]) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for (tx, date) in dated(transactions) {
        *totals.entry(date).or_insert(0.0) += tx.amount;
    }
    totals
}

/// Pair each transaction with its parsed date, skipping unparsable ones
pub(crate) fn dated(
    transactions: &[Transaction],
) -> impl Iterator<Item = (&Transaction, NaiveDate)> + '_ {
    transactions.iter().filter_map(|tx| match tx.parsed_date() {
        Some(date) => Some((tx, date)),
        None => {
            warn!(
                id = %tx.id,
                name = %tx.name,
                date = %tx.date,
                "Skipping transaction with unparsable date"
            );
            None
        }
    })
}
