//! Financial health score
//!
//! Four banded factors add up to a 0-100 score:
//!
//! | Factor | Max | Bands |
//! |---|---|---|
//! | Savings rate | 40 | >=30% 40, >=20% 30, >=10% 20, >=0 10, else 0 |
//! | Category diversity | 20 | >=8 20, >=5 15, >=3 10, else 5 |
//! | Average daily spend | 20 | <=500 20, <=1000 15, <=2000 10, else 5 |
//! | Category concentration | 20 | <=30% 20, <=50% 15, <=70% 10, else 5 |

use crate::aggregate::{category_breakdown, daily_totals, total_amount};
use crate::models::Transaction;

use super::types::{Grade, HealthMetrics, HealthScore};

const SAVINGS_MAX: u32 = 40;
const DIVERSITY_MAX: u32 = 20;
const DAILY_SPEND_MAX: u32 = 20;
const CONCENTRATION_MAX: u32 = 20;

/// Score returned when there are no expenses to score
pub fn default_health_score() -> HealthScore {
    HealthScore {
        score: 75,
        grade: Grade::B,
        message: "No data: add expenses to calculate your financial health score".to_string(),
        factors: vec![],
        recommendations: vec![],
        metrics: HealthMetrics::default(),
    }
}

pub fn savings_points(savings_rate: f64) -> u32 {
    if savings_rate >= 0.30 {
        40
    } else if savings_rate >= 0.20 {
        30
    } else if savings_rate >= 0.10 {
        20
    } else if savings_rate >= 0.0 {
        10
    } else {
        0
    }
}

pub fn diversity_points(categories: usize) -> u32 {
    if categories >= 8 {
        20
    } else if categories >= 5 {
        15
    } else if categories >= 3 {
        10
    } else {
        5
    }
}

pub fn daily_spend_points(avg_daily: f64) -> u32 {
    if avg_daily <= 500.0 {
        20
    } else if avg_daily <= 1000.0 {
        15
    } else if avg_daily <= 2000.0 {
        10
    } else {
        5
    }
}

pub fn concentration_points(max_share: f64) -> u32 {
    if max_share <= 0.30 {
        20
    } else if max_share <= 0.50 {
        15
    } else if max_share <= 0.70 {
        10
    } else {
        5
    }
}

/// Compute the health metrics for a non-empty expense list
pub fn health_metrics(expenses: &[Transaction], income: &[Transaction]) -> HealthMetrics {
    let total_expenses = total_amount(expenses);
    let total_income = total_amount(income);

    let savings_rate = if total_income > 0.0 {
        (total_income - total_expenses) / total_income
    } else {
        0.0
    };

    let breakdown = category_breakdown(expenses);

    // Records with unparsable dates still count toward the total; with no
    // usable dates at all the whole total is treated as one day.
    let days = daily_totals(expenses).len().max(1);
    let avg_daily_spending = total_expenses / days as f64;

    let max_category = breakdown.values().copied().fold(0.0_f64, f64::max);
    let max_category_percentage = if total_expenses > 0.0 {
        (max_category / total_expenses).clamp(0.0, 1.0)
    } else {
        0.0
    };

    HealthMetrics {
        savings_rate,
        expense_diversity: breakdown.len(),
        avg_daily_spending,
        max_category_percentage,
    }
}

/// Score expenses against income. Empty expenses give [`default_health_score`].
pub fn health_score(expenses: &[Transaction], income: &[Transaction]) -> HealthScore {
    if expenses.is_empty() {
        return default_health_score();
    }

    let metrics = health_metrics(expenses, income);
    let mut factors = Vec::new();
    let mut recommendations = Vec::new();

    let savings = savings_points(metrics.savings_rate);
    if savings < SAVINGS_MAX {
        factors.push("Low savings rate".to_string());
        recommendations
            .push("Aim to save at least 30% of your income each month".to_string());
    }

    let diversity = diversity_points(metrics.expense_diversity);
    if diversity < DIVERSITY_MAX {
        factors.push("Limited expense categorization".to_string());
        recommendations.push(
            "Track expenses across more categories to get a clearer picture of your spending"
                .to_string(),
        );
    }

    let daily = daily_spend_points(metrics.avg_daily_spending);
    if daily < DAILY_SPEND_MAX {
        factors.push("High daily spending".to_string());
        recommendations
            .push("Set a daily spending limit and review discretionary purchases".to_string());
    }

    let concentration = concentration_points(metrics.max_category_percentage);
    if concentration < CONCENTRATION_MAX {
        factors.push("Spending concentrated in one category".to_string());
        recommendations.push(
            "Look for ways to reduce your largest spending category".to_string(),
        );
    }

    let score = (savings + diversity + daily + concentration).min(100);
    let grade = Grade::from_score(score);

    tracing::debug!(
        score,
        grade = grade.as_str(),
        savings,
        diversity,
        daily,
        concentration,
        "Health score computed"
    );

    HealthScore {
        score,
        grade,
        message: grade_message(grade).to_string(),
        factors,
        recommendations,
        metrics,
    }
}

fn grade_message(grade: Grade) -> &'static str {
    match grade {
        Grade::APlus => "Excellent financial health! Keep up the great habits.",
        Grade::A => "Great financial health with a little room to improve.",
        Grade::BPlus => "Good financial health. A few adjustments could make it great.",
        Grade::B => "Fair financial health. Focus on the flagged areas.",
        Grade::C => "Your finances need attention in several areas.",
        Grade::D => "Your finances need significant attention. Start with the recommendations below.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(amount: f64, date: &str, category: &str) -> Transaction {
        Transaction::new("item", amount, date, category)
    }

    #[test]
    fn test_empty_expenses_return_default() {
        let score = health_score(&[], &[tx(5000.0, "2025-01-01", "Salary")]);
        assert_eq!(score.score, 75);
        assert_eq!(score.grade, Grade::B);
        assert!(score.message.to_lowercase().contains("no data"));
    }

    #[test]
    fn test_non_empty_expenses_never_return_default_message() {
        let score = health_score(&[tx(10.0, "2025-01-01", "Food")], &[]);
        assert!(!score.message.to_lowercase().contains("no data"));
    }

    #[test]
    fn test_savings_rate_thirty_percent_scores_full() {
        let expenses = vec![
            tx(100.0, "2025-01-01", "Food"),
            tx(200.0, "2025-01-02", "Food"),
            tx(50.0, "2025-01-03", "Transportation"),
        ];
        let income = vec![Transaction::new("Salary", 500.0, "2025-01-01", "Salary")];
        let metrics = health_metrics(&expenses, &income);
        assert!((metrics.savings_rate - 0.30).abs() < 1e-9);
        assert_eq!(savings_points(metrics.savings_rate), 40);

        let score = health_score(&expenses, &income);
        assert!(!score.factors.contains(&"Low savings rate".to_string()));
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(savings_points(0.2999), 30);
        assert_eq!(savings_points(0.0), 10);
        assert_eq!(savings_points(-0.01), 0);
        assert_eq!(diversity_points(8), 20);
        assert_eq!(diversity_points(2), 5);
        assert_eq!(daily_spend_points(500.0), 20);
        assert_eq!(daily_spend_points(2000.01), 5);
        assert_eq!(concentration_points(0.30), 20);
        assert_eq!(concentration_points(0.71), 5);
    }

    #[test]
    fn test_factors_and_recommendations_are_parallel() {
        let expenses = vec![tx(5000.0, "2025-01-01", "Housing")];
        let score = health_score(&expenses, &[]);
        // no income: 10, one category: 5, 5000/day: 5, 100% concentration: 5
        assert_eq!(score.score, 25);
        assert_eq!(score.grade, Grade::D);
        assert_eq!(score.factors.len(), 4);
        assert_eq!(score.factors.len(), score.recommendations.len());
    }

    #[test]
    fn test_perfect_score() {
        let categories = [
            "Food",
            "Transportation",
            "Bills",
            "Entertainment",
            "Housing",
            "Groceries",
            "Health",
            "Education",
        ];
        let expenses: Vec<_> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| tx(100.0, &format!("2025-01-{:02}", i + 1), c))
            .collect();
        let income = vec![tx(10_000.0, "2025-01-01", "Salary")];
        let score = health_score(&expenses, &income);
        assert_eq!(score.score, 100);
        assert_eq!(score.grade, Grade::APlus);
        assert!(score.factors.is_empty());
        assert!(score.recommendations.is_empty());
    }

    #[test]
    fn test_score_bounds_over_varied_inputs() {
        let amounts = [1.0, 450.0, 999.0, 5000.0];
        for (i, amount) in amounts.iter().enumerate() {
            let expenses: Vec<_> = (0..=i)
                .map(|d| tx(*amount, &format!("2025-02-{:02}", d + 1), &format!("C{}", d)))
                .collect();
            let income = vec![tx(amount * 3.0, "2025-02-01", "Salary")];
            let score = health_score(&expenses, &income);
            assert!(score.score <= 100);
            assert_eq!(score.grade, Grade::from_score(score.score));
        }
    }

    #[test]
    fn test_unparsable_dates_fall_back_to_single_day() {
        let expenses = vec![tx(300.0, "??", "Food"), tx(300.0, "n/a", "Bills")];
        let metrics = health_metrics(&expenses, &[]);
        assert_eq!(metrics.avg_daily_spending, 600.0);
    }
}
