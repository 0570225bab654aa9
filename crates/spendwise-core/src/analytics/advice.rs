//! Templated savings advice

use std::cmp::Ordering;

use crate::aggregate::{category_breakdown, total_amount};
use crate::models::Transaction;

use super::types::{Priority, SavingsAdvice};

/// A category whose share above `threshold` triggers advice
struct CategoryRule {
    category: &'static str,
    threshold: f64,
    savings_rate: f64,
    priority: Priority,
    title: &'static str,
    tip: &'static str,
}

const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: "Food",
        threshold: 0.30,
        savings_rate: 0.25,
        priority: Priority::High,
        title: "Reduce food spending",
        tip: "Cook at home more often and plan meals ahead",
    },
    CategoryRule {
        category: "Transportation",
        threshold: 0.20,
        savings_rate: 0.15,
        priority: Priority::Medium,
        title: "Optimize transportation costs",
        tip: "Try public transit, carpooling or combining trips",
    },
    CategoryRule {
        category: "Entertainment",
        threshold: 0.15,
        savings_rate: 0.20,
        priority: Priority::Medium,
        title: "Cut back on entertainment",
        tip: "Look for free activities and review paid memberships",
    },
];

const LARGE_AVERAGE_TRANSACTION: f64 = 500.0;
const MANY_TRANSACTIONS: usize = 20;
const SAVINGS_CATEGORY: &str = "Savings";

/// Advice returned for an empty expense list
pub fn start_tracking_advice() -> SavingsAdvice {
    SavingsAdvice {
        title: "Start tracking your expenses".to_string(),
        message: "Add your expenses to receive personalized savings advice".to_string(),
        priority: Priority::Medium,
        potential_savings: 0.0,
        category: None,
    }
}

/// Apply every savings rule and keep the `max_items` with the largest savings
pub fn savings_advice(expenses: &[Transaction], max_items: usize) -> Vec<SavingsAdvice> {
    if expenses.is_empty() {
        return vec![start_tracking_advice()];
    }

    let total = total_amount(expenses);
    let breakdown = category_breakdown(expenses);
    let mut advice = Vec::new();

    if total > 0.0 {
        for rule in CATEGORY_RULES {
            let spent = breakdown.get(rule.category).copied().unwrap_or(0.0);
            let share = spent / total;
            if share > rule.threshold {
                advice.push(SavingsAdvice {
                    title: rule.title.to_string(),
                    message: format!(
                        "{} makes up {:.0}% of your spending. {}.",
                        rule.category,
                        share * 100.0,
                        rule.tip
                    ),
                    priority: rule.priority,
                    potential_savings: spent * rule.savings_rate,
                    category: Some(rule.category.to_string()),
                });
            }
        }
    }

    let count = expenses.len();
    let average = total / count as f64;
    if average > LARGE_AVERAGE_TRANSACTION && count > MANY_TRANSACTIONS {
        advice.push(SavingsAdvice {
            title: "Review small expenses".to_string(),
            message: format!(
                "Your average expense is {:.2} across {} transactions. Review recurring purchases for ones you can drop.",
                average, count
            ),
            priority: Priority::Medium,
            potential_savings: total * 0.10,
            category: None,
        });
    }

    if !breakdown.contains_key(SAVINGS_CATEGORY) {
        advice.push(SavingsAdvice {
            title: "Build an emergency fund".to_string(),
            message: "You have no savings recorded. Set aside 10% of your spending as an emergency fund.".to_string(),
            priority: Priority::High,
            potential_savings: total * 0.10,
            category: Some(SAVINGS_CATEGORY.to_string()),
        });
    }

    advice.sort_by(|a, b| {
        b.potential_savings
            .partial_cmp(&a.potential_savings)
            .unwrap_or(Ordering::Equal)
    });
    advice.truncate(max_items);
    advice
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(amount: f64, category: &str) -> Transaction {
        Transaction::new("item", amount, "2025-01-10", category)
    }

    #[test]
    fn test_empty_gives_start_tracking() {
        let advice = savings_advice(&[], 5);
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].title, "Start tracking your expenses");
    }

    #[test]
    fn test_food_rule_and_emergency_fund() {
        let expenses = vec![tx(400.0, "Food"), tx(600.0, "Housing")];
        let advice = savings_advice(&expenses, 5);
        assert_eq!(advice.len(), 2);
        // food: 400 * 0.25 = 100, emergency fund: 1000 * 0.10 = 100
        let food = advice
            .iter()
            .find(|a| a.category.as_deref() == Some("Food"))
            .unwrap();
        assert_eq!(food.priority, Priority::High);
        assert!((food.potential_savings - 100.0).abs() < 1e-9);
        assert!(advice.iter().any(|a| a.title == "Build an emergency fund"));
    }

    #[test]
    fn test_savings_category_suppresses_emergency_fund() {
        let expenses = vec![tx(100.0, "Savings"), tx(100.0, "Bills")];
        let advice = savings_advice(&expenses, 5);
        assert!(advice.iter().all(|a| a.title != "Build an emergency fund"));
    }

    #[test]
    fn test_thresholds_are_strict() {
        // exactly 30% food does not fire
        let expenses = vec![tx(30.0, "Food"), tx(70.0, "Savings")];
        let advice = savings_advice(&expenses, 5);
        assert!(advice.is_empty());
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        // 21 transactions of 1000: Food 10, Transportation 6, Entertainment 5
        let mut expenses = Vec::new();
        for (category, count) in [("Food", 10), ("Transportation", 6), ("Entertainment", 5)] {
            for _ in 0..count {
                expenses.push(tx(1000.0, category));
            }
        }
        let advice = savings_advice(&expenses, 5);
        assert_eq!(advice.len(), 5);
        assert_eq!(advice[0].category.as_deref(), Some("Food"));
        assert!((advice[0].potential_savings - 2500.0).abs() < 1e-9);
        for pair in advice.windows(2) {
            assert!(pair[0].potential_savings >= pair[1].potential_savings);
        }
        assert!(advice.iter().any(|a| a.title == "Review small expenses"));

        let top_two = savings_advice(&expenses, 2);
        assert_eq!(top_two.len(), 2);
        assert_eq!(top_two[0], advice[0]);
    }
}
