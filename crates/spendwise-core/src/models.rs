//! Domain models for Spendwise

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Categories offered to users and accepted from AI categorization
pub const CATEGORIES: [&str; 12] = [
    "Food",
    "Transportation",
    "Bills",
    "Entertainment",
    "Housing",
    "Groceries",
    "Health",
    "Education",
    "Personal Care",
    "Savings",
    "Travel",
    "Other",
];

/// Category used when nothing else fits
pub const FALLBACK_CATEGORY: &str = "Other";

/// Look up a suggested category, ignoring case and surrounding whitespace
pub fn known_category(name: &str) -> Option<&'static str> {
    let name = name.trim();
    CATEGORIES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(name))
}

/// Date format used by every transaction record
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single income or expense record
///
/// Amounts are unsigned: whether a record is income or an expense is
/// decided by the list it lives in (see [`crate::Ledger`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub amount: f64,
    /// Calendar date as `YYYY-MM-DD`; kept as received so bad rows can be reported
    pub date: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(name: &str, amount: f64, date: &str, category: &str) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            amount,
            date: date.to_string(),
            category: category.to_string(),
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parse the record date. Accepts a trailing time component
    /// (`2025-01-15T10:00:00`) by looking at the date prefix only.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .or_else(|| {
                raw.get(..10)
                    .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
            })
    }

    /// Boundary validation: positive finite amount and a category
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "transaction '{}' has amount {}; amounts must be positive (record income and expenses in separate lists)",
                self.name, self.amount
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData(format!(
                "transaction '{}' has no category",
                self.name
            )));
        }
        Ok(())
    }
}

/// Budget period
///
/// Informational only: spending is always measured against the calendar
/// month of the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annual" => Ok(Self::Yearly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending limit for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub id: String,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
}

impl Budget {
    pub fn monthly(category: &str, amount: f64) -> Self {
        Self {
            id: String::new(),
            category: category.to_string(),
            amount,
            period: BudgetPeriod::Monthly,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidData(format!(
                "budget for '{}' must be a positive amount, got {}",
                self.category, self.amount
            )));
        }
        if self.category.trim().is_empty() {
            return Err(Error::InvalidData("budget has no category".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_category_is_case_insensitive() {
        assert_eq!(known_category("food"), Some("Food"));
        assert_eq!(known_category("  personal care "), Some("Personal Care"));
        assert_eq!(known_category("Crypto"), None);
    }

    #[test]
    fn test_parsed_date() {
        let tx = Transaction::new("Lunch", 12.5, "2025-03-14", "Food");
        assert_eq!(tx.parsed_date(), NaiveDate::from_ymd_opt(2025, 3, 14));

        let tx = Transaction::new("Lunch", 12.5, "2025-03-14T09:30:00Z", "Food");
        assert_eq!(tx.parsed_date(), NaiveDate::from_ymd_opt(2025, 3, 14));

        let tx = Transaction::new("Lunch", 12.5, "last tuesday", "Food");
        assert!(tx.parsed_date().is_none());

        let tx = Transaction::new("Lunch", 12.5, "2025-02-30", "Food");
        assert!(tx.parsed_date().is_none());
    }

    #[test]
    fn test_transaction_validate() {
        assert!(Transaction::new("Rent", 1200.0, "2025-01-01", "Housing")
            .validate()
            .is_ok());
        assert!(Transaction::new("Refund", -20.0, "2025-01-01", "Food")
            .validate()
            .is_err());
        assert!(Transaction::new("Nothing", 0.0, "2025-01-01", "Food")
            .validate()
            .is_err());
        assert!(Transaction::new("Broken", f64::NAN, "2025-01-01", "Food")
            .validate()
            .is_err());
        assert!(Transaction::new("Mystery", 5.0, "2025-01-01", "  ")
            .validate()
            .is_err());
    }

    #[test]
    fn test_transaction_deserialize_defaults() {
        let tx: Transaction = serde_json::from_str(
            r#"{"name": "Coffee", "amount": 4.5, "date": "2025-01-02", "category": "Food"}"#,
        )
        .unwrap();
        assert!(tx.id.is_empty());
        assert!(tx.description.is_none());
    }

    #[test]
    fn test_transaction_json_roundtrip() {
        let tx = Transaction::new("Groceries run", 0.1 + 0.2, "2025-01-02", "Groceries")
            .with_id("abc")
            .with_description("weekly shop");
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }

    #[test]
    fn test_budget_period_default_and_parse() {
        let budget: Budget =
            serde_json::from_str(r#"{"category": "Food", "amount": 300}"#).unwrap();
        assert_eq!(budget.period, BudgetPeriod::Monthly);
        assert_eq!("annual".parse::<BudgetPeriod>(), Ok(BudgetPeriod::Yearly));
        assert!("daily".parse::<BudgetPeriod>().is_err());
    }

    #[test]
    fn test_budget_validate() {
        assert!(Budget::monthly("Food", 300.0).validate().is_ok());
        assert!(Budget::monthly("Food", 0.0).validate().is_err());
        assert!(Budget::monthly("", 10.0).validate().is_err());
    }
}
