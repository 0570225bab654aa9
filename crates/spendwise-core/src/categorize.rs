//! Keyword rules for suggesting an expense category
//!
//! Used when AI categorization is unavailable. Rules are checked in order and
//! the first match wins, so narrower categories (Groceries, Travel) come
//! before the broader ones they overlap with (Food, Transportation).

use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::models::FALLBACK_CATEGORY;

const RULES: &[(&str, &str)] = &[
    (
        "Savings",
        r"\b(savings?|emergency fund|mutual funds?|investment|fixed deposit|recurring deposit)\b",
    ),
    (
        "Housing",
        r"\b(rent|mortgage|maintenance|society|property tax|home repair|plumber|electrician|furniture)\b",
    ),
    (
        "Bills",
        r"\b(electricity|electric|water bill|gas bill|internet|wi-?fi|broadband|phone bill|mobile|recharge|utility|utilities|insurance|bill)\b",
    ),
    (
        "Groceries",
        r"\b(grocery|groceries|supermarket|vegetables?|fruits?|milk|eggs|bigbasket|dmart|walmart|costco|whole foods)\b",
    ),
    (
        "Travel",
        r"\b(flights?|airline|airport|hotel|airbnb|vacation|trip|holiday|resort|visa|luggage)\b",
    ),
    (
        "Transportation",
        r"\b(uber|ola|lyft|taxi|cab|bus|metro|train|fuel|petrol|diesel|gas station|parking|toll|auto|fare|rapido)\b",
    ),
    (
        "Food",
        r"\b(coffee|cafe|restaurant|lunch|dinner|breakfast|brunch|pizza|burger|snacks?|tea|swiggy|zomato|starbucks|mcdonald'?s|food|meal|bakery|takeout)\b",
    ),
    (
        "Entertainment",
        r"\b(movies?|cinema|netflix|spotify|prime video|hotstar|concert|games?|gaming|theatre|theater|party|tickets?|streaming)\b",
    ),
    (
        "Health",
        r"\b(doctor|hospital|pharmacy|medicines?|medical|clinic|dental|dentist|gym|fitness|health|vitamins?)\b",
    ),
    (
        "Education",
        r"\b(tuition|course|books?|school|college|university|udemy|coursera|exam|class|classes|stationery)\b",
    ),
    (
        "Personal Care",
        r"\b(salon|haircut|spa|cosmetics|shampoo|grooming|clothes|clothing|t-shirt|shirt|shoes|skincare|makeup)\b",
    ),
];

/// Rule-based categorizer over expense names
pub struct RuleCategorizer {
    rules: Vec<(Regex, &'static str)>,
}

impl RuleCategorizer {
    pub fn new() -> Result<Self> {
        let rules = RULES
            .iter()
            .map(|(category, pattern)| Ok((Regex::new(&format!("(?i){}", pattern))?, *category)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Suggest one of the known categories for an expense name,
    /// `Other` when no rule matches
    pub fn categorize(&self, name: &str) -> &'static str {
        let category = self
            .rules
            .iter()
            .find(|(re, _)| re.is_match(name))
            .map(|(_, category)| *category)
            .unwrap_or(FALLBACK_CATEGORY);
        debug!(name, category, "Rule-based category");
        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::known_category;

    fn categorizer() -> RuleCategorizer {
        RuleCategorizer::new().unwrap()
    }

    #[test]
    fn test_reference_examples() {
        let c = categorizer();
        assert_eq!(c.categorize("Morning Coffee"), "Food");
        assert_eq!(c.categorize("Local Bus Fare"), "Transportation");
        assert_eq!(c.categorize("Electricity Bill"), "Bills");
        assert_eq!(c.categorize("Movie Tickets"), "Entertainment");
        assert_eq!(c.categorize("New T-shirt"), "Personal Care");
    }

    #[test]
    fn test_narrow_categories_win() {
        let c = categorizer();
        assert_eq!(c.categorize("Whole Foods weekly"), "Groceries");
        assert_eq!(c.categorize("Flight tickets to Goa"), "Travel");
        assert_eq!(c.categorize("Gas bill"), "Bills");
        assert_eq!(c.categorize("Monthly rent"), "Housing");
    }

    #[test]
    fn test_case_insensitive_and_word_bounded() {
        let c = categorizer();
        assert_eq!(c.categorize("UBER RIDE"), "Transportation");
        assert_eq!(c.categorize("pharmacy"), "Health");
        // "bus" inside another word should not match
        assert_eq!(c.categorize("Business lunch"), "Food");
    }

    #[test]
    fn test_unknown_is_other() {
        assert_eq!(categorizer().categorize("Xyzzy"), "Other");
        assert_eq!(categorizer().categorize(""), "Other");
    }

    #[test]
    fn test_every_rule_maps_to_known_category() {
        for (category, _) in RULES {
            assert_eq!(known_category(category), Some(*category));
        }
    }
}
