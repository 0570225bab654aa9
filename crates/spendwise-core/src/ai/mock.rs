//! Mock backend for testing
//!
//! Returns predictable answers without a running model. A failing mock
//! returns an API error from every call, which exercises the rule-based
//! fallback paths.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::aggregate::{category_breakdown, total_amount};
use crate::analytics::{Insight, InsightKind};
use crate::models::{Transaction, FALLBACK_CATEGORY};
use crate::prompts::PromptLibrary;

use super::parsing::AI_INSIGHT_CONFIDENCE;
use super::types::{AiError, AiPrediction, AiResult};
use super::AIBackend;

/// Growth applied by the mock forecast
const MOCK_GROWTH: f64 = 1.1;

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Whether every request should fail
    pub failing: bool,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            failing: false,
            prompts: Arc::new(RwLock::new(PromptLibrary::embedded_only())),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a mock whose requests all fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            failing: true,
            ..Self::new()
        }
    }

    fn check(&self) -> AiResult<()> {
        if self.failing {
            Err(AiError::Api {
                status: 503,
                body: "mock backend failure".into(),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, prompt: &str) -> AiResult<String> {
        self.check()?;
        Ok(format!("mock reply to {} chars", prompt.len()))
    }

    async fn suggest_category(&self, name: &str, _amount: f64) -> AiResult<String> {
        self.check()?;
        let upper = name.to_uppercase();
        let category = match upper.as_str() {
            n if n.contains("COFFEE") || n.contains("LUNCH") || n.contains("DINNER") => "Food",
            n if n.contains("BUS") || n.contains("TAXI") || n.contains("UBER") => "Transportation",
            n if n.contains("BILL") || n.contains("ELECTRIC") => "Bills",
            n if n.contains("MOVIE") || n.contains("NETFLIX") => "Entertainment",
            n if n.contains("SHIRT") || n.contains("HAIRCUT") => "Personal Care",
            n if n.contains("RENT") => "Housing",
            _ => FALLBACK_CATEGORY,
        };
        Ok(category.to_string())
    }

    async fn predict_expenses(
        &self,
        recent: &[Transaction],
        _window_days: u32,
    ) -> AiResult<AiPrediction> {
        self.check()?;
        Ok(AiPrediction {
            predicted_total: total_amount(recent) * MOCK_GROWTH,
            category_breakdown: category_breakdown(recent)
                .into_iter()
                .map(|(category, amount)| (category, amount * MOCK_GROWTH))
                .collect(),
            insights: vec!["Spending is steady".to_string()],
            recommendations: vec!["Keep tracking your expenses".to_string()],
        })
    }

    async fn spending_insights(&self, expenses: &[Transaction]) -> AiResult<Vec<Insight>> {
        self.check()?;
        Ok(vec![Insight::new(
            InsightKind::Insight,
            format!("Mock insight over {} expenses", expenses.len()),
            AI_INSIGHT_CONFIDENCE,
        )])
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }

    fn prompts(&self) -> &RwLock<PromptLibrary> {
        &self.prompts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unhealthy_mock() {
        let mock = MockBackend::unhealthy();
        assert!(!mock.health_check().await);
        // Unhealthy still answers; only `failing` errors
        assert!(mock.suggest_category("Coffee", 3.0).await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockBackend::failing();
        assert!(matches!(
            mock.suggest_category("Coffee", 3.0).await,
            Err(AiError::Api { status: 503, .. })
        ));
        assert!(mock.predict_expenses(&[], 90).await.is_err());
        assert!(mock.spending_insights(&[]).await.is_err());
        assert!(mock.complete("x").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_prediction_scales_breakdown() {
        let recent = vec![
            Transaction::new("Lunch", 100.0, "2025-01-01", "Food"),
            Transaction::new("Bus", 50.0, "2025-01-02", "Transportation"),
        ];
        let prediction = MockBackend::new().predict_expenses(&recent, 90).await.unwrap();
        assert!((prediction.predicted_total - 165.0).abs() < 1e-9);
        assert!((prediction.category_breakdown["Food"] - 110.0).abs() < 1e-9);
    }
}
