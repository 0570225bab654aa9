//! AI-first answers with a rule-based fallback
//!
//! The advisor is the only place that decides between the AI client and
//! the analytics engine. An AI failure never reaches the caller: it is
//! logged and the rule-based answer is returned instead.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aggregate::{dated, month_key};
use crate::ai::{AIBackend, AIClient, AiPrediction};
use crate::analytics::forecast::prediction_message;
use crate::analytics::{AnalyticsEngine, ExpensePrediction, Insight, PredictionMethod};
use crate::categorize::RuleCategorizer;
use crate::error::Result;
use crate::models::Transaction;

/// Confidence attached to AI predictions
pub const AI_PREDICTION_CONFIDENCE: f64 = 0.9;

/// Which path produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    Ai,
    Rules,
}

impl AdviceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceSource::Ai => "ai",
            AdviceSource::Rules => "rules",
        }
    }
}

impl std::fmt::Display for AdviceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An answer tagged with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice<T> {
    pub value: T,
    pub source: AdviceSource,
}

impl<T> Advice<T> {
    fn ai(value: T) -> Self {
        Self {
            value,
            source: AdviceSource::Ai,
        }
    }

    fn rules(value: T) -> Self {
        Self {
            value,
            source: AdviceSource::Rules,
        }
    }
}

/// Analytics engine plus an optional AI client
#[derive(Clone)]
pub struct Advisor {
    engine: AnalyticsEngine,
    categorizer: Arc<RuleCategorizer>,
    ai: Option<AIClient>,
}

impl Advisor {
    pub fn new(engine: AnalyticsEngine, ai: Option<AIClient>) -> Result<Self> {
        Ok(Self {
            engine,
            categorizer: Arc::new(RuleCategorizer::new()?),
            ai,
        })
    }

    /// Advisor that never calls an AI backend
    pub fn rules_only(engine: AnalyticsEngine) -> Result<Self> {
        Self::new(engine, None)
    }

    pub fn engine(&self) -> &AnalyticsEngine {
        &self.engine
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    /// Whether a configured backend currently answers its health check
    pub async fn ai_available(&self) -> bool {
        match &self.ai {
            Some(ai) => ai.health_check().await,
            None => false,
        }
    }

    /// Next-month prediction as a `prediction` insight
    ///
    /// The AI is only asked when the prediction window holds expenses.
    pub async fn predict(&self, expenses: &[Transaction], today: NaiveDate) -> Advice<Insight> {
        let recent = self.engine.recent_expenses(expenses, today);

        if let (Some(ai), false) = (&self.ai, recent.is_empty()) {
            let window_days = self.engine.config().prediction_window_days;
            match ai.predict_expenses(&recent, window_days).await {
                Ok(prediction) => {
                    debug!(
                        total = prediction.predicted_total,
                        transactions = recent.len(),
                        "AI prediction"
                    );
                    return Advice::ai(ai_prediction(prediction, &recent).into_insight());
                }
                Err(e) => warn!(error = %e, "AI prediction failed, using rule-based forecast"),
            }
        }

        Advice::rules(self.engine.predict(expenses, today).into_insight())
    }

    /// Category for a new expense name
    pub async fn suggest_category(&self, name: &str, amount: f64) -> Advice<String> {
        if let Some(ai) = &self.ai {
            match ai.suggest_category(name, amount).await {
                Ok(category) => return Advice::ai(category),
                Err(e) => warn!(error = %e, name, "AI categorization failed, using keyword rules"),
            }
        }
        Advice::rules(self.categorizer.categorize(name).to_string())
    }

    /// Observations about the spending pattern
    pub async fn insights(&self, expenses: &[Transaction], today: NaiveDate) -> Advice<Vec<Insight>> {
        if expenses.is_empty() {
            return Advice::rules(vec![]);
        }

        if let Some(ai) = &self.ai {
            match ai.spending_insights(expenses).await {
                Ok(insights) if !insights.is_empty() => return Advice::ai(insights),
                Ok(_) => warn!("AI returned no insights, using rule-based observations"),
                Err(e) => warn!(error = %e, "AI insights failed, using rule-based observations"),
            }
        }

        Advice::rules(self.engine.observations(expenses, today))
    }
}

fn ai_prediction(prediction: AiPrediction, recent: &[Transaction]) -> ExpensePrediction {
    let months: BTreeSet<String> = dated(recent).map(|(_, date)| month_key(date)).collect();
    ExpensePrediction {
        message: prediction_message(prediction.predicted_total),
        predicted_total: prediction.predicted_total,
        category_breakdown: prediction.category_breakdown,
        method: PredictionMethod::Ai,
        months_analyzed: months.len(),
        transactions_analyzed: recent.len(),
        confidence: AI_PREDICTION_CONFIDENCE,
        insights: prediction.insights,
        recommendations: prediction.recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::analytics::InsightKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn expenses() -> Vec<Transaction> {
        vec![
            Transaction::new("Lunch", 300.0, "2025-02-10", "Food"),
            Transaction::new("Bus", 100.0, "2025-03-05", "Transportation"),
            Transaction::new("Dinner", 200.0, "2025-03-12", "Food"),
        ]
    }

    fn advisor(ai: Option<AIClient>) -> Advisor {
        Advisor::new(AnalyticsEngine::new(), ai).unwrap()
    }

    #[tokio::test]
    async fn test_predict_uses_ai_when_available() {
        let advice = advisor(Some(AIClient::mock()))
            .predict(&expenses(), today())
            .await;
        assert_eq!(advice.source, AdviceSource::Ai);
        assert_eq!(advice.value.kind, InsightKind::Prediction);
        assert_eq!(advice.value.confidence, AI_PREDICTION_CONFIDENCE);
        assert_eq!(advice.value.data["method"], "ai");
        assert_eq!(advice.value.data["months_analyzed"], 2);
        assert!(advice.value.message.starts_with("Based on your spending patterns"));
    }

    #[tokio::test]
    async fn test_predict_falls_back_on_ai_error() {
        let failing = advisor(Some(AIClient::Mock(MockBackend::failing())));
        let rules = advisor(None);

        let from_failing = failing.predict(&expenses(), today()).await;
        let from_rules = rules.predict(&expenses(), today()).await;
        assert_eq!(from_failing.source, AdviceSource::Rules);
        assert_eq!(from_failing, from_rules);
        assert_eq!(from_rules.value.data["method"], "linear_trend");
    }

    #[tokio::test]
    async fn test_predict_skips_ai_without_recent_data() {
        let old = vec![Transaction::new("Lunch", 300.0, "2024-01-10", "Food")];
        let advice = advisor(Some(AIClient::mock())).predict(&old, today()).await;
        assert_eq!(advice.source, AdviceSource::Rules);
        assert!(advice.value.message.starts_with("Insufficient data"));
        assert_eq!(advice.value.confidence, 0.1);
    }

    #[tokio::test]
    async fn test_suggest_category_paths() {
        let ai = advisor(Some(AIClient::mock()))
            .suggest_category("Movie Tickets", 15.0)
            .await;
        assert_eq!(ai, Advice::ai("Entertainment".to_string()));

        let fallback = advisor(Some(AIClient::Mock(MockBackend::failing())))
            .suggest_category("Electricity Bill", 80.0)
            .await;
        assert_eq!(fallback, Advice::rules("Bills".to_string()));

        let unknown = advisor(None).suggest_category("Xyzzy", 1.0).await;
        assert_eq!(unknown.value, "Other");
    }

    #[tokio::test]
    async fn test_insights_paths() {
        let empty = advisor(Some(AIClient::mock())).insights(&[], today()).await;
        assert!(empty.value.is_empty());
        assert_eq!(empty.source, AdviceSource::Rules);

        let ai = advisor(Some(AIClient::mock()))
            .insights(&expenses(), today())
            .await;
        assert_eq!(ai.source, AdviceSource::Ai);
        assert_eq!(ai.value.len(), 1);

        let rules = advisor(Some(AIClient::Mock(MockBackend::failing())))
            .insights(&expenses(), today())
            .await;
        assert_eq!(rules.source, AdviceSource::Rules);
        assert!(!rules.value.is_empty());
    }

    #[tokio::test]
    async fn test_ai_available() {
        assert!(advisor(Some(AIClient::mock())).ai_available().await);
        assert!(!advisor(Some(AIClient::Mock(MockBackend::unhealthy())))
            .ai_available()
            .await);
        assert!(!advisor(None).ai_available().await);
    }

    #[test]
    fn test_advice_serialization() {
        let json = serde_json::to_value(Advice::ai("Food".to_string())).unwrap();
        assert_eq!(json["value"], "Food");
        assert_eq!(json["source"], "ai");
    }
}
