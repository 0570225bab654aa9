//! Result types produced by the analytics engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::aggregate::{CategoryBreakdown, MonthlyTrend};

/// Totals, category split and monthly trend for an expense list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAnalytics {
    pub total_expenses: f64,
    pub category_breakdown: CategoryBreakdown,
    pub monthly_trend: Vec<MonthlyTrend>,
}

/// Severity of a budget alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Warning,
    Danger,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Warning => "warning",
            AlertType::Danger => "danger",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A budget whose current-month usage crossed the warning threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: String,
    pub budget_amount: f64,
    pub spent_amount: f64,
    /// Percentage of the budget spent this month, never negative
    pub percentage_used: f64,
    pub alert_type: AlertType,
}

/// Progress level of a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetState {
    OnTrack,
    /// At least 60% used
    Caution,
    /// At least 80% used
    Warning,
    /// 100% or more used
    Exceeded,
}

impl BudgetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetState::OnTrack => "on_track",
            BudgetState::Caution => "caution",
            BudgetState::Warning => "warning",
            BudgetState::Exceeded => "exceeded",
        }
    }

    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            BudgetState::Exceeded
        } else if percentage >= 80.0 {
            BudgetState::Warning
        } else if percentage >= 60.0 {
            BudgetState::Caution
        } else {
            BudgetState::OnTrack
        }
    }
}

impl fmt::Display for BudgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current-month progress of one budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget_id: String,
    pub category: String,
    pub period: crate::models::BudgetPeriod,
    pub budget_amount: f64,
    pub spent_amount: f64,
    /// Budget minus spent; negative once the budget is exceeded
    pub remaining: f64,
    pub percentage_used: f64,
    pub status: BudgetState,
}

/// Letter grade for the health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    D,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            Grade::APlus
        } else if score >= 80 {
            Grade::A
        } else if score >= 70 {
            Grade::BPlus
        } else if score >= 60 {
            Grade::B
        } else if score >= 50 {
            Grade::C
        } else {
            Grade::D
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(Grade::APlus),
            "A" => Ok(Grade::A),
            "B+" => Ok(Grade::BPlus),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            _ => Err(format!("Unknown grade: {}", s)),
        }
    }
}

/// Raw inputs behind a health score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    /// `(income - expenses) / income`, 0 without income
    pub savings_rate: f64,
    /// Number of distinct expense categories
    pub expense_diversity: usize,
    pub avg_daily_spending: f64,
    /// Largest category share of total spending, in `[0, 1]`
    pub max_category_percentage: f64,
}

/// Financial health score, 0 to 100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u32,
    pub grade: Grade,
    pub message: String,
    /// Factors that scored below their maximum
    pub factors: Vec<String>,
    /// One recommendation per entry in `factors`
    pub recommendations: Vec<String>,
    pub metrics: HealthMetrics,
}

/// Priority of a savings advice item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A templated suggestion with an estimated monthly saving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAdvice {
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub potential_savings: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Kind of an [`Insight`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Prediction,
    Insight,
    Warning,
    Recommendation,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Prediction => "prediction",
            InsightKind::Insight => "insight",
            InsightKind::Warning => "warning",
            InsightKind::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prediction" => Ok(InsightKind::Prediction),
            "insight" => Ok(InsightKind::Insight),
            "warning" => Ok(InsightKind::Warning),
            "recommendation" => Ok(InsightKind::Recommendation),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// A message with a confidence and free-form supporting data
///
/// Produced either by an LLM or by the rule-based engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    /// In `[0, 1]`
    pub confidence: f64,
    #[serde(default = "empty_object")]
    pub data: Value,
}

fn empty_object() -> Value {
    json!({})
}

impl Insight {
    pub fn new(kind: InsightKind, message: impl Into<String>, confidence: f64) -> Self {
        Self {
            kind,
            message: message.into(),
            confidence: confidence.clamp(0.0, 1.0),
            data: empty_object(),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// How a prediction was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    /// No expenses inside the window
    InsufficientData,
    /// Mean monthly total times the growth factor
    Average,
    /// Per-category least-squares trend
    LinearTrend,
    /// Returned by an LLM
    Ai,
}

impl PredictionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMethod::InsufficientData => "insufficient_data",
            PredictionMethod::Average => "average",
            PredictionMethod::LinearTrend => "linear_trend",
            PredictionMethod::Ai => "ai",
        }
    }
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next-month expense prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpensePrediction {
    pub predicted_total: f64,
    pub category_breakdown: CategoryBreakdown,
    pub method: PredictionMethod,
    pub months_analyzed: usize,
    pub transactions_analyzed: usize,
    pub confidence: f64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insights: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl ExpensePrediction {
    /// Express the prediction as a `prediction` insight
    pub fn into_insight(self) -> Insight {
        let mut data = json!({
            "predicted_total": self.predicted_total,
            "category_breakdown": self.category_breakdown,
            "method": self.method,
            "months_analyzed": self.months_analyzed,
            "transactions_analyzed": self.transactions_analyzed,
        });
        if !self.insights.is_empty() {
            data["insights"] = json!(self.insights);
        }
        if !self.recommendations.is_empty() {
            data["recommendations"] = json!(self.recommendations);
        }
        Insight::new(InsightKind::Prediction, self.message, self.confidence).with_data(data)
    }
}

impl From<ExpensePrediction> for Insight {
    fn from(prediction: ExpensePrediction) -> Self {
        prediction.into_insight()
    }
}

/// Every rule-based result for one ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Reference date the report was computed for (`YYYY-MM-DD`)
    pub reference_date: String,
    pub analytics: ExpenseAnalytics,
    pub alerts: Vec<BudgetAlert>,
    pub budget_status: Vec<BudgetStatus>,
    pub health: HealthScore,
    pub prediction: ExpensePrediction,
    pub advice: Vec<SavingsAdvice>,
    pub observations: Vec<Insight>,
}
