//! Spendwise Core Library
//!
//! Shared functionality for the Spendwise expense tracker:
//! - Transaction, budget and ledger models with CSV/JSON loading
//! - Aggregation helpers (totals, category breakdowns, monthly trends)
//! - Rule-based analytics engine (alerts, health score, prediction, advice)
//! - Keyword categorizer for expense names
//! - Pluggable AI backends (Gemini, OpenAI-compatible, Ollama)
//! - Advisor that prefers AI answers and falls back to the rules
//! - Prompt library for customizable AI prompts

pub mod advisor;
pub mod aggregate;
pub mod ai;
pub mod analytics;
pub mod categorize;
pub mod config;
pub mod error;
pub mod import;
pub mod ledger;
pub mod models;
pub mod prompts;

/// Test utilities including a mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{Advice, AdviceSource, Advisor};
pub use ai::{
    AIBackend, AIClient, AiError, AiPrediction, GeminiBackend, MockBackend, OllamaBackend,
    OpenAICompatibleBackend,
};
pub use analytics::{
    AlertType, AnalyticsEngine, AnalyticsReport, BudgetAlert, BudgetState, BudgetStatus,
    ExpenseAnalytics, ExpensePrediction, Grade, HealthScore, Insight, InsightKind,
    PredictionMethod, Priority, SavingsAdvice,
};
pub use categorize::RuleCategorizer;
pub use config::AnalyticsConfig;
pub use error::{Error, Result};
pub use ledger::{Ledger, LedgerStore};
pub use models::{Budget, BudgetPeriod, Transaction, CATEGORIES};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
