//! Pluggable AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the three AI
//! features: category suggestion, expense prediction and spending insights.
//! Callers never depend on a backend being present; every failure is an
//! [`AiError`] that the advisor turns into a rule-based answer.
//!
//! # Architecture
//!
//! - `AIBackend` trait: a backend only implements `complete`; the feature
//!   methods render a prompt, call `complete` and parse the answer
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`,
//!   `OllamaBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, openai_compatible, ollama, mock). Default: gemini
//! - `GOOGLE_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemma-3-27b-it)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)

mod gemini;
mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::aggregate::{category_breakdown, total_amount};
use crate::analytics::Insight;
use crate::models::{Transaction, CATEGORIES};
use crate::prompts::{PromptId, PromptLibrary};

use parsing::{parse_category, parse_insights, parse_prediction};

/// Expenses listed line by line in the prediction prompt
const MAX_PROMPT_EXPENSES: usize = 200;

/// Trait defining the interface for all AI backends
///
/// Backends must be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Send a rendered prompt and return the raw model text
    async fn complete(&self, prompt: &str) -> AiResult<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;

    /// Prompt templates used by the feature methods
    fn prompts(&self) -> &RwLock<PromptLibrary>;

    /// Suggest one of the known categories for an expense
    async fn suggest_category(&self, name: &str, amount: f64) -> AiResult<String> {
        let mut vars = HashMap::new();
        vars.insert("name", name.to_string());
        vars.insert("amount", format!("{:.2}", amount));
        vars.insert("categories", CATEGORIES.join(", "));
        let prompt = render_prompt(self.prompts(), PromptId::SuggestCategory, &vars)?;

        let response = self.complete(&prompt).await?;
        debug!(name, response = %response.trim(), "AI category response");
        Ok(parse_category(&response))
    }

    /// Forecast next month's spending from recent expenses
    async fn predict_expenses(
        &self,
        recent: &[Transaction],
        window_days: u32,
    ) -> AiResult<AiPrediction> {
        let mut vars = HashMap::new();
        vars.insert("window_days", window_days.to_string());
        vars.insert("expenses", expense_lines(recent));
        vars.insert("categories", CATEGORIES.join(", "));
        let prompt = render_prompt(self.prompts(), PromptId::PredictExpenses, &vars)?;

        let response = self.complete(&prompt).await?;
        debug!(chars = response.len(), "AI prediction response");
        parse_prediction(&response)
    }

    /// Free-form observations about the spending pattern
    async fn spending_insights(&self, expenses: &[Transaction]) -> AiResult<Vec<Insight>> {
        let mut vars = HashMap::new();
        vars.insert("summary", spending_summary(expenses));
        let prompt = render_prompt(self.prompts(), PromptId::SpendingInsights, &vars)?;

        let response = self.complete(&prompt).await?;
        debug!(chars = response.len(), "AI insights response");
        parse_insights(&response)
    }
}

/// Render a prompt under the shared library lock
pub(crate) fn render_prompt(
    prompts: &RwLock<PromptLibrary>,
    id: PromptId,
    vars: &HashMap<&str, String>,
) -> AiResult<String> {
    let mut prompts = prompts
        .write()
        .map_err(|_| AiError::NotConfigured("Failed to acquire prompt library lock".into()))?;
    let template = prompts
        .get(id)
        .map_err(|e| AiError::NotConfigured(format!("prompt {}: {}", id.as_str(), e)))?;
    Ok(template.render_request(vars))
}

/// HTTP client shared by the remote backends
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// One `- date | name | category | amount` line per expense
fn expense_lines(expenses: &[Transaction]) -> String {
    let mut lines: Vec<String> = expenses
        .iter()
        .take(MAX_PROMPT_EXPENSES)
        .map(|tx| {
            format!(
                "- {} | {} | {} | {:.2}",
                tx.date, tx.name, tx.category, tx.amount
            )
        })
        .collect();
    if expenses.len() > MAX_PROMPT_EXPENSES {
        lines.push(format!(
            "- ... and {} more",
            expenses.len() - MAX_PROMPT_EXPENSES
        ));
    }
    lines.join("\n")
}

/// Totals per category with shares, largest first
fn spending_summary(expenses: &[Transaction]) -> String {
    let total = total_amount(expenses);
    let mut categories: Vec<(String, f64)> = category_breakdown(expenses).into_iter().collect();
    categories.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut lines = vec![
        format!("Total spent: {:.2}", total),
        format!("Transactions: {}", expenses.len()),
    ];
    for (category, amount) in categories {
        let share = if total > 0.0 { amount / total * 100.0 } else { 0.0 };
        lines.push(format!("- {}: {:.2} ({:.1}%)", category, amount, share));
    }
    lines.join("\n")
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Google Generative Language API (Gemini / Gemma models)
    Gemini(GeminiBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use. Returns
    /// [`AiError::NotConfigured`] when the chosen backend is missing its
    /// required variables.
    pub fn from_env(timeout: Duration) -> AiResult<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());

        match backend.to_lowercase().as_str() {
            "gemini" | "google" => GeminiBackend::from_env(timeout).map(AIClient::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env(timeout).map(AIClient::OpenAICompatible)
            }
            "ollama" => OllamaBackend::from_env(timeout).map(AIClient::Ollama),
            "mock" => Ok(AIClient::Mock(MockBackend::new())),
            "none" | "off" => Err(AiError::NotConfigured("AI disabled by AI_BACKEND".into())),
            other => Err(AiError::NotConfigured(format!(
                "Unknown AI_BACKEND '{}'",
                other
            ))),
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Short backend name for status output
    pub fn kind(&self) -> &'static str {
        match self {
            AIClient::Gemini(_) => "gemini",
            AIClient::OpenAICompatible(_) => "openai_compatible",
            AIClient::Ollama(_) => "ollama",
            AIClient::Mock(_) => "mock",
        }
    }
}

// Delegate every method so backends that override a feature keep their version
#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, prompt: &str) -> AiResult<String> {
        match self {
            AIClient::Gemini(b) => b.complete(prompt).await,
            AIClient::OpenAICompatible(b) => b.complete(prompt).await,
            AIClient::Ollama(b) => b.complete(prompt).await,
            AIClient::Mock(b) => b.complete(prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Gemini(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Gemini(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }

    fn prompts(&self) -> &RwLock<PromptLibrary> {
        match self {
            AIClient::Gemini(b) => b.prompts(),
            AIClient::OpenAICompatible(b) => b.prompts(),
            AIClient::Ollama(b) => b.prompts(),
            AIClient::Mock(b) => b.prompts(),
        }
    }

    async fn suggest_category(&self, name: &str, amount: f64) -> AiResult<String> {
        match self {
            AIClient::Gemini(b) => b.suggest_category(name, amount).await,
            AIClient::OpenAICompatible(b) => b.suggest_category(name, amount).await,
            AIClient::Ollama(b) => b.suggest_category(name, amount).await,
            AIClient::Mock(b) => b.suggest_category(name, amount).await,
        }
    }

    async fn predict_expenses(
        &self,
        recent: &[Transaction],
        window_days: u32,
    ) -> AiResult<AiPrediction> {
        match self {
            AIClient::Gemini(b) => b.predict_expenses(recent, window_days).await,
            AIClient::OpenAICompatible(b) => b.predict_expenses(recent, window_days).await,
            AIClient::Ollama(b) => b.predict_expenses(recent, window_days).await,
            AIClient::Mock(b) => b.predict_expenses(recent, window_days).await,
        }
    }

    async fn spending_insights(&self, expenses: &[Transaction]) -> AiResult<Vec<Insight>> {
        match self {
            AIClient::Gemini(b) => b.spending_insights(expenses).await,
            AIClient::OpenAICompatible(b) => b.spending_insights(expenses).await,
            AIClient::Ollama(b) => b.spending_insights(expenses).await,
            AIClient::Mock(b) => b.spending_insights(expenses).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expenses() -> Vec<Transaction> {
        vec![
            Transaction::new("Lunch", 300.0, "2025-03-01", "Food"),
            Transaction::new("Bus", 100.0, "2025-03-02", "Transportation"),
        ]
    }

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
        assert_eq!(client.kind(), "mock");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        assert!(AIClient::mock().health_check().await);
    }

    #[tokio::test]
    async fn test_mock_dispatch_uses_overrides() {
        let client = AIClient::mock();
        assert_eq!(
            client.suggest_category("Movie Tickets", 12.0).await.unwrap(),
            "Entertainment"
        );
        let prediction = client.predict_expenses(&expenses(), 90).await.unwrap();
        assert!((prediction.predicted_total - 440.0).abs() < 1e-9);
    }

    #[test]
    fn test_render_prompt_substitutes_vars() {
        let prompts = RwLock::new(PromptLibrary::embedded_only());
        let mut vars = HashMap::new();
        vars.insert("name", "Morning Coffee".to_string());
        vars.insert("amount", "4.50".to_string());
        vars.insert("categories", CATEGORIES.join(", "));
        let prompt = render_prompt(&prompts, PromptId::SuggestCategory, &vars).unwrap();
        assert!(prompt.contains("\"Morning Coffee\""));
        assert!(prompt.contains("Personal Care, Savings"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_spending_summary() {
        let summary = spending_summary(&expenses());
        assert!(summary.starts_with("Total spent: 400.00"));
        let food = summary.find("Food").unwrap();
        let transport = summary.find("Transportation").unwrap();
        assert!(food < transport);
        assert!(summary.contains("(75.0%)"));
    }

    #[test]
    fn test_expense_lines_are_capped() {
        let many: Vec<Transaction> = (0..MAX_PROMPT_EXPENSES + 5)
            .map(|i| Transaction::new(&format!("Item {}", i), 1.0, "2025-03-01", "Other"))
            .collect();
        let lines = expense_lines(&many);
        assert_eq!(lines.lines().count(), MAX_PROMPT_EXPENSES + 1);
        assert!(lines.ends_with("and 5 more"));
    }
}
