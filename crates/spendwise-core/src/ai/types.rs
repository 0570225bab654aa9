//! AI backend error and response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::aggregate::CategoryBreakdown;

/// Why an AI request did not produce a usable answer
#[derive(Error, Debug)]
pub enum AiError {
    /// Backend missing or not configured (no API key, unknown backend)
    #[error("AI backend not configured: {0}")]
    NotConfigured(String),

    /// Transport failure, including timeouts
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The backend answered with a non-success status
    #[error("AI API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The answer could not be parsed into the expected shape
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AiError {
    /// Request URLs can carry credentials, so they never reach error text
    fn from(err: reqwest::Error) -> Self {
        AiError::Http(err.without_url())
    }
}

pub type AiResult<T> = std::result::Result<T, AiError>;

/// Next-month forecast as returned by a model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiPrediction {
    pub predicted_total: f64,
    #[serde(default)]
    pub category_breakdown: CategoryBreakdown,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// One raw insight item from a model
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawInsight {
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}
