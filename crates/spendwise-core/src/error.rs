//! Error types for Spendwise

use thiserror::Error;

use crate::ai::AiError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("AI error: {0}")]
    Ai(#[from] AiError),
}

pub type Result<T> = std::result::Result<T, Error>;
