//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap the payload in markdown fences or add a sentence before
//! or after it. These helpers cut the JSON out before deserializing.

use serde::de::DeserializeOwned;

use crate::analytics::{Insight, InsightKind};
use crate::models::{known_category, FALLBACK_CATEGORY};

use super::types::{AiError, AiPrediction, AiResult, RawInsight};

/// Confidence attached to model-generated insights
pub const AI_INSIGHT_CONFIDENCE: f64 = 0.8;

/// Truncate long responses for error messages
fn truncated(raw: &str) -> String {
    if raw.chars().count() > 200 {
        format!("{}...", raw.chars().take(200).collect::<String>())
    } else {
        raw.to_string()
    }
}

/// Remove a surrounding ```json ... ``` fence if present
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.trim_end().trim_end_matches("```").trim()
}

/// Slice between the first `open` and the last `close` delimiter
fn extract_json(response: &str, open: char, close: char) -> Option<&str> {
    let start = response.find(open)?;
    let end = response.rfind(close)?;
    (start < end).then(|| &response[start..=end])
}

fn parse_json<T: DeserializeOwned>(response: &str, open: char, close: char) -> AiResult<T> {
    let body = strip_code_fences(response);
    let json_str = extract_json(body, open, close).ok_or_else(|| {
        AiError::InvalidResponse(format!(
            "No JSON found in AI response | Raw: {}",
            truncated(body)
        ))
    })?;
    serde_json::from_str(json_str).map_err(|e| {
        AiError::InvalidResponse(format!(
            "Invalid JSON from AI: {} | Raw: {}",
            e,
            truncated(json_str)
        ))
    })
}

/// Map a free-text category answer onto a known category
///
/// Quotes and a trailing period are ignored. Anything that is not one of the
/// known categories becomes `Other`.
pub fn parse_category(response: &str) -> String {
    let mut cleaned = strip_code_fences(response)
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("")
        .trim();

    // Quotes, markdown and a trailing period can nest in any order
    loop {
        let next = cleaned
            .trim_matches(|c| matches!(c, '"' | '\'' | '*' | '`'))
            .trim_end_matches('.')
            .trim();
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    known_category(cleaned)
        .unwrap_or(FALLBACK_CATEGORY)
        .to_string()
}

/// Parse a forecast object
pub fn parse_prediction(response: &str) -> AiResult<AiPrediction> {
    let prediction: AiPrediction = parse_json(response, '{', '}')?;
    if !prediction.predicted_total.is_finite() || prediction.predicted_total < 0.0 {
        return Err(AiError::InvalidResponse(format!(
            "predicted_total out of range: {}",
            prediction.predicted_total
        )));
    }
    Ok(prediction)
}

/// Parse an array of `{message, data}` items into insights
pub fn parse_insights(response: &str) -> AiResult<Vec<Insight>> {
    let raw: Vec<RawInsight> = parse_json(response, '[', ']')?;
    Ok(raw
        .into_iter()
        .filter(|item| !item.message.trim().is_empty())
        .map(|item| {
            let insight = Insight::new(
                InsightKind::Insight,
                item.message.trim(),
                AI_INSIGHT_CONFIDENCE,
            );
            match item.data {
                Some(data) if data.is_object() => insight.with_data(data),
                _ => insight,
            }
        })
        .collect())
}
