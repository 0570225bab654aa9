//! Analytics configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/spendwise/config/analytics.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Longest trailing window a forecast may look at
pub const MAX_PREDICTION_WINDOW_DAYS: u32 = 3650;
/// Longest monthly trend a report may ask for
pub const MAX_MONTHS_BACK: u32 = 120;

/// Tunable parameters of the analytics engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsConfig {
    /// Budget usage percentage that raises a warning alert
    pub warning_threshold: f64,
    /// Budget usage percentage that raises a danger alert
    pub danger_threshold: f64,
    /// Months included in the monthly trend
    pub months_back: u32,
    /// Trailing window for predictions, in days
    pub prediction_window_days: u32,
    /// Multiplier on the average monthly total
    pub growth_factor: f64,
    /// Maximum savings advice items
    pub max_advice: usize,
    /// Timeout for one LLM request
    #[serde(with = "duration_secs")]
    pub ai_timeout: Duration,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            warning_threshold: 75.0, // alert at three quarters of a budget
            danger_threshold: 90.0,
            months_back: 6,
            prediction_window_days: 90, // roughly one quarter
            growth_factor: 1.1,
            max_advice: 5,
            ai_timeout: Duration::from_secs(30),
        }
    }
}

impl AnalyticsConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Self::from_toml(DEFAULT_CONFIG),
        }
    }

    /// Load from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML content, applying values on top of the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(alerts) = raw.alerts {
            if let Some(v) = alerts.warning_threshold {
                config.warning_threshold = v;
            }
            if let Some(v) = alerts.danger_threshold {
                config.danger_threshold = v;
            }
        }
        if let Some(trend) = raw.trend {
            if let Some(v) = trend.months_back {
                config.months_back = v;
            }
        }
        if let Some(prediction) = raw.prediction {
            if let Some(v) = prediction.window_days {
                config.prediction_window_days = v;
            }
            if let Some(v) = prediction.growth_factor {
                config.growth_factor = v;
            }
        }
        if let Some(advice) = raw.advice {
            if let Some(v) = advice.max_items {
                config.max_advice = v;
            }
        }
        if let Some(ai) = raw.ai {
            if let Some(v) = ai.timeout_secs {
                config.ai_timeout = Duration::from_secs(v);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        if !self.warning_threshold.is_finite() || self.warning_threshold < 0.0 {
            return Err(Error::Config(format!(
                "warning_threshold must be a non-negative number, got {}",
                self.warning_threshold
            )));
        }
        if !self.danger_threshold.is_finite() || self.danger_threshold < self.warning_threshold {
            return Err(Error::Config(format!(
                "danger_threshold ({}) must be at least warning_threshold ({})",
                self.danger_threshold, self.warning_threshold
            )));
        }
        if self.months_back > MAX_MONTHS_BACK {
            return Err(Error::Config(format!(
                "trend months_back must be at most {}, got {}",
                MAX_MONTHS_BACK, self.months_back
            )));
        }
        if self.prediction_window_days == 0 || self.prediction_window_days > MAX_PREDICTION_WINDOW_DAYS
        {
            return Err(Error::Config(format!(
                "prediction window_days must be between 1 and {}, got {}",
                MAX_PREDICTION_WINDOW_DAYS, self.prediction_window_days
            )));
        }
        if !self.growth_factor.is_finite() || self.growth_factor < 0.0 {
            return Err(Error::Config(format!(
                "growth_factor must be a non-negative number, got {}",
                self.growth_factor
            )));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendwise").join("config").join("analytics.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    alerts: Option<RawAlerts>,
    trend: Option<RawTrend>,
    prediction: Option<RawPrediction>,
    advice: Option<RawAdvice>,
    ai: Option<RawAi>,
}

#[derive(Debug, Deserialize)]
struct RawAlerts {
    warning_threshold: Option<f64>,
    danger_threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawTrend {
    months_back: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawPrediction {
    window_days: Option<u32>,
    growth_factor: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAdvice {
    max_items: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawAi {
    timeout_secs: Option<u64>,
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
}
