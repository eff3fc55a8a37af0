//! Analysis configuration.
//!
//! Every window, threshold and trade-plan percentage the engine uses lives
//! here. Missing tables or keys fall back to the classic defaults
//! (SMA 20/50, RSI 14 at 30/70, MACD 12/26/9, Bollinger 20 x 2, Stochastic 14/3).
//!
//! ```toml
//! [indicators]
//! sma_fast = 20
//! sma_slow = 50
//!
//! [signals]
//! rsi_oversold = 25.0
//! rsi_overbought = 75.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub ema: usize,
    pub rsi: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_k: f64,
    pub stochastic_k: usize,
    pub stochastic_d: usize,
    pub volume_sma: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            ema: 12,
            rsi: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_k: 2.0,
            stochastic_k: 14,
            stochastic_d: 3,
            volume_sma: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalParams {
    /// RSI below this votes bullish (oversold, expected bounce).
    pub rsi_oversold: f64,
    /// RSI above this votes bearish (overbought, expected pullback).
    pub rsi_overbought: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParams {
    pub window: usize,
    pub max_levels: usize,
}

impl Default for LevelParams {
    fn default() -> Self {
        Self {
            window: crate::levels::DEFAULT_LEVEL_WINDOW,
            max_levels: crate::levels::DEFAULT_MAX_LEVELS,
        }
    }
}

/// Percentages for the suggested trade plan on buy recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanParams {
    pub stop_loss_pct: f64,
    pub target_1_pct: f64,
    pub target_2_pct: f64,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            stop_loss_pct: 5.0,
            target_1_pct: 8.0,
            target_2_pct: 15.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorParams,
    pub signals: SignalParams,
    pub levels: LevelParams,
    pub plan: PlanParams,
}

impl AnalysisConfig {
    /// Load a config from a TOML file and validate it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations that would make every vote meaningless.
    ///
    /// The engine itself tolerates any values (zero windows just produce
    /// undefined series); this is for callers that want to fail fast.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        let windows = [
            ("sma_fast", ind.sma_fast),
            ("sma_slow", ind.sma_slow),
            ("ema", ind.ema),
            ("rsi", ind.rsi),
            ("macd_fast", ind.macd_fast),
            ("macd_slow", ind.macd_slow),
            ("macd_signal", ind.macd_signal),
            ("bollinger_period", ind.bollinger_period),
            ("stochastic_k", ind.stochastic_k),
            ("stochastic_d", ind.stochastic_d),
            ("volume_sma", ind.volume_sma),
            ("levels.window", self.levels.window),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be >= 1")));
        }
        if ind.sma_fast >= ind.sma_slow {
            return Err(ConfigError::Invalid(format!(
                "sma_fast ({}) must be < sma_slow ({})",
                ind.sma_fast, ind.sma_slow
            )));
        }
        if ind.macd_fast >= ind.macd_slow {
            return Err(ConfigError::Invalid(format!(
                "macd_fast ({}) must be < macd_slow ({})",
                ind.macd_fast, ind.macd_slow
            )));
        }
        if ind.bollinger_k.is_nan() || ind.bollinger_k <= 0.0 {
            return Err(ConfigError::Invalid("bollinger_k must be > 0".into()));
        }
        let sig = &self.signals;
        if !(0.0..=100.0).contains(&sig.rsi_oversold)
            || !(0.0..=100.0).contains(&sig.rsi_overbought)
            || sig.rsi_oversold >= sig.rsi_overbought
        {
            return Err(ConfigError::Invalid(format!(
                "rsi thresholds must satisfy 0 <= oversold ({}) < overbought ({}) <= 100",
                sig.rsi_oversold, sig.rsi_overbought
            )));
        }
        let plan = &self.plan;
        if plan.stop_loss_pct < 0.0 || plan.stop_loss_pct >= 100.0 {
            return Err(ConfigError::Invalid(
                "plan.stop_loss_pct must be in [0, 100)".into(),
            ));
        }
        Ok(())
    }

    /// Deterministic content hash, used to key memoized summaries.
    pub fn config_hash(&self) -> String {
        // Plain structs of numbers: serialization cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
