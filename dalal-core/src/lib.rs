//! Dalal Core: technical indicators, support/resistance and signal votes for
//! daily stock series.
//!
//! This crate contains the analysis engine behind a stock page:
//! - Domain types (bars, price series, lookback periods)
//! - Indicator library (SMA, EMA, RSI, MACD, Bollinger, Stochastic, volume SMA)
//! - Support/resistance locator over centered rolling extremes
//! - Vote rules and the aggregate recommendation with confidence
//! - Summary formatter, price overview and trade plan
//! - Keyword news scoring
//! - CSV loading and an optional summary cache
//!
//! Everything under `indicators`, `levels`, `signals` and `summary` is pure
//! and synchronous: the same series and config always give the same output.

pub mod cache;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod levels;
pub mod news;
pub mod overlays;
pub mod overview;
pub mod plan;
pub mod signals;
pub mod summary;

pub use config::AnalysisConfig;
pub use domain::{Bar, Period, PriceSeries};
pub use signals::{Recommendation, SignalVote, SignalVotes};
pub use summary::{summarize, TechnicalAnalyzer, TechnicalSummary};
