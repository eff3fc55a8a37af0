//! Suggested trade plan for a recommendation.
//!
//! Buy calls get fixed-percentage stop and targets around the last close.
//! Sell calls advise exiting and waiting for support; hold advises waiting for
//! a clearer signal.

use serde::{Deserialize, Serialize};

use crate::config::PlanParams;
use crate::signals::Recommendation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TradePlan {
    Enter {
        entry: f64,
        stop_loss: f64,
        target_1: f64,
        target_2: f64,
    },
    Exit,
    Hold,
}

impl TradePlan {
    pub fn for_recommendation(
        recommendation: Recommendation,
        last_close: f64,
        params: &PlanParams,
    ) -> Self {
        if recommendation.is_buy() {
            TradePlan::Enter {
                entry: last_close,
                stop_loss: last_close * (1.0 - params.stop_loss_pct / 100.0),
                target_1: last_close * (1.0 + params.target_1_pct / 100.0),
                target_2: last_close * (1.0 + params.target_2_pct / 100.0),
            }
        } else if recommendation.is_sell() {
            TradePlan::Exit
        } else {
            TradePlan::Hold
        }
    }

    /// Reward to the first target per unit of risk to the stop.
    pub fn reward_risk(&self) -> Option<f64> {
        match *self {
            TradePlan::Enter {
                entry,
                stop_loss,
                target_1,
                ..
            } if entry > stop_loss => Some((target_1 - entry) / (entry - stop_loss)),
            _ => None,
        }
    }
}
