//! Reward shaping for tool feedback.
//!
//! Converts the feedback a user gives after trying a tool into the single
//! scalar the bandit learns from. Components are not clamped, so a bad
//! episode can push the total below -1.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmartbotError};

/// Points on the SUDS distress scale (0-10) that map to one unit of reward.
pub const SUDS_SCALE: f64 = 10.0;

pub const COMPLETED_REWARD: f64 = 1.0;
pub const ABANDONED_REWARD: f64 = -0.5;
pub const REGRET_PENALTY: f64 = -1.0;

/// Feedback for one recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Change in SUDS after using the tool. Negative is an improvement.
    pub delta_suds: f64,

    /// Whether the user finished the tool.
    pub completed: bool,

    /// Whether the user regretted the session, if asked.
    #[serde(default)]
    pub regret: Option<bool>,
}

impl Feedback {
    #[must_use]
    pub const fn new(delta_suds: f64, completed: bool, regret: Option<bool>) -> Self {
        Self {
            delta_suds,
            completed,
            regret,
        }
    }
}

/// Components of a shaped reward and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub suds_reward: f64,
    pub completion_reward: f64,
    pub regret_penalty: f64,
    pub total_reward: f64,
}

/// Shape feedback into a reward.
///
/// # Reward Scale
/// - SUDS: `-delta_suds / 10`, roughly [-1, 1]
/// - Completion: `+1.0` if completed, `-0.5` otherwise
/// - Regret: `-1.0` if flagged, `0` if not flagged or not asked
pub fn compute_reward(feedback: &Feedback) -> Result<RewardBreakdown> {
    if !feedback.delta_suds.is_finite() {
        return Err(SmartbotError::NonFiniteInput(format!(
            "delta_suds is {}",
            feedback.delta_suds
        )));
    }

    let suds_reward = -feedback.delta_suds / SUDS_SCALE;
    let completion_reward = if feedback.completed {
        COMPLETED_REWARD
    } else {
        ABANDONED_REWARD
    };
    let regret_penalty = if feedback.regret.unwrap_or(false) {
        REGRET_PENALTY
    } else {
        0.0
    };

    Ok(RewardBreakdown {
        suds_reward,
        completion_reward,
        regret_penalty,
        total_reward: suds_reward + completion_reward + regret_penalty,
    })
}
