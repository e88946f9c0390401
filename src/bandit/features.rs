//! Context vector layout and validation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmartbotError};

/// Semantic names of the context positions, in order.
pub const FEATURE_NAMES: [&str; 16] = [
    "mood",
    "stress",
    "urge_level",
    "energy",
    "sleep_quality",
    "workload",
    "social_support",
    "time_of_day",
    "day_of_week",
    "streak_normalized",
    "streak_momentum",
    "emotional_volatility",
    "core_balance",
    "contextual_risk",
    "recent_tool_effectiveness",
    "tool_diversity_score",
];

pub const MOOD: usize = 0;
pub const STRESS: usize = 1;
pub const URGE_LEVEL: usize = 2;
pub const ENERGY: usize = 3;
pub const EMOTIONAL_VOLATILITY: usize = 11;
pub const CONTEXTUAL_RISK: usize = 13;

/// Value assumed for a feature the caller did not supply.
pub const NEUTRAL_FEATURE: f64 = 0.5;

/// Which feature set the engine is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureProfile {
    Basic,
    #[default]
    Enhanced,
}

impl FeatureProfile {
    #[must_use]
    pub const fn dimension(self) -> usize {
        match self {
            Self::Basic => 10,
            Self::Enhanced => 16,
        }
    }

    #[must_use]
    pub fn names(self) -> &'static [&'static str] {
        &FEATURE_NAMES[..self.dimension()]
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "enhanced" => Ok(Self::Enhanced),
            other => Err(SmartbotError::Config(format!(
                "invalid feature profile {other} (expected basic|enhanced)"
            ))),
        }
    }
}

/// Reject contexts the bandit math cannot consume.
///
/// Length must equal `dim` exactly and every component must be finite.
pub fn validate_context(context: &[f64], dim: usize) -> Result<()> {
    if context.len() != dim {
        return Err(SmartbotError::DimensionMismatch {
            expected: dim,
            actual: context.len(),
        });
    }
    if let Some((i, value)) = context.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        let name = FEATURE_NAMES.get(i).copied().unwrap_or("feature");
        return Err(SmartbotError::NonFiniteInput(format!(
            "{name} (index {i}) is {value}"
        )));
    }
    Ok(())
}

/// Read a feature, falling back to the neutral value when absent.
#[must_use]
pub fn feature_or_neutral(context: &[f64], index: usize) -> f64 {
    context.get(index).copied().unwrap_or(NEUTRAL_FEATURE)
}

/// Parse a comma-separated list of numbers, e.g. `"0.5, 0.8, 0.2"`.
pub fn parse_csv(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry.parse::<f64>().map_err(|err| {
                SmartbotError::NonFiniteInput(format!("feature value {entry}: {err}"))
            })
        })
        .collect()
}
