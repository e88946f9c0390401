//! Coarse interaction mode from stress and urge level.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::features::{STRESS, URGE_LEVEL};
use super::thresholds::Thresholds;

/// How much interface the client should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiMode {
    /// Minimal interface for high stress or urges.
    Crisis,
    /// Full toolkit, learning focused.
    Growth,
    /// Ambient, gentle nudges.
    Flow,
}

impl UiMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crisis => "Crisis",
            Self::Growth => "Growth",
            Self::Flow => "Flow",
        }
    }
}

impl fmt::Display for UiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a context. Fewer than three features means `Growth`.
#[must_use]
pub fn classify(context: &[f64], thresholds: &Thresholds) -> UiMode {
    if context.len() <= URGE_LEVEL {
        return UiMode::Growth;
    }
    let stress = context[STRESS];
    let urge = context[URGE_LEVEL];

    if stress > thresholds.crisis || urge > thresholds.crisis {
        return UiMode::Crisis;
    }
    if stress < thresholds.flow && urge < thresholds.flow {
        return UiMode::Flow;
    }
    UiMode::Growth
}
