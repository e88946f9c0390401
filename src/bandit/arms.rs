//! The fixed set of recommendable recovery tools.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SmartbotError;

/// One recommendable SMART Recovery tool.
///
/// Ordinal position is stable: it indexes the per-arm statistics and breaks
/// ties during selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tool {
    #[serde(rename = "CBA")]
    CostBenefit,
    #[serde(rename = "ABCD")]
    Abcd,
    #[serde(rename = "VACI")]
    ValuesCommitment,
    #[serde(rename = "IFTHENT")]
    IfThen,
    #[serde(rename = "BREATH")]
    Breathing,
    #[serde(rename = "JOURNAL")]
    Journal,
    #[serde(rename = "URGELOG")]
    UrgeLog,
}

impl Tool {
    pub const COUNT: usize = 7;

    #[must_use]
    pub const fn all() -> &'static [Self; Self::COUNT] {
        &[
            Self::CostBenefit,
            Self::Abcd,
            Self::ValuesCommitment,
            Self::IfThen,
            Self::Breathing,
            Self::Journal,
            Self::UrgeLog,
        ]
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Wire name used in requests, responses and persisted state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CostBenefit => "CBA",
            Self::Abcd => "ABCD",
            Self::ValuesCommitment => "VACI",
            Self::IfThen => "IFTHENT",
            Self::Breathing => "BREATH",
            Self::Journal => "JOURNAL",
            Self::UrgeLog => "URGELOG",
        }
    }

    #[must_use]
    pub fn names() -> Vec<String> {
        Self::all().iter().map(|tool| tool.as_str().to_string()).collect()
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = SmartbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SmartbotError::UnknownArm(wanted.to_string()))
    }
}
