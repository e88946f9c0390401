//! Named cut-offs shared by the explainer and the mode classifier.

use serde::{Deserialize, Serialize};

/// Every threshold the engine compares context features against.
///
/// "High" thresholds use a strict `>`; "low" thresholds a strict `<`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub high_stress: f64,
    pub high_urge: f64,
    pub low_mood: f64,
    pub low_energy: f64,
    pub high_volatility: f64,
    pub high_risk: f64,
    pub crisis: f64,
    pub flow: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_stress: 0.7,
            high_urge: 0.6,
            low_mood: 0.4,
            low_energy: 0.4,
            high_volatility: 0.6,
            high_risk: 0.6,
            crisis: 0.7,
            flow: 0.3,
        }
    }
}

impl Thresholds {
    /// Names accepted in config files and `SMARTBOT_THRESHOLD_*` overrides.
    pub const NAMES: [&'static str; 8] = [
        "high_stress",
        "high_urge",
        "low_mood",
        "low_energy",
        "high_volatility",
        "high_risk",
        "crisis",
        "flow",
    ];

    /// Mutable access by name, for overrides.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "high_stress" => Some(&mut self.high_stress),
            "high_urge" => Some(&mut self.high_urge),
            "low_mood" => Some(&mut self.low_mood),
            "low_energy" => Some(&mut self.low_energy),
            "high_volatility" => Some(&mut self.high_volatility),
            "high_risk" => Some(&mut self.high_risk),
            "crisis" => Some(&mut self.crisis),
            "flow" => Some(&mut self.flow),
            _ => None,
        }
    }
}
