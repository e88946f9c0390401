use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bandit::{DEFAULT_ALPHA, FeatureProfile, Thresholds};
use crate::error::{Result, SmartbotError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SMARTBOT_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Resolved state file: configured path, else `<root>/bandit_state.json`.
    #[must_use]
    pub fn state_path(&self, root: &Path) -> PathBuf {
        self.engine
            .state_path
            .clone()
            .unwrap_or_else(|| root.join("bandit_state.json"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("smartbot/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            SmartbotError::Config(format!("read config {}: {err}", path.display()))
        })?;
        let patch = toml::from_str(&raw).map_err(|err| {
            SmartbotError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.engine {
            self.engine.merge(patch);
        }
        if let Some(patch) = patch.thresholds {
            patch.apply(&mut self.thresholds);
        }
        if let Some(patch) = patch.robot {
            self.robot.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_f64("SMARTBOT_ALPHA")? {
            self.engine.alpha = value;
        }
        if let Some(value) = env_string("SMARTBOT_PROFILE") {
            self.engine.profile = FeatureProfile::parse(&value)?;
        }
        if let Some(value) = env_string("SMARTBOT_STATE_PATH") {
            self.engine.state_path = Some(PathBuf::from(value));
        }

        for name in Thresholds::NAMES {
            let key = format!("SMARTBOT_THRESHOLD_{}", name.to_uppercase());
            if let Some(value) = env_f64(&key)? {
                if let Some(slot) = self.thresholds.get_mut(name) {
                    *slot = value;
                }
            }
        }

        if let Some(value) = env_string("SMARTBOT_ROBOT_FORMAT") {
            self.robot.format = RobotFormat::parse(&value)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !self.engine.alpha.is_finite() || self.engine.alpha <= 0.0 {
            return Err(SmartbotError::Config(format!(
                "engine.alpha must be a positive number, got {}",
                self.engine.alpha
            )));
        }
        let t = &self.thresholds;
        let values = [
            t.high_stress,
            t.high_urge,
            t.low_mood,
            t.low_energy,
            t.high_volatility,
            t.high_risk,
            t.crisis,
            t.flow,
        ];
        if let Some((name, value)) = Thresholds::NAMES
            .iter()
            .zip(values)
            .find(|(_, v)| !v.is_finite())
        {
            return Err(SmartbotError::Config(format!(
                "thresholds.{name} must be finite, got {value}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub profile: FeatureProfile,
    #[serde(default)]
    pub state_path: Option<PathBuf>,
}

const fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            profile: FeatureProfile::Enhanced,
            state_path: None,
        }
    }
}

impl EngineSection {
    fn merge(&mut self, patch: EnginePatch) {
        if let Some(value) = patch.alpha {
            self.alpha = value;
        }
        if let Some(value) = patch.profile {
            self.profile = value;
        }
        if let Some(value) = patch.state_path {
            self.state_path = Some(value);
        }
    }
}

/// Layout of robot-mode JSON on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotFormat {
    /// Pretty-printed document.
    #[default]
    Json,
    /// One compact document per line.
    Jsonl,
}

impl RobotFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" => Ok(Self::Jsonl),
            other => Err(SmartbotError::Config(format!(
                "invalid robot format {other} (expected json|jsonl)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RobotConfig {
    #[serde(default)]
    pub format: RobotFormat,
}

impl RobotConfig {
    fn merge(&mut self, patch: RobotPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub engine: Option<EnginePatch>,
    pub thresholds: Option<ThresholdsPatch>,
    pub robot: Option<RobotPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EnginePatch {
    pub alpha: Option<f64>,
    pub profile: Option<FeatureProfile>,
    pub state_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ThresholdsPatch {
    pub high_stress: Option<f64>,
    pub high_urge: Option<f64>,
    pub low_mood: Option<f64>,
    pub low_energy: Option<f64>,
    pub high_volatility: Option<f64>,
    pub high_risk: Option<f64>,
    pub crisis: Option<f64>,
    pub flow: Option<f64>,
}

impl ThresholdsPatch {
    fn apply(self, thresholds: &mut Thresholds) {
        let pairs = [
            ("high_stress", self.high_stress),
            ("high_urge", self.high_urge),
            ("low_mood", self.low_mood),
            ("low_energy", self.low_energy),
            ("high_volatility", self.high_volatility),
            ("high_risk", self.high_risk),
            ("crisis", self.crisis),
            ("flow", self.flow),
        ];
        for (name, value) in pairs {
            if let (Some(value), Some(slot)) = (value, thresholds.get_mut(name)) {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RobotPatch {
    pub format: Option<RobotFormat>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|err| SmartbotError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
