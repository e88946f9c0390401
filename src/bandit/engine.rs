//! Decide / Learn / Explain over one owned statistic store.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;

use super::arms::Tool;
use super::explain::{Explanation, explain, rationale};
use super::features::{FeatureProfile, validate_context};
use super::mode::{UiMode, classify};
use super::rewards::{Feedback, RewardBreakdown, compute_reward};
use super::selector::choose;
use super::store::{StateLock, StatisticStore};
use super::thresholds::Thresholds;
use super::updater::update;

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub profile: FeatureProfile,
    pub alpha: f64,
    pub thresholds: Thresholds,
    /// Where state is persisted. `None` keeps the engine in memory.
    pub state_path: Option<PathBuf>,
}

/// Response to a decide request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub action: Tool,
    pub ui_mode: UiMode,
    pub confidence: f64,
    pub rationale: String,
}

/// Response to a learn request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearnOutcome {
    pub message: String,
    pub reward_breakdown: RewardBreakdown,
}

/// Per-arm summary for stats output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArmSummary {
    pub action: Tool,
    pub updates: u64,
    pub trace: f64,
}

/// Engine-wide statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStats {
    pub actions: Vec<String>,
    pub n_features: usize,
    pub feature_names: Vec<String>,
    pub alpha: f64,
    /// Sum of matrix traces across arms, identity prior included.
    pub total_interactions: f64,
    pub total_updates: u64,
    pub arms: Vec<ArmSummary>,
    pub state_path: Option<String>,
}

/// The bandit engine: single owner of the statistic store.
///
/// Reads (`decide`, `explain`) borrow immutably; `learn` and `reset` need
/// `&mut self`, so callers sharing an engine must wrap it in a lock.
#[derive(Debug, Clone)]
pub struct Engine {
    store: StatisticStore,
    config: EngineConfig,
}

impl Engine {
    /// Load persisted state, or start from the prior on any failure.
    #[must_use]
    pub fn open(config: EngineConfig) -> Self {
        let dim = config.profile.dimension();
        let store = match &config.state_path {
            Some(path) => StatisticStore::load_or_fresh(path, dim, config.alpha),
            None => StatisticStore::new(dim, config.alpha),
        };
        Self { store, config }
    }

    #[must_use]
    pub const fn store(&self) -> &StatisticStore {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state_path(&self) -> Option<&Path> {
        self.config.state_path.as_deref()
    }

    pub fn decide(&self, context: &[f64]) -> Result<Decision> {
        let selection = choose(&self.store, context)?;
        Ok(Decision {
            action: selection.tool,
            ui_mode: classify(context, &self.config.thresholds),
            confidence: selection.confidence,
            rationale: rationale(
                selection.tool,
                context,
                selection.confidence,
                &self.config.thresholds,
            ),
        })
    }

    /// Shape the reward, update the arm and persist, as one unit.
    ///
    /// The update is applied to a copy which only replaces the live store
    /// once it has been written, so a failed save leaves memory and disk in
    /// agreement.
    pub fn learn(&mut self, context: &[f64], tool: Tool, feedback: &Feedback) -> Result<LearnOutcome> {
        validate_context(context, self.store.dim())?;
        let reward = compute_reward(feedback)?;

        let state_path = self.config.state_path.clone();
        let _lock = match &state_path {
            Some(path) => {
                let lock = StateLock::acquire(path)?;
                self.refresh_from_disk(path);
                Some(lock)
            }
            None => None,
        };

        let mut next = self.store.clone();
        update(&mut next, context, tool, reward.total_reward)?;
        if let Some(path) = &state_path {
            next.save(path)?;
        }
        self.store = next;

        info!(
            tool = %tool,
            reward = reward.total_reward,
            updates = self.store.arm(tool).updates,
            "feedback received"
        );
        Ok(LearnOutcome {
            message: "Feedback received".to_string(),
            reward_breakdown: reward,
        })
    }

    pub fn explain(&self, context: &[f64]) -> Result<Explanation> {
        let selection = choose(&self.store, context)?;
        explain(
            &self.store,
            &selection,
            self.config.profile.names(),
            &self.config.thresholds,
        )
    }

    #[must_use]
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            actions: Tool::names(),
            n_features: self.store.dim(),
            feature_names: self
                .config
                .profile
                .names()
                .iter()
                .map(ToString::to_string)
                .collect(),
            alpha: self.store.alpha(),
            total_interactions: self.store.total_trace(),
            total_updates: self.store.total_updates(),
            arms: self
                .store
                .iter()
                .map(|(tool, arm)| ArmSummary {
                    action: tool,
                    updates: arm.updates,
                    trace: arm.a.trace(),
                })
                .collect(),
            state_path: self
                .config
                .state_path
                .as_ref()
                .map(|p| p.display().to_string()),
        }
    }

    /// Return every arm to the prior and persist it.
    pub fn reset(&mut self) -> Result<()> {
        let fresh = StatisticStore::new(self.store.dim(), self.config.alpha);
        if let Some(path) = &self.config.state_path {
            let _lock = StateLock::acquire(path)?;
            fresh.save(path)?;
        }
        self.store = fresh;
        info!("bandit state reset");
        Ok(())
    }

    /// Pick up writes made by other processes since this engine loaded.
    fn refresh_from_disk(&mut self, path: &Path) {
        match StatisticStore::load(path, self.store.dim()) {
            Ok(Some(store)) => self.store = store,
            Ok(None) => {}
            Err(err) => warn!(
                path = %path.display(),
                error = %err,
                "ignoring unreadable state on disk, keeping in-memory statistics"
            ),
        }
    }
}
