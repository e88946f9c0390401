//! LinUCB contextual bandit over SMART Recovery tools.
//!
//! - `store`: per-arm `(A, b)` statistics and persistence
//! - `selector` / `updater`: the UCB decision rule and the ridge update
//! - `rewards`: feedback to scalar reward
//! - `explain` / `mode`: rationale, importance and interaction mode
//! - `engine`: the Decide / Learn / Explain operations over one store

pub mod arms;
pub mod engine;
pub mod explain;
pub mod features;
pub mod linalg;
pub mod mode;
pub mod rewards;
pub mod selector;
pub mod store;
pub mod thresholds;
pub mod updater;

pub use arms::Tool;
pub use engine::{Decision, Engine, EngineConfig, EngineStats, LearnOutcome};
pub use explain::{
    DecisionFactors, Explanation, FeatureContribution, FeatureValues, feature_importance,
};
pub use features::{FEATURE_NAMES, FeatureProfile, parse_csv, validate_context};
pub use mode::{UiMode, classify};
pub use rewards::{Feedback, RewardBreakdown, compute_reward};
pub use selector::{ArmScore, Selection, choose, score_arm};
pub use store::{DEFAULT_ALPHA, PersistedState, StatisticStore};
pub use thresholds::Thresholds;
pub use updater::update;
