//! Per-arm sufficient statistics and their on-disk form.
//!
//! Each arm keeps `A = I + Σ c cᵀ` and `b = Σ r c`. The file layout uses
//! the keys `A`, `b` and `alpha`, so state written by earlier releases of the
//! core still loads.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SmartbotError};

use super::arms::Tool;
use super::linalg::SquareMatrix;

pub const DEFAULT_ALPHA: f64 = 1.0;

/// Sufficient statistics of one arm's ridge regression.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmStats {
    pub a: SquareMatrix,
    pub b: Vec<f64>,
    pub updates: u64,
}

impl ArmStats {
    #[must_use]
    pub fn prior(dim: usize) -> Self {
        Self {
            a: SquareMatrix::identity(dim),
            b: vec![0.0; dim],
            updates: 0,
        }
    }
}

/// All mutable engine state: one [`ArmStats`] per tool plus `alpha`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticStore {
    dim: usize,
    alpha: f64,
    arms: Vec<ArmStats>,
}

impl StatisticStore {
    #[must_use]
    pub fn new(dim: usize, alpha: f64) -> Self {
        Self {
            dim,
            alpha,
            arms: (0..Tool::COUNT).map(|_| ArmStats::prior(dim)).collect(),
        }
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    #[must_use]
    pub fn arm(&self, tool: Tool) -> &ArmStats {
        &self.arms[tool.index()]
    }

    /// Mutate one arm's statistics in place.
    pub fn update_arm<F>(&mut self, tool: Tool, f: F)
    where
        F: FnOnce(&mut ArmStats),
    {
        f(&mut self.arms[tool.index()]);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tool, &ArmStats)> {
        Tool::all().iter().copied().zip(self.arms.iter())
    }

    /// Sum of matrix traces across arms (identity prior included).
    #[must_use]
    pub fn total_trace(&self) -> f64 {
        self.arms.iter().map(|arm| arm.a.trace()).sum()
    }

    #[must_use]
    pub fn total_updates(&self) -> u64 {
        self.arms.iter().map(|arm| arm.updates).sum()
    }

    #[must_use]
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            a: self.arms.iter().map(|arm| arm.a.clone()).collect(),
            b: self.arms.iter().map(|arm| arm.b.clone()).collect(),
            alpha: self.alpha,
            actions: Some(Tool::names()),
            updates: Some(self.arms.iter().map(|arm| arm.updates).collect()),
        }
    }

    /// Rebuild a store from persisted state, all or nothing.
    pub fn from_persisted(state: PersistedState, dim: usize) -> Result<Self> {
        if let Some(actions) = &state.actions {
            if *actions != Tool::names() {
                return Err(SmartbotError::StateShape(format!(
                    "arm order {actions:?} does not match {:?}",
                    Tool::names()
                )));
            }
        }
        if state.a.len() != Tool::COUNT || state.b.len() != Tool::COUNT {
            return Err(SmartbotError::StateShape(format!(
                "expected {} arms, found {} matrices and {} vectors",
                Tool::COUNT,
                state.a.len(),
                state.b.len()
            )));
        }
        if !state.alpha.is_finite() || state.alpha <= 0.0 {
            return Err(SmartbotError::StateShape(format!(
                "alpha must be positive, found {}",
                state.alpha
            )));
        }
        let updates = state.updates.unwrap_or_else(|| vec![0; Tool::COUNT]);
        if updates.len() != Tool::COUNT {
            return Err(SmartbotError::StateShape(format!(
                "expected {} update counters, found {}",
                Tool::COUNT,
                updates.len()
            )));
        }

        let mut arms = Vec::with_capacity(Tool::COUNT);
        for (i, ((a, b), updates)) in state.a.into_iter().zip(state.b).zip(updates).enumerate() {
            let name = Tool::from_index(i).map_or("?", Tool::as_str);
            if a.dim() != dim || b.len() != dim {
                return Err(SmartbotError::StateShape(format!(
                    "arm {name} has dimension {}x{} / {}, expected {dim}",
                    a.dim(),
                    a.dim(),
                    b.len()
                )));
            }
            if !a.is_finite() || b.iter().any(|v| !v.is_finite()) {
                return Err(SmartbotError::StateShape(format!(
                    "arm {name} contains non-finite values"
                )));
            }
            if a.cholesky().is_none() {
                return Err(SmartbotError::StateShape(format!(
                    "arm {name} matrix is not positive definite"
                )));
            }
            arms.push(ArmStats { a, b, updates });
        }

        Ok(Self {
            dim,
            alpha: state.alpha,
            arms,
        })
    }

    /// Write state atomically: serialize, write a temp file, rename over.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.to_persisted())?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json)?;
        match fs::rename(&temp_path, path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                fs::remove_file(path)?;
                if let Err(err) = fs::rename(&temp_path, path) {
                    let _ = fs::remove_file(&temp_path);
                    return Err(SmartbotError::Io(err));
                }
            }
            Err(err) => {
                let _ = fs::remove_file(&temp_path);
                return Err(SmartbotError::Io(err));
            }
        }
        debug!(path = %path.display(), "saved bandit state");
        Ok(())
    }

    /// Strict load. A missing file is `Ok(None)`.
    pub fn load(path: &Path, dim: usize) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        let state: PersistedState = serde_json::from_str(&raw)
            .map_err(|err| SmartbotError::Serialization(format!("bandit state parse: {err}")))?;
        Self::from_persisted(state, dim).map(Some)
    }

    /// Best-effort load used at startup: any failure yields fresh state.
    #[must_use]
    pub fn load_or_fresh(path: &Path, dim: usize, alpha: f64) -> Self {
        match Self::load(path, dim) {
            Ok(Some(store)) => store,
            Ok(None) => Self::new(dim, alpha),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to load bandit state, starting fresh"
                );
                Self::new(dim, alpha)
            }
        }
    }
}

/// Serialized engine state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(rename = "A")]
    pub a: Vec<SquareMatrix>,
    pub b: Vec<Vec<f64>>,
    pub alpha: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updates: Option<Vec<u64>>,
}

/// Advisory exclusive lock on a sidecar file, held until dropped.
///
/// Serializes load-update-save cycles across processes sharing one state
/// file.
pub struct StateLock {
    file: File,
}

impl StateLock {
    pub fn acquire(state_path: &Path) -> Result<Self> {
        if let Some(parent) = state_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lock_path = state_path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        file.lock_exclusive().map_err(|err| {
            SmartbotError::LockTimeout(format!("{}: {err}", lock_path.display()))
        })?;
        Ok(Self { file })
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
