use std::path::PathBuf;

use tempfile::TempDir;

use crate::bandit::{Engine, EngineConfig, FeatureProfile, Thresholds};

/// Isolated directory holding one bandit state file.
pub struct StateFixture {
    pub temp_dir: TempDir,
    pub state_path: PathBuf,
}

impl Default for StateFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl StateFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let state_path = temp_dir.path().join("bandit_state.json");

        println!("[FIXTURE] Created temp directory: {:?}", temp_dir.path());

        Self {
            temp_dir,
            state_path,
        }
    }

    /// Overwrite the state file with raw content.
    pub fn write_state(&self, content: &str) {
        std::fs::write(&self.state_path, content).expect("Failed to write state file");
        println!(
            "[FIXTURE] Wrote state: {:?} ({} bytes)",
            self.state_path,
            content.len()
        );
    }

    /// Open an engine backed by this fixture's state file.
    #[must_use]
    pub fn engine(&self, profile: FeatureProfile, alpha: f64) -> Engine {
        Engine::open(EngineConfig {
            profile,
            alpha,
            thresholds: Thresholds::default(),
            state_path: Some(self.state_path.clone()),
        })
    }
}

impl Drop for StateFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.temp_dir.path());
    }
}
