//! Common test utilities shared across integration tests.
//!
//! Helpers here depend only on the public crate API.

#![allow(dead_code)]

use std::path::Path;

use smartbot::bandit::{Engine, EngineConfig, FeatureProfile, Thresholds};

/// Deterministic context in `[0, 1)` for a given seed.
pub fn context(seed: u64, dim: usize) -> Vec<f64> {
    (0..dim as u64)
        .map(|i| {
            let mixed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(i.wrapping_mul(1_442_695_040_888_963_407));
            ((mixed >> 33) % 1000) as f64 / 1000.0
        })
        .collect()
}

/// Engine persisting to `path` with default thresholds.
pub fn engine_at(path: &Path, profile: FeatureProfile, alpha: f64) -> Engine {
    Engine::open(EngineConfig {
        profile,
        alpha,
        thresholds: Thresholds::default(),
        state_path: Some(path.to_path_buf()),
    })
}

/// In-memory engine.
pub fn engine(profile: FeatureProfile, alpha: f64) -> Engine {
    Engine::open(EngineConfig {
        profile,
        alpha,
        thresholds: Thresholds::default(),
        state_path: None,
    })
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}
