//! State survives restarts and is shared between engines on one file.

use smartbot::bandit::{Feedback, FeatureProfile, StatisticStore, Tool, score_arm};
use tempfile::tempdir;

use crate::common::{assert_close, context, engine_at};

#[test]
fn test_restart_reproduces_scores() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bandit_state.json");

    let mut engine = engine_at(&path, FeatureProfile::Enhanced, 0.8);
    for round in 0..40u64 {
        let c = context(round, 16);
        let action = engine.decide(&c).unwrap().action;
        let feedback = Feedback::new(-((round % 7) as f64), round % 3 != 0, None);
        engine.learn(&c, action, &feedback).unwrap();
    }

    let reopened = engine_at(&path, FeatureProfile::Enhanced, 0.8);
    let probe = context(4242, 16);
    for tool in Tool::all() {
        let before = score_arm(engine.store(), *tool, &probe).unwrap();
        let after = score_arm(reopened.store(), *tool, &probe).unwrap();
        assert_close(after.score, before.score, 1e-9);
        assert_close(after.expected_reward, before.expected_reward, 1e-9);
    }
    assert_eq!(reopened.stats().total_updates, 40);
}

#[test]
fn test_persisted_alpha_wins_over_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bandit_state.json");

    let mut engine = engine_at(&path, FeatureProfile::Enhanced, 0.25);
    engine
        .learn(&context(1, 16), Tool::Abcd, &Feedback::new(0.0, true, None))
        .unwrap();

    let reopened = engine_at(&path, FeatureProfile::Enhanced, 2.0);
    assert_close(reopened.stats().alpha, 0.25, 0.0);
}

#[test]
fn test_second_engine_picks_up_other_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bandit_state.json");

    let mut first = engine_at(&path, FeatureProfile::Enhanced, 1.0);
    let mut second = engine_at(&path, FeatureProfile::Enhanced, 1.0);

    first
        .learn(&context(1, 16), Tool::Journal, &Feedback::new(-2.0, true, None))
        .unwrap();
    second
        .learn(&context(2, 16), Tool::UrgeLog, &Feedback::new(1.0, false, None))
        .unwrap();

    let on_disk = StatisticStore::load(&path, 16).unwrap().unwrap();
    assert_eq!(on_disk.total_updates(), 2);
    assert_eq!(on_disk.arm(Tool::Journal).updates, 1);
    assert_eq!(on_disk.arm(Tool::UrgeLog).updates, 1);
}

#[test]
fn test_profile_change_starts_fresh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bandit_state.json");

    let mut basic = engine_at(&path, FeatureProfile::Basic, 1.0);
    basic
        .learn(&context(5, 10), Tool::Breathing, &Feedback::new(-1.0, true, None))
        .unwrap();

    let enhanced = engine_at(&path, FeatureProfile::Enhanced, 1.0);
    assert_eq!(enhanced.stats().n_features, 16);
    assert_eq!(enhanced.stats().total_updates, 0);
}

#[test]
fn test_state_file_uses_wire_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bandit_state.json");

    let mut engine = engine_at(&path, FeatureProfile::Basic, 1.0);
    engine
        .learn(&context(9, 10), Tool::ValuesCommitment, &Feedback::new(0.0, true, None))
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["A"].as_array().unwrap().len(), 7);
    assert_eq!(raw["A"][0].as_array().unwrap().len(), 10);
    assert_eq!(raw["b"].as_array().unwrap().len(), 7);
    assert_eq!(raw["alpha"].as_f64(), Some(1.0));
    assert_eq!(raw["actions"][2], "VACI");
}
