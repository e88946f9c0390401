//! Learning behaviour across many decide/learn rounds.

use smartbot::bandit::{Feedback, FeatureProfile, Tool, score_arm};

use crate::common::{context, engine};

const DIM: usize = 16;

fn good() -> Feedback {
    Feedback::new(-5.0, true, None)
}

fn bad() -> Feedback {
    Feedback::new(2.0, false, None)
}

#[test]
fn test_exploration_bonus_shrinks_with_data() {
    let mut engine = engine(FeatureProfile::Enhanced, 1.0);
    let c = context(7, DIM);

    let mut previous = score_arm(engine.store(), Tool::Journal, &c)
        .unwrap()
        .exploration_bonus;
    for round in 0..10 {
        engine.learn(&c, Tool::Journal, &good()).unwrap();
        let bonus = score_arm(engine.store(), Tool::Journal, &c)
            .unwrap()
            .exploration_bonus;
        println!("[VERIFY] round {round}: bonus {previous:.6} -> {bonus:.6}");
        assert!(bonus < previous);
        previous = bonus;
    }

    let untouched = score_arm(engine.store(), Tool::Abcd, &c).unwrap();
    assert!(untouched.exploration_bonus > previous);
}

#[test]
fn test_positive_feedback_raises_expected_reward() {
    let mut engine = engine(FeatureProfile::Enhanced, 1.0);
    let c = context(3, DIM);

    let before = score_arm(engine.store(), Tool::IfThen, &c).unwrap();
    assert!(before.expected_reward.abs() < 1e-12);

    engine.learn(&c, Tool::IfThen, &good()).unwrap();
    let after = score_arm(engine.store(), Tool::IfThen, &c).unwrap();
    assert!(after.expected_reward > before.expected_reward);

    engine.learn(&c, Tool::Abcd, &bad()).unwrap();
    let punished = score_arm(engine.store(), Tool::Abcd, &c).unwrap();
    assert!(punished.expected_reward < 0.0);
}

#[test]
fn test_bandit_settles_on_rewarding_tool() {
    let mut engine = engine(FeatureProfile::Enhanced, 0.1);
    let mut picks = Vec::new();

    for round in 0..200 {
        let c = context(round, DIM);
        let action = engine.decide(&c).unwrap().action;
        let feedback = if action == Tool::Breathing { good() } else { bad() };
        engine.learn(&c, action, &feedback).unwrap();
        picks.push(action);
    }

    let breathing = picks.iter().filter(|t| **t == Tool::Breathing).count();
    println!("[VERIFY] BREATH chosen {breathing}/200");
    assert!(breathing >= 180);
    assert!(picks[180..].iter().all(|t| *t == Tool::Breathing));

    // Unseen context, same regime.
    let decision = engine.decide(&context(10_000, DIM)).unwrap();
    assert_eq!(decision.action, Tool::Breathing);
}

#[test]
fn test_statistics_stay_positive_definite() {
    let mut engine = engine(FeatureProfile::Enhanced, 1.0);
    let tools = Tool::all();
    for round in 0..300u64 {
        let tool = tools[(round % tools.len() as u64) as usize];
        let feedback = Feedback::new(
            (round % 21) as f64 - 10.0,
            round % 2 == 0,
            Some(round % 5 == 0),
        );
        engine.learn(&context(round, DIM), tool, &feedback).unwrap();
    }

    for (tool, arm) in engine.store().iter() {
        assert!(arm.a.is_symmetric(1e-9), "{tool} matrix lost symmetry");
        assert!(arm.a.cholesky().is_some(), "{tool} matrix not positive definite");
        assert!(arm.updates > 0);
    }
    assert_eq!(engine.stats().total_updates, 300);
}

#[test]
fn test_identical_history_gives_identical_decisions() {
    let mut first = engine(FeatureProfile::Basic, 0.5);
    let mut second = engine(FeatureProfile::Basic, 0.5);
    for round in 0..25 {
        let c = context(round, 10);
        let tool = first.decide(&c).unwrap().action;
        first.learn(&c, tool, &good()).unwrap();
        second.learn(&c, tool, &good()).unwrap();
    }

    let probe = context(99, 10);
    assert_eq!(first.decide(&probe).unwrap(), second.decide(&probe).unwrap());
}
