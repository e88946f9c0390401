//! Explanations after learning.

use smartbot::bandit::{Feedback, FeatureProfile, Tool, UiMode};

use crate::common::{assert_close, engine};

fn stressed() -> Vec<f64> {
    let mut c = vec![0.5; 16];
    c[1] = 0.9; // stress
    c[2] = 0.3; // urge_level
    c
}

#[test]
fn test_explain_follows_learned_preference() {
    let mut engine = engine(FeatureProfile::Enhanced, 0.1);
    let c = stressed();
    for _ in 0..5 {
        engine
            .learn(&c, Tool::Breathing, &Feedback::new(-6.0, true, None))
            .unwrap();
    }

    let decision = engine.decide(&c).unwrap();
    assert_eq!(decision.action, Tool::Breathing);
    assert_eq!(decision.ui_mode, UiMode::Crisis);

    let explanation = engine.explain(&c).unwrap();
    assert_eq!(explanation.recommended_action, Tool::Breathing);
    assert!(explanation.rationale.starts_with(
        "4-7-8 breathing provides immediate physiological calm given high stress level (0.9)"
    ));
    assert!(explanation.decision_factors.high_stress);
    assert!(!explanation.decision_factors.high_urges);

    let top = &explanation.top_contributing_features;
    assert_eq!(top.len(), 5);
    assert_eq!(top[0].feature, "stress");
    assert_close(top[0].importance, 1.0, 1e-12);
    assert_close(top[0].value, 0.9, 0.0);
    assert!(top.windows(2).all(|w| w[0].importance >= w[1].importance));
}

#[test]
fn test_untrained_arm_reports_zero_importance() {
    let engine = engine(FeatureProfile::Basic, 1.0);
    let c = vec![0.5; 10];
    let explanation = engine.explain(&c).unwrap();
    assert_eq!(explanation.recommended_action, Tool::CostBenefit);
    assert!(
        explanation
            .top_contributing_features
            .iter()
            .all(|f| f.importance == 0.0)
    );
    let names: Vec<&str> = explanation
        .top_contributing_features
        .iter()
        .map(|f| f.feature.as_str())
        .collect();
    assert_eq!(names, ["mood", "stress", "urge_level", "energy", "sleep_quality"]);
    assert_eq!(explanation.feature_values.len(), 10);
}
