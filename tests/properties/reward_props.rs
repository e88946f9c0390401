use proptest::prelude::*;

use smartbot::bandit::{Feedback, compute_reward};

proptest! {
    #[test]
    fn test_reward_is_sum_of_components(
        delta in -10.0f64..10.0,
        completed in any::<bool>(),
        regret in proptest::option::of(any::<bool>()),
    ) {
        let breakdown = compute_reward(&Feedback::new(delta, completed, regret)).unwrap();

        prop_assert!((breakdown.suds_reward + delta / 10.0).abs() < 1e-12);
        prop_assert_eq!(breakdown.completion_reward, if completed { 1.0 } else { -0.5 });
        prop_assert_eq!(breakdown.regret_penalty, if regret == Some(true) { -1.0 } else { 0.0 });
        let sum = breakdown.suds_reward + breakdown.completion_reward + breakdown.regret_penalty;
        prop_assert!((breakdown.total_reward - sum).abs() < 1e-12);
    }

    #[test]
    fn test_improvement_never_lowers_reward(
        delta in -10.0f64..10.0,
        step in 0.0f64..5.0,
        completed in any::<bool>(),
    ) {
        let worse = compute_reward(&Feedback::new(delta, completed, None)).unwrap();
        let better = compute_reward(&Feedback::new(delta - step, completed, None)).unwrap();
        prop_assert!(better.total_reward >= worse.total_reward);
    }
}
