//! Property tests for the bandit core.

mod reward_props;
