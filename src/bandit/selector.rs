//! LinUCB arm selection.
//!
//! For each arm, `θ = A⁻¹ b` is the ridge estimate and
//! `α √(cᵀ A⁻¹ c)` the exploration bonus. The arm with the largest
//! `θᵀ c + bonus` wins; ties go to the lowest ordinal.

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SmartbotError};

use super::arms::Tool;
use super::features::validate_context;
use super::linalg::dot;
use super::store::StatisticStore;

/// Score breakdown for one arm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArmScore {
    pub tool: Tool,
    pub expected_reward: f64,
    pub exploration_bonus: f64,
    pub score: f64,
}

/// Outcome of a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub tool: Tool,
    /// Winning UCB score, reported to callers as confidence.
    pub confidence: f64,
    /// The context the decision was made on.
    pub context: Vec<f64>,
    /// Every arm's score, in arm order.
    pub scores: Vec<ArmScore>,
}

/// Score a single arm against a validated context.
pub fn score_arm(store: &StatisticStore, tool: Tool, context: &[f64]) -> Result<ArmScore> {
    let stats = store.arm(tool);
    let singular = || SmartbotError::SingularMatrix {
        arm: tool.to_string(),
    };

    let chol = stats.a.cholesky().ok_or_else(singular)?;
    let theta = chol.solve(&stats.b);
    let expected_reward = dot(&theta, context);
    let exploration_bonus = store.alpha() * chol.inverse_quadratic_form(context).sqrt();
    let score = expected_reward + exploration_bonus;

    if !score.is_finite() {
        return Err(singular());
    }

    Ok(ArmScore {
        tool,
        expected_reward,
        exploration_bonus,
        score,
    })
}

/// Pick the arm with the highest upper confidence bound.
pub fn choose(store: &StatisticStore, context: &[f64]) -> Result<Selection> {
    validate_context(context, store.dim())?;

    let scores = Tool::all()
        .iter()
        .map(|tool| score_arm(store, *tool, context))
        .collect::<Result<Vec<_>>>()?;

    let mut best = scores[0];
    for candidate in &scores[1..] {
        if candidate.score > best.score {
            best = *candidate;
        }
    }

    debug!(
        tool = %best.tool,
        score = best.score,
        expected = best.expected_reward,
        bonus = best.exploration_bonus,
        "selected arm"
    );

    Ok(Selection {
        tool: best.tool,
        confidence: best.score,
        context: context.to_vec(),
        scores,
    })
}
