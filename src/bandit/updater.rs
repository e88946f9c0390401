//! Recursive ridge update: `A += c cᵀ`, `b += r c`.

use tracing::debug;

use crate::error::{Result, SmartbotError};

use super::arms::Tool;
use super::features::validate_context;
use super::store::StatisticStore;

/// Fold one observation into an arm's statistics.
///
/// The new matrix and vector are computed first and committed together, so
/// a rejected update leaves the arm untouched. Updates whose matrix would
/// lose positive definiteness to rounding are rejected as singular.
pub fn update(store: &mut StatisticStore, context: &[f64], tool: Tool, reward: f64) -> Result<()> {
    validate_context(context, store.dim())?;
    if !reward.is_finite() {
        return Err(SmartbotError::NonFiniteInput(format!("reward is {reward}")));
    }

    let current = store.arm(tool);
    let mut a = current.a.clone();
    a.add_outer(context);
    let b: Vec<f64> = current
        .b
        .iter()
        .zip(context)
        .map(|(bi, ci)| bi + reward * ci)
        .collect();

    if !a.is_finite() || b.iter().any(|v| !v.is_finite()) {
        return Err(SmartbotError::NonFiniteInput(format!(
            "update for {tool} overflows the statistics"
        )));
    }
    // Selection factors every arm, so a matrix that no longer factors
    // would block every later decision.
    if a.cholesky().is_none() {
        return Err(SmartbotError::SingularMatrix {
            arm: tool.to_string(),
        });
    }

    store.update_arm(tool, |arm| {
        arm.a = a;
        arm.b = b;
        arm.updates += 1;
    });
    debug!(tool = %tool, reward, "updated arm statistics");
    Ok(())
}
