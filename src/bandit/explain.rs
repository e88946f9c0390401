//! Rationale text and feature importance for a recommendation.
//!
//! Rationales are assembled from a fixed per-tool template plus an ordered
//! list of qualifier rules. Importance is `|θ|` normalised by its largest
//! component; it is reported to users and never fed back into selection.

use std::fmt::Write as _;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{Result, SmartbotError};

use super::arms::Tool;
use super::features::{
    CONTEXTUAL_RISK, EMOTIONAL_VOLATILITY, ENERGY, MOOD, STRESS, URGE_LEVEL, feature_or_neutral,
};
use super::selector::Selection;
use super::store::StatisticStore;
use super::thresholds::Thresholds;

/// Number of features reported as top contributors.
pub const TOP_FEATURES: usize = 5;

/// Contextual qualifier that can be appended to a rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    HighStress,
    ElevatedUrges,
    LowMood,
    EmotionalInstability,
    HighRiskContext,
}

/// Which tools a qualifier may be attached to.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Tools(&'static [Tool]),
    Any,
}

/// Qualifier rules, in the order they are evaluated and rendered.
const RULES: [(Qualifier, Scope); 5] = [
    (Qualifier::HighStress, Scope::Tools(&[Tool::Breathing])),
    (
        Qualifier::ElevatedUrges,
        Scope::Tools(&[Tool::UrgeLog, Tool::IfThen]),
    ),
    (Qualifier::LowMood, Scope::Tools(&[Tool::Abcd, Tool::Journal])),
    (Qualifier::EmotionalInstability, Scope::Any),
    (Qualifier::HighRiskContext, Scope::Any),
];

impl Qualifier {
    fn triggered(self, context: &[f64], t: &Thresholds) -> bool {
        match self {
            Self::HighStress => feature_or_neutral(context, STRESS) > t.high_stress,
            Self::ElevatedUrges => feature_or_neutral(context, URGE_LEVEL) > t.high_urge,
            Self::LowMood => feature_or_neutral(context, MOOD) < t.low_mood,
            Self::EmotionalInstability => {
                feature_or_neutral(context, EMOTIONAL_VOLATILITY) > t.high_volatility
            }
            Self::HighRiskContext => feature_or_neutral(context, CONTEXTUAL_RISK) > t.high_risk,
        }
    }

    fn render(self, context: &[f64]) -> String {
        match self {
            Self::HighStress => {
                format!("high stress level ({:.1})", feature_or_neutral(context, STRESS))
            }
            Self::ElevatedUrges => format!(
                "elevated urges ({:.1})",
                feature_or_neutral(context, URGE_LEVEL)
            ),
            Self::LowMood => format!("low mood ({:.1})", feature_or_neutral(context, MOOD)),
            Self::EmotionalInstability => "emotional instability".to_string(),
            Self::HighRiskContext => "high-risk context".to_string(),
        }
    }
}

impl Scope {
    fn admits(self, tool: Tool) -> bool {
        match self {
            Self::Tools(tools) => tools.contains(&tool),
            Self::Any => true,
        }
    }
}

/// What each tool is for.
#[must_use]
pub const fn template(tool: Tool) -> &'static str {
    match tool {
        Tool::CostBenefit => {
            "Cost-Benefit Analysis helps clarify decisions when facing important choices"
        }
        Tool::Abcd => "ABCD worksheet restructures unhelpful thought patterns",
        Tool::ValuesCommitment => {
            "Values & Commitment planning aligns actions with your core values"
        }
        Tool::IfThen => "If-Then planning prepares you for challenging situations",
        Tool::Breathing => "4-7-8 breathing provides immediate physiological calm",
        Tool::Journal => "Journaling processes emotions and builds self-awareness",
        Tool::UrgeLog => "Urge logging identifies patterns and builds coping skills",
    }
}

/// Qualifiers that fire for `tool` in `context`, in rule order.
#[must_use]
pub fn qualifiers(tool: Tool, context: &[f64], thresholds: &Thresholds) -> Vec<Qualifier> {
    RULES
        .iter()
        .filter(|(q, scope)| scope.admits(tool) && q.triggered(context, thresholds))
        .map(|(q, _)| *q)
        .collect()
}

/// Build the human-readable rationale for a recommendation.
#[must_use]
pub fn rationale(tool: Tool, context: &[f64], confidence: f64, thresholds: &Thresholds) -> String {
    let mut text = template(tool).to_string();
    let parts: Vec<String> = qualifiers(tool, context, thresholds)
        .into_iter()
        .map(|q| q.render(context))
        .collect();
    if !parts.is_empty() {
        let _ = write!(text, " given {}", parts.join(", "));
    }
    let _ = write!(text, " (confidence: {confidence:.2})");
    text
}

/// Normalised `|θ|` for one arm, in feature order.
///
/// All zeros when the arm has learned nothing.
pub fn feature_importance(store: &StatisticStore, tool: Tool) -> Result<Vec<f64>> {
    let stats = store.arm(tool);
    let chol = stats
        .a
        .cholesky()
        .ok_or_else(|| SmartbotError::SingularMatrix {
            arm: tool.to_string(),
        })?;
    let magnitudes: Vec<f64> = chol.solve(&stats.b).iter().map(|v| v.abs()).collect();
    let max = magnitudes.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 && max.is_finite() {
        Ok(magnitudes.into_iter().map(|v| v / max).collect())
    } else {
        Ok(vec![0.0; magnitudes.len()])
    }
}

/// A feature's importance and the value it had in the explained context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub importance: f64,
    pub value: f64,
}

/// The `limit` most important features, highest first. Ties keep feature order.
#[must_use]
pub fn top_contributions(
    importance: &[f64],
    names: &[&str],
    context: &[f64],
    limit: usize,
) -> Vec<FeatureContribution> {
    let mut ranked: Vec<usize> = (0..importance.len().min(names.len())).collect();
    ranked.sort_by(|&a, &b| importance[b].total_cmp(&importance[a]));
    ranked
        .into_iter()
        .take(limit)
        .map(|i| FeatureContribution {
            feature: names[i].to_string(),
            importance: importance[i],
            value: context.get(i).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Boolean flags summarising the context against the threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecisionFactors {
    pub high_stress: bool,
    pub high_urges: bool,
    pub low_mood: bool,
    pub low_energy: bool,
    pub emotional_instability: bool,
    pub high_risk_context: bool,
}

impl DecisionFactors {
    /// Missing positions read as "not triggered".
    #[must_use]
    pub fn from_context(context: &[f64], t: &Thresholds) -> Self {
        let above = |i: usize, cut: f64| context.get(i).is_some_and(|v| *v > cut);
        let below = |i: usize, cut: f64| context.get(i).is_some_and(|v| *v < cut);
        Self {
            high_stress: above(STRESS, t.high_stress),
            high_urges: above(URGE_LEVEL, t.high_urge),
            low_mood: below(MOOD, t.low_mood),
            low_energy: below(ENERGY, t.low_energy),
            emotional_instability: above(EMOTIONAL_VOLATILITY, t.high_volatility),
            high_risk_context: above(CONTEXTUAL_RISK, t.high_risk),
        }
    }
}

/// Feature name to value, in context order.
///
/// Serialized as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureValues(Vec<(String, f64)>);

impl FeatureValues {
    #[must_use]
    pub fn new(names: &[&str], context: &[f64]) -> Self {
        Self(
            names
                .iter()
                .zip(context)
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

impl Serialize for FeatureValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Full explanation of a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub recommended_action: Tool,
    pub confidence: f64,
    pub rationale: String,
    pub top_contributing_features: Vec<FeatureContribution>,
    pub feature_values: FeatureValues,
    pub decision_factors: DecisionFactors,
}

/// Explain a selection made against `store`.
pub fn explain(
    store: &StatisticStore,
    selection: &Selection,
    names: &[&str],
    thresholds: &Thresholds,
) -> Result<Explanation> {
    let context = &selection.context;
    let importance = feature_importance(store, selection.tool)?;
    Ok(Explanation {
        recommended_action: selection.tool,
        confidence: selection.confidence,
        rationale: rationale(selection.tool, context, selection.confidence, thresholds),
        top_contributing_features: top_contributions(&importance, names, context, TOP_FEATURES),
        feature_values: FeatureValues::new(names, context),
        decision_factors: DecisionFactors::from_context(context, thresholds),
    })
}
