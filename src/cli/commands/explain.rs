use clap::Args;

use crate::app::AppContext;
use crate::bandit::parse_csv;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Context features, comma separated
    #[arg(long, short = 'f', allow_hyphen_values = true)]
    pub features: String,
}

pub fn run(ctx: &AppContext, args: &ExplainArgs) -> Result<()> {
    let features = parse_csv(&args.features)?;
    let explanation = ctx.engine.lock().explain(&features)?;

    if ctx.robot_mode {
        return emit_json(&explanation, ctx.config.robot.format);
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Explanation")
        .kv("Action", explanation.recommended_action.as_str())
        .kv("Confidence", &format!("{:.3}", explanation.confidence))
        .blank()
        .section("Rationale")
        .bullet(&explanation.rationale)
        .blank()
        .section("Top features");
    for contribution in &explanation.top_contributing_features {
        layout.bar(
            &contribution.feature,
            contribution.importance,
            &format!("{:.2} (value {:.2})", contribution.importance, contribution.value),
        );
    }

    let factors = explanation.decision_factors;
    let flags = [
        ("high_stress", factors.high_stress),
        ("high_urges", factors.high_urges),
        ("low_mood", factors.low_mood),
        ("low_energy", factors.low_energy),
        ("emotional_instability", factors.emotional_instability),
        ("high_risk_context", factors.high_risk_context),
    ];
    layout.blank().section("Decision factors");
    let active: Vec<_> = flags.iter().filter(|(_, on)| *on).collect();
    if active.is_empty() {
        layout.bullet("none");
    }
    for (name, _) in active {
        layout.bullet(name);
    }

    emit_human(layout);
    Ok(())
}
