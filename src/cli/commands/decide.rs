use clap::Args;

use crate::app::AppContext;
use crate::bandit::parse_csv;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct DecideArgs {
    /// Context features, comma separated (e.g. "0.5,0.8,0.2,...")
    #[arg(long, short = 'f', allow_hyphen_values = true)]
    pub features: String,
}

pub fn run(ctx: &AppContext, args: &DecideArgs) -> Result<()> {
    let features = parse_csv(&args.features)?;
    let decision = ctx.engine.lock().decide(&features)?;

    if ctx.robot_mode {
        emit_json(&decision, ctx.config.robot.format)
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Recommendation")
            .kv("Action", decision.action.as_str())
            .kv("UI mode", decision.ui_mode.as_str())
            .kv("Confidence", &format!("{:.3}", decision.confidence))
            .blank()
            .section("Rationale")
            .bullet(&decision.rationale);
        emit_human(layout);
        Ok(())
    }
}
