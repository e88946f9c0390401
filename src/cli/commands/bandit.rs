use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;

#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

#[derive(Args, Debug, Default)]
pub struct ResetArgs {
    /// Confirm discarding all learned statistics
    #[arg(long)]
    pub yes: bool,
}

pub fn stats(ctx: &AppContext, _args: &StatsArgs) -> Result<()> {
    let stats = ctx.engine.lock().stats();

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "status": "ok",
            "stats": stats,
        });
        emit_json(&payload, ctx.config.robot.format)
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Bandit Stats")
            .section("State")
            .kv("Path", &ctx.state_path.display().to_string())
            .kv("Features", &stats.n_features.to_string())
            .kv("Alpha", &format!("{:.3}", stats.alpha))
            .kv("Total updates", &stats.total_updates.to_string())
            .kv("Total interactions", &format!("{:.3}", stats.total_interactions))
            .blank()
            .section("Arms");
        for arm in &stats.arms {
            layout.kv(
                arm.action.as_str(),
                &format!("{} updates, trace {:.3}", arm.updates, arm.trace),
            );
        }
        emit_human(layout);
        Ok(())
    }
}

pub fn reset(ctx: &AppContext, args: &ResetArgs) -> Result<()> {
    if !args.yes && !ctx.robot_mode {
        let mut layout = HumanLayout::new();
        layout
            .title("Bandit Reset")
            .kv("Path", &ctx.state_path.display().to_string())
            .kv("Reset", "false")
            .bullet("re-run with --yes to discard learned statistics");
        emit_human(layout);
        return Ok(());
    }

    ctx.engine.lock().reset()?;

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "status": "ok",
            "reset": true,
            "path": ctx.state_path.display().to_string(),
        });
        emit_json(&payload, ctx.config.robot.format)
    } else {
        let mut layout = HumanLayout::new();
        layout
            .title("Bandit Reset")
            .kv("Path", &ctx.state_path.display().to_string())
            .kv("Reset", "true");
        emit_human(layout);
        Ok(())
    }
}
