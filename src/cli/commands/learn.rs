use clap::Args;

use crate::app::AppContext;
use crate::bandit::{Feedback, Tool, parse_csv};
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct LearnArgs {
    /// Context features the recommendation was made on, comma separated
    #[arg(long, short = 'f', allow_hyphen_values = true)]
    pub features: String,

    /// Tool that was used (CBA, ABCD, VACI, IFTHENT, BREATH, JOURNAL, URGELOG)
    #[arg(long, short = 'a')]
    pub action: String,

    /// Change in SUDS distress (0-10 scale); negative means improvement
    #[arg(long, allow_hyphen_values = true)]
    pub delta_suds: f64,

    /// The tool was completed
    #[arg(long)]
    pub completed: bool,

    /// The user regretted the session
    #[arg(long)]
    pub regret: bool,
}

pub fn run(ctx: &AppContext, args: &LearnArgs) -> Result<()> {
    let features = parse_csv(&args.features)?;
    let tool: Tool = args.action.parse()?;
    let feedback = Feedback::new(args.delta_suds, args.completed, args.regret.then_some(true));

    let outcome = ctx.engine.lock().learn(&features, tool, &feedback)?;

    if ctx.robot_mode {
        emit_json(&outcome, ctx.config.robot.format)
    } else {
        let reward = &outcome.reward_breakdown;
        let mut layout = HumanLayout::new();
        layout
            .title(&outcome.message)
            .kv("Action", tool.as_str())
            .kv("State", &ctx.state_path.display().to_string())
            .blank()
            .section("Reward")
            .kv("SUDS", &format!("{:+.3}", reward.suds_reward))
            .kv("Completion", &format!("{:+.3}", reward.completion_reward))
            .kv("Regret", &format!("{:+.3}", reward.regret_penalty))
            .kv("Total", &format!("{:+.3}", reward.total_reward));
        emit_human(layout);
        Ok(())
    }
}
