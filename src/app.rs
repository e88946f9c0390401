use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::bandit::{Engine, EngineConfig};
use crate::config::{Config, env_bool};
use crate::error::{Result, SmartbotError};

pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub state_path: PathBuf,
    /// Every engine access goes through this lock; learn holds it across
    /// update and save.
    pub engine: Mutex<Engine>,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root()?;
        let config = Config::load(cli.config.as_deref(), &root)?;
        let state_path = cli
            .state
            .clone()
            .unwrap_or_else(|| config.state_path(&root));
        let robot_mode = robot_mode_requested(cli);

        Ok(Self::new(root, config, state_path, robot_mode, cli.verbose))
    }

    #[must_use]
    pub fn new(
        root: PathBuf,
        config: Config,
        state_path: PathBuf,
        robot_mode: bool,
        verbosity: u8,
    ) -> Self {
        let engine = Engine::open(EngineConfig {
            profile: config.engine.profile,
            alpha: config.engine.alpha,
            thresholds: config.thresholds,
            state_path: Some(state_path.clone()),
        });
        Self {
            root,
            config,
            state_path,
            engine: Mutex::new(engine),
            robot_mode,
            verbosity,
        }
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("SMARTBOT_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".smartbot") {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| SmartbotError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("smartbot"))
    }
}

/// Robot output from `--robot` or `SMARTBOT_ROBOT`.
#[must_use]
pub fn robot_mode_requested(cli: &crate::cli::Cli) -> bool {
    cli.robot || env_bool("SMARTBOT_ROBOT").unwrap_or(false)
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}
