pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::config::Config;
use crate::core::error::AitripError;
use crate::plan::PlanState;
pub use dispatcher::create_command_registry;
use std::fs;
use tracing::warn;

/// Mutable shell session: the plan snapshot plus the knobs the slash
/// commands adjust between dispatches.
pub struct SessionState {
    pub plan: PlanState,
    pub provider: String,
    pub scenario: String,
    pub auto_apply: bool,
    pub should_continue: bool,
}

impl SessionState {
    pub fn new(provider: String, scenario: String, auto_apply: bool) -> Self {
        Self {
            plan: load_active_plan(),
            provider,
            scenario,
            auto_apply,
            should_continue: true,
        }
    }

    /// Persist the active plan so the next run picks it up.
    pub fn persist_plan(&self) -> Result<(), AitripError> {
        let path = Config::plan_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, &self.plan)?;
        Ok(())
    }
}

fn load_active_plan() -> PlanState {
    let path = Config::plan_path();
    if !path.exists() {
        return PlanState::seed();
    }
    match fs::read_to_string(&path)
        .map_err(AitripError::from)
        .and_then(|contents| serde_json::from_str(&contents).map_err(AitripError::from))
    {
        Ok(plan) => plan,
        Err(e) => {
            warn!("ignoring unreadable plan at {}: {}", path.display(), e);
            PlanState::seed()
        }
    }
}
