use super::{
    SessionState,
    handler::{
        AutoApplyCommand, DeletePlanCommand, HelpCommand, ListPlansCommand, LoadPlanCommand,
        PlanCommand, ProviderCommand, QuitCommand, ResetCommand, SavePlanCommand, ScenarioCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::AitripError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut SessionState,
    ) -> Result<Option<String>, AitripError> {
        self.registry.execute(command, args, state)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("provider", ProviderCommand);
    registry.register("scenario", ScenarioCommand);
    registry.register("plan", PlanCommand);
    registry.register("reset", ResetCommand);
    registry.register("apply", AutoApplyCommand);
    registry.register("save", SavePlanCommand);
    registry.register("load", LoadPlanCommand);
    registry.register("list", ListPlansCommand);
    registry.register("delete", DeletePlanCommand);

    CommandDispatcher::new(Arc::new(registry))
}
