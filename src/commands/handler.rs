use super::SessionState;
use crate::config::{Config, Provider};
use crate::core::error::AitripError;
use crate::plan::PlanState;

use console::style;

pub trait CommandHandler {
    fn execute(&self, state: &mut SessionState, args: &[&str])
    -> Result<Option<String>, AitripError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ProviderCommand;
pub struct ScenarioCommand;
pub struct PlanCommand;
pub struct ResetCommand;
pub struct AutoApplyCommand;
pub struct SavePlanCommand;
pub struct LoadPlanCommand;
pub struct ListPlansCommand;
pub struct DeletePlanCommand;

const SCENARIOS: &[&str] = &["itinerary", "hotel", "log"];

impl CommandHandler for QuitCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the planning session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = vec![
            title.to_string(),
            QuitCommand.help().to_string(),
            HelpCommand.help().to_string(),
            ProviderCommand.help().to_string(),
            ScenarioCommand.help().to_string(),
            PlanCommand.help().to_string(),
            ResetCommand.help().to_string(),
            AutoApplyCommand.help().to_string(),
            SavePlanCommand.help().to_string(),
            LoadPlanCommand.help().to_string(),
            ListPlansCommand.help().to_string(),
            DeletePlanCommand.help().to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ProviderCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        let available = Provider::all()
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        if args.is_empty() {
            return Ok(Some(format!(
                "Active provider: {} (available: {})",
                state.provider, available
            )));
        }

        match Provider::from_str(args[0]) {
            Some(provider) => {
                state.provider = provider.as_str().to_string();
                Ok(Some(format!("Provider changed to: {}", state.provider)))
            }
            None => Ok(Some(format!(
                "Unknown provider '{}'. Available: {}",
                args[0], available
            ))),
        }
    }

    fn help(&self) -> &'static str {
        "/provider <id> - Show or change the AI backend"
    }
}

impl CommandHandler for ScenarioCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        if args.is_empty() {
            return Ok(Some(format!(
                "Active scenario: {} (known: {})",
                state.scenario,
                SCENARIOS.join(", ")
            )));
        }

        state.scenario = args[0].to_string();
        Ok(Some(format!("Scenario changed to: {}", state.scenario)))
    }

    fn help(&self) -> &'static str {
        "/scenario <name> - Show or change the planning scenario (itinerary/hotel/log)"
    }
}

impl CommandHandler for PlanCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        crate::display::display_plan(&state.plan);
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/plan - Show the current plan"
    }
}

impl CommandHandler for ResetCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        state.plan = PlanState::seed();
        state.persist_plan()?;
        Ok(Some("Plan reset to the starter Kyoto trip.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/reset - Replace the plan with the starter trip"
    }
}

impl CommandHandler for AutoApplyCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        state.auto_apply = !state.auto_apply;
        Ok(Some(format!(
            "Auto-apply is now {}",
            if state.auto_apply { "on" } else { "off" }
        )))
    }

    fn help(&self) -> &'static str {
        "/apply - Toggle applying plan updates without confirmation"
    }
}

impl CommandHandler for SavePlanCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        let filename = if args.is_empty() {
            chrono::Local::now()
                .format("plan_%Y%m%d_%H%M%S.json")
                .to_string()
        } else {
            args[0].to_string()
        };

        let plans_dir = Config::plans_dir();
        std::fs::create_dir_all(&plans_dir)?;
        let path = plans_dir.join(filename);

        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, &state.plan)?;

        Ok(Some(format!("Plan saved to: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/save <filename> - Save the plan as a named snapshot"
    }
}

impl CommandHandler for LoadPlanCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        if args.is_empty() {
            return Ok(Some("Please specify a filename".to_string()));
        }

        let path = Config::plans_dir().join(args[0]);

        let file = std::fs::File::open(&path)?;
        state.plan = serde_json::from_reader(file)?;
        state.persist_plan()?;

        crate::display::display_plan(&state.plan);
        Ok(Some(format!("Plan loaded from: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/load <filename> - Load a saved plan snapshot"
    }
}

impl CommandHandler for ListPlansCommand {
    fn execute(
        &self,
        _state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        let plans_dir = Config::plans_dir();
        std::fs::create_dir_all(&plans_dir)?;

        let mut files = Vec::new();
        for entry in std::fs::read_dir(plans_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        if files.is_empty() {
            Ok(Some("No saved plans found.".to_string()))
        } else {
            files.sort();
            Ok(Some(files.join("\n")))
        }
    }

    fn help(&self) -> &'static str {
        "/list - List saved plan snapshots"
    }
}

impl CommandHandler for DeletePlanCommand {
    fn execute(
        &self,
        _state: &mut SessionState,
        args: &[&str],
    ) -> Result<Option<String>, AitripError> {
        if args.is_empty() {
            return Ok(Some("Please specify a filename to delete".to_string()));
        }

        let path = Config::plans_dir().join(args[0]);

        if !path.exists() {
            return Ok(Some(format!("File not found: {}", path.display())));
        }

        std::fs::remove_file(&path)?;
        Ok(Some(format!("Deleted plan snapshot: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/delete <filename> - Delete a saved plan snapshot"
    }
}
