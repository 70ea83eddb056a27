use crate::cli::Args;
use crate::commands::{SessionState, dispatcher::CommandDispatcher};
use crate::config::Config;
use crate::core::error::AitripError;
use crate::dispatch::{DispatchRequest, Dispatcher};
use crate::display;
use crate::input;
use is_terminal::IsTerminal;
use std::io::{self, Read};

pub struct Application {
    pub args: Args,
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(
        args: Args,
        config: Config,
        dispatcher: Dispatcher,
        command_dispatcher: CommandDispatcher,
    ) -> Result<Self, AitripError> {
        Ok(Self {
            args,
            config,
            dispatcher,
            command_dispatcher,
        })
    }

    pub async fn run(&mut self) -> Result<(), AitripError> {
        let context = if !std::io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AitripError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        let provider = self
            .args
            .provider
            .clone()
            .or_else(|| self.config.active_provider.clone())
            .unwrap_or_else(|| "mock".to_string());
        let scenario = self
            .args
            .scenario
            .clone()
            .or_else(|| self.config.default_scenario.clone())
            .unwrap_or_else(|| "itinerary".to_string());
        let auto_apply = self.args.yes || self.config.auto_apply;

        let mut session = SessionState::new(provider, scenario, auto_apply);

        if self.args.chat {
            self.run_planning_session(&mut session).await
        } else {
            self.run_single_command(&mut session, context).await
        }
    }

    async fn run_single_command(
        &self,
        session: &mut SessionState,
        context: Option<String>,
    ) -> Result<(), AitripError> {
        let command = match (self.args.command.as_deref(), context) {
            (Some(arg_q), Some(stdin_ctx)) => format!("<pipe>{}</pipe>\n\n{}", stdin_ctx, arg_q),
            (None, Some(stdin_ctx)) => format!("<pipe>{}</pipe>", stdin_ctx),
            (Some(arg_q), None) => arg_q.to_string(),
            (None, None) => {
                return Err(AitripError::Input("No command provided".to_string()));
            }
        };

        self.handle_command(session, &command).await
    }

    /// One command round trip: dispatch, show the reply, and offer any
    /// proposed plan update for confirmation.
    async fn handle_command(
        &self,
        session: &mut SessionState,
        command: &str,
    ) -> Result<(), AitripError> {
        let request = DispatchRequest {
            command: command.to_string(),
            provider: session.provider.clone(),
            token: self.config.token_for(&session.provider).to_string(),
            state: session.plan.clone(),
            active_scenario: session.scenario.clone(),
        };

        let result = self.dispatcher.dispatch(&request).await?;
        display::display_reply(&result.display_text);

        let Some(applied) = result.applied_state else {
            return Ok(());
        };

        let changes = session.plan.changes_to(&applied);
        if changes.is_empty() {
            return Ok(());
        }

        display::display_changes(&changes);
        let accepted = session.auto_apply || display::prompt_apply_confirmation();
        if accepted {
            session.plan = applied;
            session.persist_plan()?;
            display::display_plan(&session.plan);
        } else {
            println!("{}", console::style("Update discarded.").dim());
        }

        Ok(())
    }

    async fn run_planning_session(&self, session: &mut SessionState) -> Result<(), AitripError> {
        println!(
            "Entering planning mode. Type '/help' for available commands. Press Ctrl+D or type /quit to exit."
        );
        display::display_plan(&session.plan);

        let mut editor = input::create_editor(self.command_dispatcher.get_command_names())?;

        loop {
            let input_result = input::read_input(&mut editor)?;

            let input = match input_result {
                Some(input) => input.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if let Some(rest) = input.strip_prefix('/') {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                if let Some((command, args)) = parts.split_first() {
                    match self.command_dispatcher.execute(command, args, session) {
                        Ok(Some(output)) => {
                            println!("{}", output);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            display::display_error(&e.to_string());
                        }
                    }

                    if !session.should_continue {
                        break;
                    }
                }
                continue;
            }

            if let Err(e) = self.handle_command(session, &input).await {
                display::display_error(&e.to_string());
            }
        }

        input::save_history(&mut editor)?;

        Ok(())
    }
}
