use crate::config::Config;
use crate::core::error::AitripError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config as LineConfig, Context, EditMode, Editor, Helper};

/// Line-editor helper: completes slash commands, hints from history.
pub struct PlannerHelper {
    commands: Vec<String>,
    history_hinter: HistoryHinter,
}

impl PlannerHelper {
    pub fn new(mut commands: Vec<String>) -> Self {
        commands.sort();
        Self {
            commands,
            history_hinter: HistoryHinter {},
        }
    }
}

impl Completer for PlannerHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if line.starts_with('/') && pos >= 1 {
            let prefix = &line[1..pos];
            let matches: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(prefix))
                .map(|cmd| Pair {
                    display: format!("/{}", cmd),
                    replacement: cmd.clone(),
                })
                .collect();

            if !matches.is_empty() {
                return Ok((1, matches));
            }
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for PlannerHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for PlannerHelper {}

impl Validator for PlannerHelper {}

impl Helper for PlannerHelper {}

/// Creates a configured rustyline editor
pub fn create_editor(
    command_names: Vec<String>,
) -> Result<Editor<PlannerHelper, FileHistory>, AitripError> {
    let config = LineConfig::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| AitripError::Input(format!("Failed to create line editor: {}", e)))?;

    editor.set_helper(Some(PlannerHelper::new(command_names)));

    let _ = editor.load_history(&Config::input_history_path());

    Ok(editor)
}

/// Reads a line of input using rustyline
pub fn read_input(
    editor: &mut Editor<PlannerHelper, FileHistory>,
) -> Result<Option<String>, AitripError> {
    let prompt = style("✈ > ").bold().cyan().to_string();

    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                if let Err(e) = editor.add_history_entry(&line) {
                    return Err(AitripError::Input(format!(
                        "Failed to add history entry: {}",
                        e
                    )));
                }
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Safe travels!");
            Ok(None)
        }
        Err(err) => Err(AitripError::Input(format!("Input error: {}", err))),
    }
}

/// Saves the editor history
pub fn save_history(editor: &mut Editor<PlannerHelper, FileHistory>) -> Result<(), AitripError> {
    let history_path = Config::input_history_path();

    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AitripError::Input(format!("Failed to create history directory: {}", e))
            })?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| AitripError::Input(format!("Failed to save history: {}", e)))
}
