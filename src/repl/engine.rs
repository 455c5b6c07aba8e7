use std::sync::Arc;

use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, Keybindings, MenuBuilder,
    Reedline, ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::warn;

use super::completer::KubeshCompleter;
use super::completion::CompletionEngine;
use super::hinter::KubeshHinter;
use super::prompt::KubeshPrompt;
use crate::command::KubectlCommand;
use crate::config::Config;
use crate::context::ContextView;
use crate::error::Result;

const COMPLETION_MENU_NAME: &str = "completion_menu";

/// Line editor for the shell
pub struct ReplEngine {
    /// Line editor for command input
    editor: Reedline,

    /// Prompt showing the pin
    prompt: KubeshPrompt,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `config` - Shell configuration (display and history sections)
    /// * `engine` - Completion engine behind Tab
    /// * `context` - Read-only view of the pin
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(
        config: &Config,
        engine: Arc<CompletionEngine<KubectlCommand>>,
        context: ContextView,
    ) -> Result<Self> {
        let mut keybindings = default_emacs_keybindings();
        bind_completion_keys(&mut keybindings);

        let completer = Box::new(KubeshCompleter::new(engine, context.clone()));
        let menu = Box::new(ColumnarMenu::default().with_name(COMPLETION_MENU_NAME));

        let mut editor = Reedline::create()
            .with_completer(completer)
            .with_menu(ReedlineMenu::EngineCompleter(menu))
            .with_quick_completions(true)
            .with_partial_completions(true)
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_ansi_colors(config.display.color_output);

        if config.display.hints {
            editor = editor.with_hinter(Box::new(KubeshHinter::new()));
        }

        if config.history.persist {
            match FileBackedHistory::with_file(
                config.history.max_size,
                config.history.file_path.clone(),
            ) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => warn!(
                    "Cannot use history file {}: {}",
                    config.history.file_path.display(),
                    e
                ),
            }
        } else {
            editor = editor.with_history(Box::new(FileBackedHistory::new(
                config.history.max_size,
            )?));
        }

        Ok(Self {
            editor,
            prompt: KubeshPrompt::new(context, config.display.color_output),
        })
    }

    /// Read a single line of input
    ///
    /// Ctrl+C abandons the current line and prompts again.
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input line, or None on Ctrl+D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            match self.editor.read_line(&self.prompt)? {
                Signal::Success(line) => return Ok(Some(line)),
                Signal::CtrlC => continue,
                Signal::CtrlD => return Ok(None),
            }
        }
    }
}

/// Tab opens the completion menu, or cycles it once open
fn bind_completion_keys(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu(COMPLETION_MENU_NAME.to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::SHIFT,
        KeyCode::BackTab,
        ReedlineEvent::MenuPrevious,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Catalog;
    use crate::context::ContextStore;
    use crate::resource::{KubectlFinder, TimeoutFinder};

    fn create_test_engine(config: &Config) -> Result<ReplEngine> {
        let catalog = Arc::new(Catalog::kubesh()?);
        let finder = KubectlFinder::new("/nonexistent/kubectl", None, Arc::clone(&catalog));
        let finder = TimeoutFinder::new(Arc::new(finder), config.lookup_timeout());
        let engine = CompletionEngine::new(KubectlCommand::root(catalog), Arc::new(finder));
        ReplEngine::new(config, Arc::new(engine), ContextStore::new().reader())
    }

    #[test]
    fn test_engine_without_persistent_history() {
        let mut config = Config::default();
        config.history.persist = false;
        config.display.hints = false;
        assert!(create_test_engine(&config).is_ok());
    }

    #[test]
    fn test_engine_with_history_file() {
        let mut config = Config::default();
        config.history.file_path =
            std::env::temp_dir().join(format!("kubesh-history-{}", std::process::id()));
        assert!(create_test_engine(&config).is_ok());
        let _ = std::fs::remove_file(&config.history.file_path);
    }

    #[test]
    fn test_tab_is_bound() {
        let mut keybindings = Keybindings::new();
        bind_completion_keys(&mut keybindings);
        assert!(
            keybindings
                .find_binding(KeyModifiers::NONE, KeyCode::Tab)
                .is_some()
        );
    }
}
