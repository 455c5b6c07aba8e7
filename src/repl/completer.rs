//! Completer for reedline - provides completion suggestions

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::cursor::MoveToNextLine;
use crossterm::style::Print;
use reedline::{Completer, Span, Suggestion};
use tokio::runtime::Handle;

use super::completion::CompletionEngine;
use crate::command::KubectlCommand;
use crate::context::ContextView;

/// Outcome of asking for the usage of the flag being assigned
#[derive(Debug, PartialEq, Eq)]
enum FlagUsage {
    /// The cursor is not after `--name=`
    None,
    /// First request for this line: print it
    Show(String),
    /// Already printed for this line
    Shown,
}

/// kubectl completer for reedline
pub struct KubeshCompleter {
    /// Completion engine for candidates
    engine: Arc<CompletionEngine<KubectlCommand>>,
    /// Pin used to scope name lookups
    context: ContextView,
    /// Line and cursor the last usage line was printed for
    usage_shown: Option<(String, usize)>,
}

impl KubeshCompleter {
    /// Create a new kubectl completer
    ///
    /// # Arguments
    /// * `engine` - Completion engine
    /// * `context` - Read-only view of the current pin
    pub fn new(engine: Arc<CompletionEngine<KubectlCommand>>, context: ContextView) -> Self {
        Self {
            engine,
            context,
            usage_shown: None,
        }
    }

    /// Usage of the flag being assigned, once per line
    ///
    /// The menu asks again on every repaint while it is open; only the call
    /// that activates it gets the usage line.
    fn flag_usage(&mut self, line: &str, pos: usize) -> FlagUsage {
        let Some(usage) = self.engine.flag_usage(line, pos) else {
            self.usage_shown = None;
            return FlagUsage::None;
        };

        let key = (line.to_string(), pos);
        if self.usage_shown.as_ref() == Some(&key) {
            return FlagUsage::Shown;
        }
        self.usage_shown = Some(key);
        FlagUsage::Show(usage)
    }
}

/// Print a flag usage line below the prompt
fn print_usage(usage: &str) {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(
        stdout,
        MoveToNextLine(2),
        Print(usage),
        MoveToNextLine(2)
    );
    let _ = stdout.flush();
}

impl Completer for KubeshCompleter {
    /// Complete the input at the given cursor position
    ///
    /// # Arguments
    /// * `line` - The input line
    /// * `pos` - Cursor position (byte index)
    ///
    /// # Returns
    /// * `Vec<Suggestion>` - Whole replacement words spanning the typed word
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        match self.flag_usage(line, pos) {
            FlagUsage::Show(usage) => {
                print_usage(&usage);
                return Vec::new();
            }
            FlagUsage::Shown => return Vec::new(),
            FlagUsage::None => {}
        }

        // Resource lookups are async; block on them from the editor thread
        if Handle::try_current().is_err() {
            return Vec::new();
        }
        let context = self.context.get();
        let engine = Arc::clone(&self.engine);
        let result = tokio::task::block_in_place(|| {
            Handle::current().block_on(async move { engine.complete(line, pos, &context).await })
        });

        let start = pos.saturating_sub(result.replace_len);
        let typed = line.get(start..pos).unwrap_or_default();

        result
            .candidates
            .into_iter()
            .map(|candidate| Suggestion {
                value: format!("{typed}{}", candidate.suffix),
                description: candidate.description,
                style: None,
                extra: None,
                span: Span::new(start, pos),
                append_whitespace: false,
                match_indices: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::command::Catalog;
    use crate::context::{Context, ContextStore};
    use crate::error::Result;
    use crate::resource::{Resource, ResourceFinder};

    struct PodFinder;

    #[async_trait]
    impl ResourceFinder for PodFinder {
        async fn lookup(&self, locator: &[String]) -> Result<Vec<Resource>> {
            Ok(["web-1", "web-2"]
                .iter()
                .map(|n| Resource::new(locator[0].as_str(), *n))
                .collect())
        }
    }

    fn create_test_completer(store: &ContextStore) -> KubeshCompleter {
        let root = KubectlCommand::root(Arc::new(Catalog::kubesh().unwrap()));
        let engine = CompletionEngine::new(root, Arc::new(PodFinder));
        KubeshCompleter::new(Arc::new(engine), store.reader())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_complete_command() {
        let store = ContextStore::new();
        let mut completer = create_test_completer(&store);
        let suggestions = completer.complete("desc", 4);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "describe ");
        assert_eq!(suggestions[0].span, Span::new(0, 4));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_span_covers_typed_word() {
        let store = ContextStore::new();
        let mut completer = create_test_completer(&store);
        let suggestions = completer.complete("logs we", 7);

        assert_eq!(suggestions.len(), 2);
        for suggestion in &suggestions {
            assert_eq!(suggestion.span, Span::new(5, 7));
            assert!(suggestion.value.starts_with("web-"));
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_uses_current_pin() {
        let mut store = ContextStore::new();
        let mut completer = create_test_completer(&store);
        store.set(Context::Type("pods".into()));

        let suggestions = completer.complete("describe ", 9);
        let values: Vec<&str> = suggestions.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["web-1 ", "web-2 "]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_sub_command_description() {
        let store = ContextStore::new();
        let mut completer = create_test_completer(&store);
        let suggestions = completer.complete("pi", 2);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].value, "pin ");
        assert_eq!(
            suggestions[0].description.as_deref(),
            Some("Pin a resource type or resource for subsequent commands")
        );
    }

    #[test]
    fn test_flag_usage_once_per_line() {
        let store = ContextStore::new();
        let mut completer = create_test_completer(&store);
        let line = "get --output=";

        assert!(matches!(
            completer.flag_usage(line, line.len()),
            FlagUsage::Show(usage) if usage.contains("--output=")
        ));
        assert_eq!(completer.flag_usage(line, line.len()), FlagUsage::Shown);
        assert_eq!(completer.flag_usage("get ", 4), FlagUsage::None);
        assert!(matches!(
            completer.flag_usage(line, line.len()),
            FlagUsage::Show(_)
        ));

        let other = "get --namespace=";
        assert!(matches!(
            completer.flag_usage(other, other.len()),
            FlagUsage::Show(_)
        ));
    }

    #[test]
    fn test_no_runtime_no_suggestions() {
        let store = ContextStore::new();
        let mut completer = create_test_completer(&store);
        assert!(completer.complete("get", 3).is_empty());
    }
}
