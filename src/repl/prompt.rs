//! Prompt showing the current pin

use std::borrow::Cow;

use nu_ansi_term::Color;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

use crate::context::ContextView;

/// Custom prompt for the kubesh REPL
pub struct KubeshPrompt {
    /// Pin rendered between brackets
    context: ContextView,
    /// Whether to color the pin
    color: bool,
}

impl KubeshPrompt {
    /// Create a new prompt
    ///
    /// # Arguments
    /// * `context` - Read-only view of the current pin
    /// * `color` - Whether to color the pin
    ///
    /// # Returns
    /// * `Self` - New prompt
    pub fn new(context: ContextView, color: bool) -> Self {
        Self { context, color }
    }
}

impl Prompt for KubeshPrompt {
    /// `kubesh> `, or `kubesh[pods/web-1]> ` while something is pinned
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let context = self.context.get();
        if context.is_empty() {
            return "kubesh> ".into();
        }

        let pin = context.to_string();
        if self.color {
            format!("kubesh[{}]> ", Color::Cyan.paint(pin)).into()
        } else {
            format!("kubesh[{}]> ", pin).into()
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    /// Render the history search prompt
    ///
    /// # Arguments
    /// * `history_search` - History search state
    ///
    /// # Returns
    /// * `Cow<str>` - History search prompt
    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}
