//! Hinter for reedline - provides inline hints based on history

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History, SearchQuery};

/// History-based hinter for kubesh
pub struct KubeshHinter {
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
}

impl KubeshHinter {
    pub fn new() -> Self {
        Self {
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }

    /// First word of the current hint, with its leading blanks
    fn first_token(&self) -> String {
        let trimmed = self.current_hint.trim_start();
        let lead = self.current_hint.len() - trimmed.len();
        let end = trimmed.find(' ').unwrap_or(trimmed.len());
        self.current_hint[..lead + end].to_string()
    }
}

impl Default for KubeshHinter {
    fn default() -> Self {
        Self::new()
    }
}

impl Hinter for KubeshHinter {
    /// Provide a hint for the current line
    ///
    /// # Arguments
    /// * `line` - The current input line
    /// * `pos` - Cursor position
    /// * `history` - Command history
    /// * `use_ansi_coloring` - Whether to use ANSI colors
    /// * `_cwd` - Current working directory (unused)
    ///
    /// # Returns
    /// * `String` - Hint text to display after the cursor
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let search_result = history
            .search(SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()
            .and_then(|results| results.into_iter().next());

        let Some(history_item) = search_result else {
            return String::new();
        };
        let history_line = history_item.command_line.as_str();
        if history_line.len() <= line.len() || !history_line.starts_with(line) {
            return String::new();
        }

        self.current_hint = history_line[line.len()..].to_string();
        if use_ansi_coloring {
            self.style.paint(&self.current_hint).to_string()
        } else {
            self.current_hint.clone()
        }
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }

    fn next_hint_token(&self) -> String {
        self.first_token()
    }
}
