//! Interactive shell front end
//!
//! This module provides the terminal side of kubesh:
//! - Line editing with reedline and file-backed history
//! - Tab completion of commands, flags, resource types and names
//! - History hints
//! - A prompt that shows the current pin

pub mod completion;

mod completer;
mod engine;
mod hinter;
mod prompt;

pub use completer::KubeshCompleter;
pub use completion::{Candidate, CompletionEngine, CompletionResult};
pub use engine::ReplEngine;
pub use hinter::KubeshHinter;
pub use prompt::KubeshPrompt;
