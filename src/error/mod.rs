//! Error handling for kubesh.
//!
//! A single [`KubeshError`] type wraps the category-specific kinds raised by
//! the tokenizer, command tree, resource finder, executor and configuration
//! loader. None of them is fatal to the REPL loop: callers either swallow
//! them (completion, context application) or print them and prompt again.

pub mod kinds;

pub use kinds::{
    CommandError, ConfigError, ExecutionError, KubeshError, LookupError, ParseError, Result,
};
