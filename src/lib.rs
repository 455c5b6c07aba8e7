//! kubesh library
//!
//! The pieces behind the `kubesh` interactive kubectl shell. They can be used
//! on their own, for instance to drive kubectl completion from another line
//! editor.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `command`: The kubectl command tree and flag splitting
//! - `config`: Configuration management
//! - `context`: The pinned resource and how it is applied to commands
//! - `error`: Error types and handling
//! - `executor`: Line dispatch, built-ins and kubectl child processes
//! - `parser`: Word splitting of input lines
//! - `repl`: Completion engine and the reedline front end
//! - `resource`: Resource lookup against the cluster
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kubesh::command::{Catalog, KubectlCommand};
//! use kubesh::context::Context;
//! use kubesh::repl::CompletionEngine;
//! use kubesh::resource::{KubectlFinder, TimeoutFinder};
//!
//! #[tokio::main]
//! async fn main() -> kubesh::Result<()> {
//!     let catalog = Arc::new(Catalog::kubesh()?);
//!     let finder = KubectlFinder::new("kubectl", None, Arc::clone(&catalog));
//!     let finder = TimeoutFinder::new(Arc::new(finder), std::time::Duration::from_secs(2));
//!     let engine = CompletionEngine::new(KubectlCommand::root(catalog), Arc::new(finder));
//!
//!     let result = engine.complete("get po", 6, &Context::Empty).await;
//!     println!("{:?}", result.candidates);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod parser;
pub mod repl;
pub mod resource;

// Re-export commonly used types
pub use config::Config;
pub use context::{Context, ContextStore};
pub use error::{KubeshError, Result};
pub use executor::{Executor, Flow};
pub use parser::tokenize;
pub use repl::{CompletionEngine, ReplEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
