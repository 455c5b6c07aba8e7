//! Tab completion for kubectl command lines
//!
//! The [`CompletionEngine`] is independent of the line editor: it takes the
//! text before the cursor and the current pin and answers with suffixes to
//! insert. [`crate::repl::KubeshCompleter`] adapts it to reedline.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use kubesh::command::{Catalog, KubectlCommand};
//! use kubesh::context::Context;
//! use kubesh::repl::completion::CompletionEngine;
//! use kubesh::resource::{KubectlFinder, TimeoutFinder};
//!
//! # async fn demo() -> kubesh::Result<()> {
//! let catalog = Arc::new(Catalog::kubesh()?);
//! let finder = KubectlFinder::new("kubectl", None, Arc::clone(&catalog));
//! let finder = Arc::new(TimeoutFinder::new(Arc::new(finder), Duration::from_secs(2)));
//! let engine = CompletionEngine::new(KubectlCommand::root(catalog), finder);
//!
//! // "get po" completes to "get pods "
//! let result = engine.complete("get po", 6, &Context::Empty).await;
//! # Ok(())
//! # }
//! ```

mod engine;

pub use engine::{Candidate, CompletionEngine, CompletionResult};
