//! Line execution for kubesh
//!
//! This module turns one input line into action:
//! - the built-ins `pin` and `exit` are handled in-process
//! - everything else has the pin applied and runs as a kubectl child,
//!   either relayed through the shell's output writer or attached to the
//!   terminal
//!
//! Failures are returned to the REPL, which reports them and prompts again.

use std::io::{self, Stdout};
use std::sync::Arc;

use tracing::debug;

use crate::command::{Catalog, Command, EXIT_COMMAND, KubectlCommand, PIN_COMMAND};
use crate::context::{ContextStore, ContextView, apply_context};
use crate::error::Result;
use crate::parser::tokenize;
use crate::resource::ResourceFinder;

mod newline;
mod pin;
mod process;

pub use newline::NewlineEnsuringWriter;
pub use process::needs_terminal;

/// What the REPL should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Dispatcher for shell lines
pub struct Executor {
    /// kubectl executable
    program: String,

    /// Root of the command tree
    root: KubectlCommand,

    /// Lookup used by `pin`
    finder: Arc<dyn ResourceFinder>,

    /// The shell's pin; the only writer
    store: ContextStore,

    /// Relay for child stdout
    out: NewlineEnsuringWriter<Stdout>,
}

impl Executor {
    /// Create a new executor
    ///
    /// # Arguments
    /// * `program` - kubectl executable
    /// * `catalog` - Command tree
    /// * `finder` - Resource lookup, already bounded in time
    ///
    /// # Returns
    /// * `Self` - Executor with nothing pinned
    pub fn new(
        program: impl Into<String>,
        catalog: Arc<Catalog>,
        finder: Arc<dyn ResourceFinder>,
    ) -> Self {
        Self {
            program: program.into(),
            root: KubectlCommand::root(catalog),
            finder,
            store: ContextStore::new(),
            out: NewlineEnsuringWriter::new(io::stdout()),
        }
    }

    /// Read-only view of the pin for the prompt and completer
    pub fn context(&self) -> ContextView {
        self.store.reader()
    }

    /// Execute one input line
    ///
    /// # Arguments
    /// * `line` - Raw line as typed
    ///
    /// # Returns
    /// * `Result<Flow>` - Whether to keep reading lines
    pub async fn execute_line(&mut self, line: &str) -> Result<Flow> {
        let args = tokenize(line)?;
        let Some(first) = args.first() else {
            return Ok(Flow::Continue);
        };

        let found = self
            .root
            .find(std::slice::from_ref(first))
            .map(|(command, _)| command);
        let command = match &found {
            Ok(command) => command.name().to_string(),
            Err(e) => {
                // kubectl reports unknown commands itself
                debug!("{}", e);
                first.clone()
            }
        };

        match command.as_str() {
            PIN_COMMAND => {
                let accepted = found.map(|c| c.accepted_flags()).unwrap_or_default();
                let printed = pin::pin(
                    &args[1..],
                    &accepted,
                    &mut self.store,
                    self.finder.as_ref(),
                )
                .await?;
                if let Some(text) = printed {
                    println!("{text}");
                }
                Ok(Flow::Continue)
            }
            EXIT_COMMAND => {
                println!("Bye!");
                Ok(Flow::Exit)
            }
            _ => {
                let args = self.with_context(args);
                self.run_kubectl(&command, &args).await?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Apply the current pin, keeping `args` as typed if that fails
    fn with_context(&self, args: Vec<String>) -> Vec<String> {
        let context = self.store.get();
        match apply_context(&context, &args, &self.root, self.root.catalog().as_ref()) {
            Ok(rewritten) => {
                if rewritten != args {
                    debug!("Pin applied: {}", rewritten.join(" "));
                }
                rewritten
            }
            Err(e) => {
                debug!("Pin not applied: {}", e);
                args
            }
        }
    }

    async fn run_kubectl(&mut self, command: &str, args: &[String]) -> Result<()> {
        let status = if needs_terminal(command, args) {
            process::run_attached(&self.program, args).await
        } else {
            let status = process::run_relayed(&self.program, args, &mut self.out).await;
            self.out.ensure_newline()?;
            status
        };
        process::check_status(status?)
    }

    /// Run kubectl once with the given arguments, no pin and no REPL
    ///
    /// # Returns
    /// * `Result<i32>` - The child's exit code
    pub async fn run_once(&self, args: &[String]) -> Result<i32> {
        let status = process::run_inherited(&self.program, args).await?;
        Ok(status.code().unwrap_or(1))
    }
}
