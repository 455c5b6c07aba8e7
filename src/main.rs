//! kubesh - an interactive kubectl shell
//!
//! Wraps kubectl in a REPL with tab completion of commands, flags, resource
//! types and live resource names, plus a pin that fills the remembered
//! resource into later commands.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode
//! kubesh
//!
//! # Run a single kubectl command
//! kubesh get pods -n kube-system
//! ```

use std::sync::Arc;

use tracing::{Level, debug};

use kubesh::cli::CliInterface;
use kubesh::command::{Catalog, KubectlCommand};
use kubesh::error::{ExecutionError, KubeshError, Result};
use kubesh::executor::{Executor, Flow};
use kubesh::repl::{CompletionEngine, ReplEngine};
use kubesh::resource::{KubectlFinder, ResourceFinder, TimeoutFinder};

/// Application entry point
#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Run the given kubectl command once, or start the shell
///
/// # Returns
/// * `Result<i32>` - Process exit code
async fn run() -> Result<i32> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli);

    let catalog = Arc::new(Catalog::kubesh()?);
    let config = cli.config();

    let finder = KubectlFinder::new(
        config.kubectl.binary.clone(),
        config.kubectl.namespace.clone(),
        Arc::clone(&catalog),
    );
    let finder: Arc<dyn ResourceFinder> =
        Arc::new(TimeoutFinder::new(Arc::new(finder), config.lookup_timeout()));

    let mut executor = Executor::new(
        config.kubectl.binary.clone(),
        Arc::clone(&catalog),
        Arc::clone(&finder),
    );

    if !cli.is_interactive() {
        return executor.run_once(cli.kubectl_args()).await;
    }

    let engine = CompletionEngine::new(KubectlCommand::root(catalog), finder);
    let mut repl = ReplEngine::new(config, Arc::new(engine), executor.context())?;

    run_repl_loop(&mut repl, &mut executor).await?;
    Ok(0)
}

/// Main REPL loop
///
/// Every failure is reported and the loop prompts again; only `exit`,
/// Ctrl+D or a broken terminal end it.
async fn run_repl_loop(repl: &mut ReplEngine, executor: &mut Executor) -> Result<()> {
    while let Some(line) = repl.read_line()? {
        match executor.execute_line(&line).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            // kubectl has already explained itself on stderr
            Err(KubeshError::Execution(ExecutionError::ExitStatus(code))) => {
                debug!("kubectl exited with {:?}", code);
            }
            Err(e) => eprintln!("{}", e),
        }
    }
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = if cli.args().very_verbose {
        Level::TRACE
    } else if cli.args().verbose {
        Level::DEBUG
    } else {
        cli.config().logging.level.to_tracing_level()
    };

    // stderr keeps logs out of relayed kubectl output
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
