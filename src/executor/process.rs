//! Child process execution for kubectl commands
//!
//! Two modes:
//! - relayed: stdout is piped back through the shell's writer, stdin and
//!   stderr are inherited
//! - attached: the child owns the terminal; while it runs one Ctrl+C is
//!   forwarded to it instead of reaching the shell

use std::io::Write;
use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::newline::NewlineEnsuringWriter;
use crate::error::{ExecutionError, Result};

/// Commands that always need the terminal
const ATTACHED_COMMANDS: &[&str] = &["attach", "proxy", "edit"];

/// Commands that need the terminal when run interactively
const INTERACTIVE_COMMANDS: &[&str] = &["exec", "run", "debug"];

/// Whether `command` must run attached to the terminal
///
/// # Arguments
/// * `command` - Name of the resolved command
/// * `args` - Full argument list of the line
pub fn needs_terminal(command: &str, args: &[String]) -> bool {
    if ATTACHED_COMMANDS.contains(&command) {
        return true;
    }
    INTERACTIVE_COMMANDS.contains(&command) && wants_stdin_or_tty(args)
}

/// True if `-i`, `-t`, `--stdin` or `--tty` appear before `--`
fn wants_stdin_or_tty(args: &[String]) -> bool {
    for arg in args {
        if arg == "--" {
            break;
        }
        if let Some(long) = arg.strip_prefix("--") {
            let (name, value) = long.split_once('=').unwrap_or((long, "true"));
            if matches!(name, "stdin" | "tty") && value != "false" {
                return true;
            }
        } else if let Some(cluster) = arg.strip_prefix('-') {
            // any value-taking shorthand ends the cluster, so -i/-t lead it
            if cluster.starts_with(['i', 't']) {
                return true;
            }
        }
    }
    false
}

fn spawn(program: &str, args: &[String], stdout: Stdio) -> Result<Child> {
    debug!("Running {} {}", program, args.join(" "));
    Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(stdout)
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| {
            ExecutionError::SpawnFailed {
                program: program.to_string(),
                source,
            }
            .into()
        })
}

/// Run a child with its stdout relayed through `out`
///
/// # Arguments
/// * `program` - kubectl executable
/// * `args` - Arguments after the program name
/// * `out` - Writer receiving the child's stdout
///
/// # Returns
/// * `Result<ExitStatus>` - Exit status once the child is done
pub async fn run_relayed<W: Write>(
    program: &str,
    args: &[String],
    out: &mut NewlineEnsuringWriter<W>,
) -> Result<ExitStatus> {
    let mut child = spawn(program, args, Stdio::piped())?;

    // the terminal sends Ctrl+C to the whole foreground group, so the child
    // already gets it; the shell only has to survive it
    let token = CancellationToken::new();
    let listener = listen_for_interrupt(None, token.clone());

    let relayed = relay(&mut child, out).await;
    let status = child.wait().await;

    token.cancel();
    let _ = listener.await;

    relayed?;
    Ok(status?)
}

async fn relay<W: Write>(child: &mut Child, out: &mut NewlineEnsuringWriter<W>) -> Result<()> {
    let Some(mut stdout) = child.stdout.take() else {
        return Ok(());
    };

    let mut buf = [0u8; 8192];
    loop {
        let n = stdout.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        out.flush()?;
    }
    Ok(())
}

/// Run a child that owns the terminal
///
/// # Arguments
/// * `program` - kubectl executable
/// * `args` - Arguments after the program name
///
/// # Returns
/// * `Result<ExitStatus>` - Exit status once the child is done
pub async fn run_attached(program: &str, args: &[String]) -> Result<ExitStatus> {
    let mut child = spawn(program, args, Stdio::inherit())?;

    let token = CancellationToken::new();
    let listener = listen_for_interrupt(child.id(), token.clone());

    let status = child.wait().await;

    token.cancel();
    let _ = listener.await;

    Ok(status?)
}

/// Run a child with every stream inherited, for one-shot use
pub async fn run_inherited(program: &str, args: &[String]) -> Result<ExitStatus> {
    let mut child = spawn(program, args, Stdio::inherit())?;
    Ok(child.wait().await?)
}

/// Catch one Ctrl+C until `token` is cancelled
///
/// With a `pid`, the interrupt is passed on to that process.
fn listen_for_interrupt(pid: Option<u32>, token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            result = tokio::signal::ctrl_c() => match result {
                Ok(()) => {
                    println!();
                    if let Some(pid) = pid {
                        interrupt(pid);
                    }
                }
                Err(e) => debug!("Failed to listen for Ctrl+C: {}", e),
            },
        }
    })
}

#[cfg(unix)]
fn interrupt(pid: u32) {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = signal::kill(Pid::from_raw(raw), Signal::SIGINT) {
        debug!("Failed to interrupt process {}: {}", pid, e);
    }
}

// the console delivers Ctrl+C to every attached process
#[cfg(not(unix))]
fn interrupt(_pid: u32) {}

/// Turn an unsuccessful exit into an error
pub fn check_status(status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(ExecutionError::ExitStatus(status.code()).into())
    }
}
