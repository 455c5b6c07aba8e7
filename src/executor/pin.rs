//! The `pin` built-in

use tracing::info;

use crate::command::flags::{self, Flag};
use crate::context::{Context, ContextStore};
use crate::error::{ExecutionError, Result};
use crate::resource::ResourceFinder;

const PIN_USAGE: &str = "pin [-c|--clear] [TYPE [NAME]]";

const PIN_HELP: &str = "\
Pin resources for use in subsequent commands.

Pinning causes the shell to remember the given resource and/or resource type,
and apply it to commands as appropriate, allowing you to leave the resource
type and/or name out of other command invocations. The current pin will be
shown in the prompt.

Examples:
  # pin the pods type
  pin pods

  # pin a single pod
  pin pod nginx-1234-asdf

  # clear the current pin
  pin -c

Usage:
  pin [-c|--clear] [TYPE [NAME]]

Flags:
  -c, --clear: Clears pinned resource
  -h, --help: help for pin";

enum PinRequest {
    Clear,
    Help,
    Show,
    Set(Vec<String>),
}

/// Split `pin` arguments
///
/// Flags the shell accepts anywhere (`--namespace dev` and friends) are
/// skipped along with their values; anything undeclared is a usage error.
fn parse(args: &[String], accepted: &[Flag]) -> Result<PinRequest> {
    let positions = flags::non_flag_positions(args, accepted);
    let mut clear = false;

    for (i, arg) in args.iter().enumerate() {
        if positions.contains(&i) {
            continue;
        }
        match arg.as_str() {
            "--" => {}
            "-c" | "--clear" => clear = true,
            "-h" | "--help" => return Ok(PinRequest::Help),
            flag if flag.starts_with('-') && !flags::is_declared(flag, accepted) => {
                return Err(ExecutionError::Usage(format!(
                    "{PIN_USAGE} (unknown flag {flag})"
                ))
                .into());
            }
            // value of the previous flag
            _ => {}
        }
    }
    let positionals: Vec<String> = positions.into_iter().map(|i| args[i].clone()).collect();

    if clear {
        return Ok(PinRequest::Clear);
    }
    match positionals.len() {
        0 => Ok(PinRequest::Show),
        1 | 2 => Ok(PinRequest::Set(positionals)),
        _ => Err(ExecutionError::Usage(PIN_USAGE.to_string()).into()),
    }
}

/// Run `pin` with the words following the command name
///
/// # Arguments
/// * `args` - Flags and locator words
/// * `accepted` - Every flag the `pin` node accepts, inherited ones included
/// * `store` - The shell's pin
/// * `finder` - Lookup used to confirm the locator exists
///
/// # Returns
/// * `Result<Option<String>>` - Text to print, if any; the store is left
///   untouched on every error
pub async fn pin(
    args: &[String],
    accepted: &[Flag],
    store: &mut ContextStore,
    finder: &dyn ResourceFinder,
) -> Result<Option<String>> {
    match parse(args, accepted)? {
        PinRequest::Help => Ok(Some(PIN_HELP.to_string())),
        PinRequest::Clear => {
            store.clear();
            info!("Pin cleared");
            Ok(None)
        }
        PinRequest::Show => {
            let current = store.get();
            if current.is_empty() {
                Ok(Some("Nothing pinned".to_string()))
            } else {
                Ok(Some(format!("Pinned to {current}")))
            }
        }
        PinRequest::Set(locator) => {
            let found = finder.lookup(&locator).await?;
            let Some(first) = found.into_iter().next() else {
                return Err(ExecutionError::NotFound(locator.join(" ")).into());
            };

            let context = if locator.len() == 1 {
                Context::Type(first.resource_type)
            } else {
                Context::Resource {
                    resource_type: first.resource_type,
                    name: first.name,
                }
            };
            info!("Pinned to {}", context);
            store.set(context);
            Ok(None)
        }
    }
}
