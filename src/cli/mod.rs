//! Command-line interface for kubesh
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Mode selection (interactive REPL vs one-shot kubectl)
//!
//! kubesh's own options come first; the first word clap does not recognize
//! starts the kubectl arguments, which are passed through untouched.

use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

use crate::config::Config;
use crate::error::Result;

/// kubesh - an interactive kubectl shell
#[derive(Parser, Debug)]
#[command(
    name = "kubesh",
    version,
    about = "Interactive kubectl shell",
    long_about = "An interactive shell around kubectl with tab completion of commands, flags,
resource types and resource names, and a pin that remembers the resource you
are working on. With arguments, runs them once as a kubectl command.",
    after_help = "Examples:\n  kubesh                 start the shell\n  kubesh get pods -A     run `kubectl get pods -A` and exit"
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// kubectl executable to run
    #[arg(long, value_name = "PATH")]
    pub kubectl: Option<String>,

    /// Timeout for resource lookups in milliseconds
    #[arg(long, value_name = "MS")]
    pub lookup_timeout: Option<u64>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Verbose mode (detailed logging)
    #[arg(long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// kubectl command to run once instead of starting the shell
    #[arg(
        value_name = "KUBECTL-ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub kubectl_args: Vec<String>,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already-parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            warn!("Configuration validation failed: {}; using defaults", e);
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);
        Ok(config)
    }

    /// Apply command-line overrides
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        if let Some(kubectl) = &args.kubectl {
            config.kubectl.binary = kubectl.clone();
        }
        if let Some(timeout) = args.lookup_timeout.filter(|ms| *ms > 0) {
            config.kubectl.lookup_timeout_ms = timeout;
        }
        if args.no_color {
            config.display.color_output = false;
        }
    }

    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// True when no kubectl arguments were given
    pub fn is_interactive(&self) -> bool {
        self.args.kubectl_args.is_empty()
    }

    /// Arguments for one-shot execution
    pub fn kubectl_args(&self) -> &[String] {
        &self.args.kubectl_args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("kubesh").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_args_is_interactive() {
        let cli = CliInterface::from_args(parse(&["--config", "/nonexistent/kubesh.toml"])).unwrap();
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_kubectl_args_pass_through() {
        let args = parse(&["get", "pods", "-n", "kube-system", "--verbose"]);
        assert_eq!(args.kubectl_args, vec!["get", "pods", "-n", "kube-system", "--verbose"]);
        assert!(!args.verbose);
    }

    #[test]
    fn test_options_before_kubectl_args() {
        let args = parse(&["--no-color", "--kubectl", "/opt/kubectl", "version", "--client"]);
        assert!(args.no_color);
        assert_eq!(args.kubectl.as_deref(), Some("/opt/kubectl"));
        assert_eq!(args.kubectl_args, vec!["version", "--client"]);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = CliInterface::from_args(parse(&[
            "--config",
            "/nonexistent/kubesh.toml",
            "--kubectl",
            "kc",
            "--lookup-timeout",
            "250",
            "--no-color",
        ]))
        .unwrap();

        assert_eq!(cli.config().kubectl.binary, "kc");
        assert_eq!(cli.config().kubectl.lookup_timeout_ms, 250);
        assert!(!cli.config().display.color_output);
    }
}
