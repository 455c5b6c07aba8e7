use std::time::Duration;
use std::{fmt, io};

/// Crate-wide `Result` type using [`KubeshError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, KubeshError>;

/// Top-level error type for kubesh operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum KubeshError {
    /// Input line could not be split into words.
    Parse(ParseError),

    /// Command tree resolution errors.
    Command(CommandError),

    /// Resource lookup errors.
    Lookup(LookupError),

    /// Command execution errors.
    Execution(ExecutionError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Tokenizer errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line ended inside an open quote.
    ///
    /// `tokens` holds the complete words read before the open quote.
    UnterminatedQuote { tokens: Vec<String> },
}

/// Errors raised while resolving words against the command tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The first word is not a known subcommand of the root.
    UnknownCommand { command: String, root: String },

    /// The embedded command catalog could not be read.
    InvalidCatalog(String),
}

/// Errors raised by a resource finder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The lookup did not finish within the allotted time.
    TimedOut(Duration),

    /// No resource type was given.
    MissingType,

    /// The lookup task died before producing a result.
    Aborted(String),

    /// The remote store rejected the query.
    Failed(String),

    /// The remote store answered with something we could not decode.
    InvalidResponse(String),
}

/// Command execution errors.
#[derive(Debug)]
pub enum ExecutionError {
    /// The child process could not be started.
    SpawnFailed { program: String, source: io::Error },

    /// The child exited unsuccessfully.
    ExitStatus(Option<i32>),

    /// Internal command invoked with bad arguments.
    Usage(String),

    /// Nothing matched the requested pin.
    NotFound(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    ReadFailed { path: String, source: io::Error },

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for KubeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KubeshError::Parse(e) => write!(f, "{e}"),
            KubeshError::Command(e) => write!(f, "{e}"),
            KubeshError::Lookup(e) => write!(f, "{e}"),
            KubeshError::Execution(e) => write!(f, "{e}"),
            KubeshError::Config(e) => write!(f, "Configuration error: {e}"),
            KubeshError::Io(e) => write!(f, "I/O error: {e}"),
            KubeshError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnterminatedQuote { .. } => {
                write!(f, "Unexpected end of input; did you forget to close a quote?")
            }
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand { command, root } => {
                write!(f, "unknown command \"{command}\" for \"{root}\"")
            }
            CommandError::InvalidCatalog(msg) => write!(f, "Invalid command catalog: {msg}"),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::TimedOut(after) => write!(
                f,
                "Timed out connecting to the Kubernetes API (after {}ms)",
                after.as_millis()
            ),
            LookupError::MissingType => write!(f, "A resource type is required"),
            LookupError::Aborted(msg) => write!(f, "Resource lookup aborted: {msg}"),
            LookupError::Failed(msg) => write!(f, "{msg}"),
            LookupError::InvalidResponse(msg) => {
                write!(f, "Unreadable response from the Kubernetes API: {msg}")
            }
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::SpawnFailed { program, source } => {
                write!(f, "Failed to run {program}: {source}")
            }
            ExecutionError::ExitStatus(Some(code)) => write!(f, "Command exited with status {code}"),
            ExecutionError::ExitStatus(None) => write!(f, "Command terminated by signal"),
            ExecutionError::Usage(usage) => write!(f, "Usage: {usage}"),
            ExecutionError::NotFound(what) => write!(f, "No resources found for {what}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFailed { path, source } => {
                write!(f, "Cannot read config file {path}: {source}")
            }
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for KubeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KubeshError::Io(e) => Some(e),
            KubeshError::Execution(ExecutionError::SpawnFailed { source, .. }) => Some(source),
            _ => None,
        }
    }
}
impl std::error::Error for ParseError {}
impl std::error::Error for CommandError {}
impl std::error::Error for LookupError {}
impl std::error::Error for ExecutionError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to KubeshError ========================= */

impl From<io::Error> for KubeshError {
    fn from(err: io::Error) -> Self {
        KubeshError::Io(err)
    }
}

impl From<ParseError> for KubeshError {
    fn from(err: ParseError) -> Self {
        KubeshError::Parse(err)
    }
}

impl From<CommandError> for KubeshError {
    fn from(err: CommandError) -> Self {
        KubeshError::Command(err)
    }
}

impl From<LookupError> for KubeshError {
    fn from(err: LookupError) -> Self {
        KubeshError::Lookup(err)
    }
}

impl From<ExecutionError> for KubeshError {
    fn from(err: ExecutionError) -> Self {
        KubeshError::Execution(err)
    }
}

impl From<ConfigError> for KubeshError {
    fn from(err: ConfigError) -> Self {
        KubeshError::Config(err)
    }
}

impl From<String> for KubeshError {
    fn from(msg: String) -> Self {
        KubeshError::Generic(msg)
    }
}

impl From<&str> for KubeshError {
    fn from(msg: &str) -> Self {
        KubeshError::Generic(msg.to_owned())
    }
}

impl From<reedline::ReedlineError> for KubeshError {
    fn from(err: reedline::ReedlineError) -> Self {
        KubeshError::Generic(format!("Line editor error: {err}"))
    }
}
