//! Error types for portscout.
//!
//! Uses `thiserror` for ergonomic error definitions.

use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds of a single connection attempt.
///
/// A probe never returns these as `Err`; they travel inside a
/// [`ProbeResult`](crate::scanner::ProbeResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("connection timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("host could not be resolved: {0}")]
    HostUnresolvable(String),

    #[error("socket error: {0}")]
    Other(String),
}

impl ProbeError {
    /// Classify an I/O error from a connect attempt.
    pub fn from_io(err: &std::io::Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Other(err.to_string()),
        }
    }

    /// Whether this failure means "the port is not open" rather than a
    /// problem with the host or the socket.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Timeout | Self::ConnectionRefused)
    }
}

/// Fatal configuration errors. A scan never starts when one of these occurs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no valid ports specified")]
    NoPorts,

    #[error("no valid targets specified")]
    NoTargets,

    #[error("worker pool size must be at least 1")]
    InvalidWorkers,

    #[error("timeout must be greater than zero")]
    InvalidTimeout,

    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read config file {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid config format: {0}")]
    InvalidFormat(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error type for the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CliError {
    /// Process exit code for this error. Configuration errors get their own
    /// code so scripts can tell them apart from runtime failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
