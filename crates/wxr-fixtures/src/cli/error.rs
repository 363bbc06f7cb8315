//! Error types for the `make-wxr` command line.

use thiserror::Error;

use crate::error::{ConfigError, WxrError};

/// Errors raised while parsing command-line arguments.
///
/// Unknown flags are not errors; they are ignored so scripts written against
/// other generators keep working.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// A path flag was the last argument and had no value.
    #[error("missing value for {flag}")]
    MissingValue {
        /// Flag that was missing its value.
        flag: &'static str,
    },
    /// A path flag was given an empty value.
    #[error("empty path for {flag}")]
    EmptyPath {
        /// Flag associated with the empty path.
        flag: &'static str,
    },
}

/// Everything that can stop a `make-wxr` run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The arguments could not be parsed.
    #[error(transparent)]
    Cli(#[from] CliError),
    /// The options or config file were rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The document could not be written.
    #[error(transparent)]
    Wxr(#[from] WxrError),
}
