//! Error types for the wxr-fixtures crate.
//!
//! Configuration problems are collected before any output is produced, so
//! [`ConfigError::Invalid`] carries every failed option rather than the first
//! one. Once generation starts the only failures left are sink failures,
//! surfaced as [`WxrError`].

use std::fmt;

use camino::Utf8PathBuf;
use thiserror::Error;

/// A single option that failed its check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{option}: {message}")]
pub struct FieldError {
    /// Name of the option as written on the command line.
    pub option: &'static str,
    /// Human-readable description of the failure.
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(option: &'static str, message: impl Into<String>) -> Self {
        Self {
            option,
            message: message.into(),
        }
    }
}

/// Errors raised while assembling the run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or more options failed validation.
    #[error("unable to proceed: invalid options: {}", OptionNames(.failures))]
    Invalid {
        /// Every failed option, in validation order.
        failures: Vec<FieldError>,
    },

    /// The configuration file could not be read.
    #[error("failed to read config file at '{path}': {message}")]
    ConfigFileRead {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The configuration file is not valid JSON or holds unsupported values.
    #[error("invalid config file '{path}': {message}")]
    ConfigFileParse {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        message: String,
    },
}

struct OptionNames<'a>(&'a [FieldError]);

impl fmt::Display for OptionNames<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for failure in self.0 {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(failure.option)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors raised while writing the document.
#[derive(Debug, Error)]
pub enum WxrError {
    /// The output sink rejected a write.
    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),

    /// The output file could not be written atomically.
    #[error("failed to write output file at '{path}': {message}")]
    Output {
        /// Target path of the output file.
        path: Utf8PathBuf,
        /// Description of the failure.
        message: String,
    },
}
