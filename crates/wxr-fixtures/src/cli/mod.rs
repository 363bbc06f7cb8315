//! Command-line support for `make-wxr`.
//!
//! This module turns arguments into an [`Invocation`] and runs it. The binary
//! delegates to these functions so the whole flow can be exercised in tests
//! without spawning a process.
//!
//! Any `--name=value`, `--name value` or `--name-with-hyphens` argument is an
//! option; names the generator does not know are kept and later ignored.
//! Only `--config` and `--output` are handled here directly.

mod error;

use std::io::{BufWriter, Write};
use std::iter::Peekable;

use camino::{Utf8Path, Utf8PathBuf};
use mockable::Clock;
use tracing::{debug, info};

pub use error::{CliError, RunError};

use crate::error::ConfigError;
use crate::options::{RawOptions, normalise_name};
use crate::settings::Settings;
use crate::{write_wxr, write_wxr_file};

const CONFIG_FLAG: &str = "--config";
const OUTPUT_FLAG: &str = "--output";
const FLAG_PREFIX: &str = "--";

/// A parsed `make-wxr` run.
#[derive(Debug, Clone)]
pub struct Invocation {
    options: RawOptions,
    config_path: Option<Utf8PathBuf>,
    output_path: Option<Utf8PathBuf>,
}

impl Invocation {
    /// Options given on the command line, before the config file is applied.
    #[must_use]
    pub const fn options(&self) -> &RawOptions {
        &self.options
    }

    /// Config file supplied with `--config`, if any.
    #[must_use]
    pub fn config_path(&self) -> Option<&Utf8Path> {
        self.config_path.as_deref()
    }

    /// Output file supplied with `--output`; stdout is used when absent.
    ///
    /// # Example
    ///
    /// ```
    /// use wxr_fixtures::cli::{ParseOutcome, parse_args};
    ///
    /// let args = vec!["--output=fixtures/export.xml".to_owned()];
    /// let ParseOutcome::Run(invocation) = parse_args(args.into_iter()).expect("parse") else {
    ///     panic!("expected a run");
    /// };
    ///
    /// assert_eq!(
    ///     invocation.output_path().map(|path| path.as_str()),
    ///     Some("fixtures/export.xml")
    /// );
    /// ```
    #[must_use]
    pub fn output_path(&self) -> Option<&Utf8Path> {
        self.output_path.as_deref()
    }

    /// Merges the config file (if any) under the command-line options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the config file cannot be read or parsed.
    pub fn resolve_options(&self) -> Result<RawOptions, ConfigError> {
        let file_layer = self
            .config_path()
            .map(RawOptions::from_file)
            .transpose()?
            .unwrap_or_default();
        Ok(file_layer.merge(self.options.clone()))
    }

    /// Resolves every option layer and checks the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the config file is unusable or any option
    /// fails its check.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        Settings::from_options(&self.resolve_options()?)
    }
}

/// Outcome of parsing command-line arguments.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// Show help output and exit successfully.
    Help,
    /// Show the version and exit successfully.
    Version,
    /// Generate a document.
    Run(Invocation),
}

/// Parses command-line arguments, excluding the program name.
///
/// # Errors
///
/// Returns [`CliError`] when `--config` or `--output` lacks a usable path.
///
/// # Example
///
/// ```
/// use wxr_fixtures::cli::{ParseOutcome, parse_args};
///
/// let args = ["--post-count=3", "--tag_count", "7", "--nest_comments"]
///     .map(str::to_owned);
/// let ParseOutcome::Run(invocation) = parse_args(args.into_iter()).expect("parse") else {
///     panic!("expected a run");
/// };
///
/// let options = invocation.options();
/// assert_eq!(options.get("post_count"), Some("3"));
/// assert_eq!(options.get("tag_count"), Some("7"));
/// assert_eq!(options.get("nest_comments"), Some("true"));
/// ```
pub fn parse_args<I>(args: I) -> Result<ParseOutcome, CliError>
where
    I: Iterator<Item = String>,
{
    let mut args = args.peekable();
    let mut options = RawOptions::new();
    let mut config_path: Option<Utf8PathBuf> = None;
    let mut output_path: Option<Utf8PathBuf> = None;

    while let Some(arg) = args.next() {
        if matches!(arg.as_str(), "-h" | "--help") {
            return Ok(ParseOutcome::Help);
        }
        if matches!(arg.as_str(), "-V" | "--version") {
            return Ok(ParseOutcome::Version);
        }
        let Some(body) = arg.strip_prefix(FLAG_PREFIX).filter(|body| !body.is_empty()) else {
            debug!(argument = %arg, "ignoring positional argument");
            continue;
        };
        let (name, inline) = match body.split_once('=') {
            Some((key, value)) => (normalise_name(key), Some(value.to_owned())),
            None => (normalise_name(body), None),
        };

        match name.as_str() {
            "config" => config_path = Some(path_value(&mut args, inline, CONFIG_FLAG)?),
            "output" => output_path = Some(path_value(&mut args, inline, OUTPUT_FLAG)?),
            _ => {
                let value = inline
                    .or_else(|| args.next_if(|next| !next.starts_with(FLAG_PREFIX)))
                    .unwrap_or_else(|| bare_value(&name).to_owned());
                options.set(&name, value);
            }
        }
    }

    Ok(ParseOutcome::Run(Invocation {
        options,
        config_path,
        output_path,
    }))
}

/// Generates the document described by `invocation`.
///
/// The document goes to `--output` when given, otherwise to `stdout`.
/// Options are checked before anything is written, so a rejected run
/// produces no output at all.
///
/// # Errors
///
/// Returns [`RunError`] when the options are rejected or the document cannot
/// be written.
pub fn run<W: Write>(
    invocation: &Invocation,
    clock: &dyn Clock,
    stdout: W,
) -> Result<(), RunError> {
    let settings = invocation.settings()?;

    match invocation.output_path() {
        Some(path) => {
            write_wxr_file(&settings, clock, path)?;
            info!(path = %path, "document written");
        }
        None => {
            write_wxr(&settings, clock, BufWriter::new(stdout))?;
        }
    }

    Ok(())
}

fn path_value<I>(
    args: &mut Peekable<I>,
    inline: Option<String>,
    flag: &'static str,
) -> Result<Utf8PathBuf, CliError>
where
    I: Iterator<Item = String>,
{
    let value = inline
        .or_else(|| args.next())
        .ok_or(CliError::MissingValue { flag })?;
    if value.trim().is_empty() {
        return Err(CliError::EmptyPath { flag });
    }
    Ok(Utf8PathBuf::from(value))
}

/// Value stored for an option given without one.
fn bare_value(name: &str) -> &'static str {
    if name == "nest_comments" { "true" } else { "" }
}
