//! Raw option layers.
//!
//! Options arrive as untyped strings from two places: an optional JSON config
//! file and the command line. Both are collected into [`RawOptions`] and
//! merged, command line last, before [`Settings`](crate::Settings) checks
//! them. Names are normalised so `post-count` and `post_count` are the same
//! option.

use std::collections::BTreeMap;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;

use crate::error::ConfigError;

/// Unvalidated option values keyed by normalised option name.
///
/// # Example
///
/// ```
/// use wxr_fixtures::RawOptions;
///
/// let file = RawOptions::from_json(r#"{"post_count": 4, "site_title": "Demo"}"#)
///     .expect("valid json");
/// let cli: RawOptions = [("post-count", "9")].into_iter().collect();
///
/// let merged = file.merge(cli);
/// assert_eq!(merged.get("post_count"), Some("9"));
/// assert_eq!(merged.get("site_title"), Some("Demo"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOptions {
    values: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl ConfigValue {
    fn into_raw(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
            Self::Flag(flag) => flag.to_string(),
        }
    }
}

impl RawOptions {
    /// Creates an empty option layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, replacing any earlier value for the same option.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(normalise_name(name), value.into());
    }

    /// Returns the raw value for an option.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&normalise_name(name)).map(String::as_str)
    }

    /// Iterates over the option names present in this layer.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of options present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no option is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Layers `overrides` on top of `self`; values in `overrides` win.
    #[must_use]
    pub fn merge(mut self, overrides: Self) -> Self {
        self.values.extend(overrides.values);
        self
    }

    /// Parses a flat JSON object of option values.
    ///
    /// Strings, numbers and booleans are accepted and kept in their textual
    /// form; checking them is left to [`Settings`](crate::Settings).
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the input is not a JSON object or a
    /// value is an array, object or `null`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, ConfigValue> = serde_json::from_str(json)?;
        Ok(raw
            .into_iter()
            .map(|(name, value)| (name, value.into_raw()))
            .collect())
    }

    /// Loads an option layer from a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigFileRead`] when the file cannot be read and
    /// [`ConfigError::ConfigFileParse`] when its contents are not a flat JSON
    /// object.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_error = |message: String| ConfigError::ConfigFileRead {
            path: path.to_path_buf(),
            message,
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| read_error("config path must be a file".to_owned()))?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));

        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| read_error(err.to_string()))?;
        let contents = dir
            .read_to_string(file_name)
            .map_err(|err| read_error(err.to_string()))?;

        Self::from_json(&contents).map_err(|err| ConfigError::ConfigFileParse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

impl<K, V> FromIterator<(K, V)> for RawOptions
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (name, value) in iter {
            options.set(name.as_ref(), value);
        }
        options
    }
}

/// Swaps hyphens for underscores so both command line spellings reach the
/// same option.
pub(crate) fn normalise_name(name: &str) -> String {
    name.replace('-', "_")
}
