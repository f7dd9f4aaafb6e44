//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Invalid public network name.
    #[error("Invalid public network name '{name}': {reason}")]
    InvalidNetworkName {
        /// The invalid name
        name: String,
        /// Reason for invalidity
        reason: &'static str,
    },

    /// Invalid hostname metadata key.
    #[error("Invalid hostname key: must not be empty")]
    EmptyHostnameKey,

    /// Invalid output format value.
    #[error("Invalid output format '{value}': expected text, json, or template")]
    InvalidOutputFormat {
        /// The invalid value provided
        value: String,
    },

    /// Invalid output template (Handlebars syntax error).
    #[error("Invalid output template: {reason}")]
    InvalidTemplate {
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The server record input path.
    pub const SERVER: &str = "server";
    /// The output template (required by the template format).
    pub const TEMPLATE: &str = "template";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
