//! Server record providers and error types.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::{InterfaceRecord, ServerRecord};

/// Error type for loading server and interface records.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read an input file.
    #[error("Failed to read '{}': {source}", path.display())]
    FileRead {
        /// Path to the input file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid JSON of the expected shape.
    #[error("Failed to parse '{}': {source}", path.display())]
    Parse {
        /// Path to the input file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Trait for obtaining the records the address pipeline consumes.
///
/// # Design
///
/// - The compute API client, authentication and retries live behind this trait
/// - Enables dependency injection for testing with in-memory implementations
///
/// # Example
///
/// ```
/// use node_addrs::server::{InterfaceRecord, ServerRecord, ServerSource, SourceError};
///
/// struct Fixed(ServerRecord);
///
/// impl ServerSource for Fixed {
///     fn server(&self) -> Result<ServerRecord, SourceError> {
///         Ok(self.0.clone())
///     }
///
///     fn interfaces(&self) -> Result<Vec<InterfaceRecord>, SourceError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let source = Fixed(ServerRecord::default());
/// assert!(source.interfaces().unwrap().is_empty());
/// ```
pub trait ServerSource {
    /// Returns the server record.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the record cannot be obtained or decoded.
    fn server(&self) -> Result<ServerRecord, SourceError>;

    /// Returns the attached interfaces, in provider order.
    ///
    /// An empty list is a valid answer and means "no interface evidence".
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the list cannot be obtained or decoded.
    fn interfaces(&self) -> Result<Vec<InterfaceRecord>, SourceError>;
}

/// Key wrapping the record in the server details response body.
const SERVER_KEY: &str = "server";

/// Key wrapping the list in the interface attachments response body.
const INTERFACES_KEY: &str = "interfaceAttachments";

/// Reads records from JSON files saved from the compute API.
///
/// Both the raw response bodies and the unwrapped records are accepted.
/// Without an interfaces file the interface list is empty.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    server_path: PathBuf,
    interfaces_path: Option<PathBuf>,
}

impl JsonFileSource {
    /// Creates a source reading the server record from `server_path`.
    #[must_use]
    pub fn new(server_path: impl Into<PathBuf>) -> Self {
        Self {
            server_path: server_path.into(),
            interfaces_path: None,
        }
    }

    /// Sets the file holding the attached interface list.
    #[must_use]
    pub fn with_interfaces(mut self, path: impl Into<PathBuf>) -> Self {
        self.interfaces_path = Some(path.into());
        self
    }

    /// Returns the server record path.
    #[must_use]
    pub fn server_path(&self) -> &Path {
        &self.server_path
    }

    /// Returns the interface list path, if any.
    #[must_use]
    pub fn interfaces_path(&self) -> Option<&Path> {
        self.interfaces_path.as_deref()
    }
}

impl ServerSource for JsonFileSource {
    fn server(&self) -> Result<ServerRecord, SourceError> {
        let document = read_json(&self.server_path)?;
        decode(&self.server_path, unwrap_document(document, SERVER_KEY))
    }

    fn interfaces(&self) -> Result<Vec<InterfaceRecord>, SourceError> {
        let Some(path) = &self.interfaces_path else {
            return Ok(Vec::new());
        };

        let document = read_json(path)?;
        decode(path, unwrap_document(document, INTERFACES_KEY))
    }
}

/// Returns the value under `key` for a wrapped response body, else the document itself.
///
/// The variant is chosen by the presence of `key` alone, so a wrapped body
/// with a bad field is a decode error rather than an empty bare record.
fn unwrap_document(document: Value, key: &str) -> Value {
    match document {
        Value::Object(mut fields) => match fields.remove(key) {
            Some(inner) => inner,
            None => Value::Object(fields),
        },
        other => other,
    }
}

fn read_json(path: &Path) -> Result<Value, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|e| SourceError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| SourceError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn decode<T: DeserializeOwned>(path: &Path, value: Value) -> Result<T, SourceError> {
    serde_json::from_value(value).map_err(|e| SourceError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
