//! Error types
//!
//! Defines the error kinds raised by the storage layer and during server startup.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Storage layer errors
///
/// Every filesystem failure is converted into one of these four kinds at the
/// point of the call; `io::Error` never leaves the storage modules.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The client path resolves outside the storage root.
    #[error("path escapes the storage root: {0}")]
    PathTraversal(String),

    /// A user-supplied name or path is empty or malformed.
    #[error("{0}")]
    Validation(String),

    /// The operation target does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operating system refused the operation.
    #[error("{0}")]
    Operational(String),
}

impl StorageError {
    /// Convert an I/O failure on `path` into a storage error.
    ///
    /// A missing file becomes `NotFound`; anything else keeps the OS message.
    pub fn from_io(client_path: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(display_client_path(client_path)),
            _ => StorageError::Operational(err.to_string()),
        }
    }

    /// Whether this error is a containment violation.
    pub fn is_traversal(&self) -> bool {
        matches!(self, StorageError::PathTraversal(_))
    }
}

/// Render a client path for messages; the root is shown as `/`.
pub fn display_client_path(client_path: &str) -> String {
    format!("/{}", client_path.trim_start_matches('/'))
}

/// Errors raised while starting the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("cannot prepare storage root {path}: {source}")]
    Root {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl ServerError {
    pub fn root(path: &Path, source: io::Error) -> Self {
        ServerError::Root {
            path: path.display().to_string(),
            source,
        }
    }
}
