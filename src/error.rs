//! Error types for cloud-archive

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cloud-archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cloud-archive
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors outside of the directory scan (config files, local store writes)
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The local tree could not be read (missing root, unreadable subdirectory,
    /// file vanished before it could be stat'ed)
    #[error("Scan error at {path}: {message}")]
    Scan { path: PathBuf, message: String },

    /// Listing the destination prefix failed
    #[error("Failed to list '{prefix}': {message}")]
    StoreList { prefix: String, message: String },

    /// A single upload failed
    #[error("Failed to upload '{key}': {message}")]
    StoreUpload { key: String, message: String },

    /// The store cannot authenticate
    #[error("Credentials error: {message}")]
    Credentials { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid URI format
    #[error("Invalid URI: {uri} - {reason}")]
    InvalidUri { uri: String, reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a scan error for the given path
    pub fn scan(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Scan {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a listing error
    pub fn store_list(prefix: impl Into<String>, message: impl ToString) -> Self {
        Self::StoreList {
            prefix: prefix.into(),
            message: message.to_string(),
        }
    }

    /// Create an upload error
    pub fn store_upload(key: impl Into<String>, message: impl ToString) -> Self {
        Self::StoreUpload {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a credentials error
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error aborts a whole sync run.
    ///
    /// Only a failed upload is tolerated; the run records it and moves on.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::StoreUpload { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}
