//! Error types
//!
//! Defines the error taxonomy shared by the scanner, the storage root and the
//! storage service.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Storage module errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Bad caller input: missing source path, not a directory, no matches,
    /// or an item name that would leave the storage root.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Root lifecycle misuse or a failure to create/remove the root.
    #[error("Initialization error: {message}")]
    Initialization {
        message: String,
        #[source]
        source: Option<io::Error>,
    },

    /// I/O failure in the middle of a save. Items copied before the failure
    /// stay in the root.
    #[error(
        "Failed to store {}: {copied} of {total} files copied before failure: {source}",
        .file.display()
    )]
    Copy {
        file: PathBuf,
        copied: usize,
        total: usize,
        #[source]
        source: io::Error,
    },

    /// Enumeration failure.
    #[error("Read error: {message}: {source}")]
    Read {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Resolve target absent or unreadable.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl StorageError {
    pub fn validation(message: impl Into<String>) -> Self {
        StorageError::Validation(message.into())
    }

    pub fn initialization(message: impl Into<String>) -> Self {
        StorageError::Initialization {
            message: message.into(),
            source: None,
        }
    }

    pub fn initialization_io(message: impl Into<String>, source: io::Error) -> Self {
        StorageError::Initialization {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn read(message: impl Into<String>, source: io::Error) -> Self {
        StorageError::Read {
            message: message.into(),
            source,
        }
    }

    /// `NotFound` with the canonical "could not read file" message.
    pub fn not_found(name: &str) -> Self {
        StorageError::NotFound(format!("could not read file {name}"))
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
