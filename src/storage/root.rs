//! Storage root management
//!
//! Owns the managed storage directory and its create/delete lifecycle.

use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, StorageError};

/// Default storage location, relative to the working directory.
pub const DEFAULT_LOCATION: &str = "upload-dir";

/// The single directory holding stored items.
#[derive(Debug, Clone)]
pub struct StorageRoot {
    path: PathBuf,
}

impl StorageRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Setting server storage path: {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the storage directory. Fails if it already exists or if its
    /// parent is missing.
    pub fn initialize(&self) -> Result<()> {
        match fs::create_dir(&self.path) {
            Ok(()) => {
                info!("Initialized storage root {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StorageError::initialization_io(
                format!("storage root {} already exists", self.path.display()),
                e,
            )),
            Err(e) => Err(StorageError::initialization_io(
                format!("could not initialize storage at {}", self.path.display()),
                e,
            )),
        }
    }

    /// Recursively deletes the storage directory. A missing root counts as
    /// already clean.
    pub fn reset(&self) -> Result<()> {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                info!("Removed storage root {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Storage root {} already absent", self.path.display());
                Ok(())
            }
            Err(e) => Err(StorageError::initialization_io(
                format!("could not remove storage at {}", self.path.display()),
                e,
            )),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.path.is_dir()
    }

    /// Fails with `Initialization` unless the root currently exists.
    pub fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(StorageError::initialization(format!(
                "storage root {} is not initialized",
                self.path.display()
            )))
        }
    }
}

impl Default for StorageRoot {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION)
    }
}
