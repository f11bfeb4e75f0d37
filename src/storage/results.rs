//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// Result of a save operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub source: PathBuf,
    /// Distinct base names written to the root, sorted.
    pub stored: Vec<String>,
    /// Number of copies performed. Exceeds `stored.len()` when the source
    /// holds several files with the same base name.
    pub copied: usize,
}

impl SaveReport {
    /// Number of distinct items written.
    pub fn len(&self) -> usize {
        self.stored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }
}

/// Readable handle on a stored item
#[derive(Debug, Clone)]
pub struct StoredResource {
    name: String,
    path: PathBuf,
}

impl StoredResource {
    pub(crate) fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn is_readable(&self) -> bool {
        File::open(&self.path).is_ok()
    }

    pub fn len(&self) -> io::Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    pub fn open(&self) -> io::Result<File> {
        File::open(&self.path)
    }

    pub fn read_bytes(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    /// `file://` URI of the underlying file.
    pub fn uri(&self) -> io::Result<Url> {
        let absolute = self.path.canonicalize()?;
        Url::from_file_path(&absolute).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot build a file URI for {}", absolute.display()),
            )
        })
    }
}
