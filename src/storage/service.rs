//! Storage service
//!
//! Ingests matching files from a source directory into the storage root,
//! lists what has been stored and resolves stored names to readable resources.
//!
//! `save` and `reset` are serialized by a root-scoped lock. `list` and
//! `resolve` take no lock and read the filesystem on every call, so a read
//! running next to a save or reset may see a partially updated root.

use log::{debug, error, info};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};
use crate::storage::results::{SaveReport, StoredResource};
use crate::storage::root::StorageRoot;
use crate::storage::scanner::DirectoryScanner;
use crate::storage::validation::{ensure_within_root, validate_item_name};

/// Storage service bound to one storage root.
#[derive(Debug)]
pub struct StorageService {
    root: StorageRoot,
    scanner: DirectoryScanner,
    write_lock: Mutex<()>,
}

impl StorageService {
    pub fn new(root: StorageRoot, scanner: DirectoryScanner) -> Self {
        Self {
            root,
            scanner,
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let scanner = DirectoryScanner::new(config.extensions.iter().cloned())?;
        Ok(Self::new(StorageRoot::new(&config.location), scanner))
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn extensions(&self) -> &[String] {
        self.scanner.extensions()
    }

    fn lock_writers(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the storage root.
    pub fn initialize(&self) -> Result<()> {
        let _guard = self.lock_writers();
        self.root.initialize()
    }

    /// Deletes the storage root and everything in it.
    pub fn reset(&self) -> Result<()> {
        let _guard = self.lock_writers();
        self.root.reset()
    }

    /// Start-up sequence: wipe whatever a previous run left, then create a
    /// fresh root.
    pub fn bootstrap(&self) -> Result<()> {
        info!("Initializing server storage at {}", self.root().display());
        let _guard = self.lock_writers();
        self.root.reset()?;
        self.root.initialize()
    }

    /// Copies every matching file under `source` into the root, keyed by base
    /// name and overwriting existing items. The root itself is never scanned,
    /// even when `source` contains it.
    ///
    /// The batch is not atomic. On a copy failure the files copied so far stay
    /// in the root and the returned `Copy` error reports how many there were.
    pub fn save(&self, source: &str) -> Result<SaveReport> {
        if source.trim().is_empty() {
            return Err(StorageError::validation("source path required"));
        }

        let _guard = self.lock_writers();
        self.root.ensure_ready()?;

        let root_canonical = self.root.path().canonicalize().map_err(|e| {
            StorageError::initialization_io(
                format!("storage root {} is not accessible", self.root().display()),
                e,
            )
        })?;

        let source_dir = PathBuf::from(source);
        let matches = self.scanner.find_excluding(&source_dir, &root_canonical)?;

        if matches.is_empty() {
            error!("No matching files in {}", source_dir.display());
            return Err(StorageError::validation("no files provided"));
        }

        let batch = matches
            .into_iter()
            .map(|file| match file.file_name() {
                Some(name) => Ok((name.to_os_string(), file)),
                None => Err(StorageError::validation(format!(
                    "{} has no file name",
                    file.display()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        let total = batch.len();
        let mut stored = BTreeSet::new();

        for (copied, (name, file)) in batch.into_iter().enumerate() {
            let destination = self.root.path().join(&name);

            if let Err(e) = fs::copy(&file, &destination) {
                error!(
                    "Failed to store {} after {} of {} files: {}",
                    file.display(),
                    copied,
                    total,
                    e
                );
                return Err(StorageError::Copy {
                    file,
                    copied,
                    total,
                    source: e,
                });
            }

            stored.insert(name.to_string_lossy().to_string());
        }

        info!(
            "Copied {} files ({} distinct) from {} into {}",
            total,
            stored.len(),
            source_dir.display(),
            self.root().display()
        );

        Ok(SaveReport {
            source: source_dir,
            stored: stored.into_iter().collect(),
            copied: total,
        })
    }

    /// Names of the entries directly under the root, sorted lexicographically.
    pub fn list(&self) -> Result<Vec<String>> {
        self.root.ensure_ready()?;

        let entries = fs::read_dir(self.root.path()).map_err(|e| {
            error!("Failed to read stored files: {}", e);
            StorageError::read("failed to read stored files", e)
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                error!("Failed to read stored files: {}", e);
                StorageError::read("failed to read stored files", e)
            })?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();

        debug!("Listed {} stored items", names.len());
        Ok(names)
    }

    /// Maps a stored item name to a readable resource.
    ///
    /// Names that are not a single plain file name, or that reach a file
    /// outside the root through a symbolic link, fail with `Validation`.
    pub fn resolve(&self, name: &str) -> Result<StoredResource> {
        self.root.ensure_ready()?;
        validate_item_name(name)?;

        let candidate = self.root.path().join(name);
        if !candidate.exists() {
            debug!("Stored item {} not found", name);
            return Err(StorageError::not_found(name));
        }

        ensure_within_root(self.root.path(), &candidate, name)?;

        let resource = StoredResource::new(name, candidate);
        if !resource.exists() || !resource.is_readable() {
            return Err(StorageError::not_found(name));
        }

        debug!("Resolved {} to {}", name, resource.path().display());
        Ok(resource)
    }
}
