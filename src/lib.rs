//! Gallery store
//!
//! Ingests every file with a configured extension from a source directory
//! into a flat, managed storage root, lists what has been stored and resolves
//! stored names to readable resources. A small line protocol exposes the same
//! operations over TCP.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod utils;

pub use crate::config::{AppConfig, ServerConfig, StorageConfig};
pub use crate::error::{Result, StorageError};
pub use crate::server::Server;
pub use crate::storage::{DirectoryScanner, SaveReport, StorageRoot, StorageService, StoredResource};
