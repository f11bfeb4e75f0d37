//! File system storage management
//!
//! Scanning of source directories, the storage root lifecycle, name
//! validation and the storage service built on top of them.

pub mod results;
pub mod root;
pub mod scanner;
pub mod service;
pub mod validation;

pub use results::{SaveReport, StoredResource};
pub use root::StorageRoot;
pub use scanner::DirectoryScanner;
pub use service::StorageService;
