//! Server core functionality
//!
//! The TCP accept loop and per-client sessions of the line-protocol front
//! end. Storage work runs on blocking threads against a shared
//! `StorageService`.

pub mod core;
pub mod session;

pub use self::core::Server;
