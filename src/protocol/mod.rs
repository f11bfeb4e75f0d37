//! Gallery line protocol
//!
//! Handles command parsing, dispatch to the storage service, and response
//! generation.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, Transfer, parse_command};
pub use handlers::handle_command;
