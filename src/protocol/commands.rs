//! Module `commands`
//!
//! Defines the commands of the gallery line protocol, their status and
//! results, and the parser turning a raw line into a command.

use std::fs::File;

/// A command parsed from client input.
///
/// Commands that require arguments store them as `String` variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    INIT,
    RESET,
    SAVE(String), // Ingest a source directory
    LIST,
    RETR(String), // Retrieve a stored item by name
    NOOP,
    QUIT,
    UNKNOWN,
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// An open stored file to stream to the client.
#[derive(Debug)]
pub struct Transfer {
    pub file: File,
    /// Byte count announced in the response line.
    pub len: u64,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
    /// Streamed after `message`, followed by a completion line.
    pub transfer: Option<Transfer>,
}

/// Parses a raw line received from a client into the `Command` enum.
///
/// Verbs are case-insensitive. A known verb missing its argument is `UNKNOWN`.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "INIT" => Command::INIT,
        "RESET" => Command::RESET,
        "SAVE" if !arg.is_empty() => Command::SAVE(arg.to_string()),
        "LIST" => Command::LIST,
        "RETR" if !arg.is_empty() => Command::RETR(arg.to_string()),
        "NOOP" => Command::NOOP,
        "QUIT" | "Q" => Command::QUIT,
        _ => Command::UNKNOWN,
    }
}
