//! Protocol responses
//!
//! Defines response codes and formatting.

/// Response codes
pub const OPENING_DATA: u16 = 150;
pub const OK: u16 = 200;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const LOCAL_ERROR: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const INVALID_ARGUMENT: u16 = 501;
pub const FILE_NOT_FOUND: u16 = 550;

/// Format a response line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}
