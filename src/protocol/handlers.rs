//! Command handlers
//!
//! Maps each protocol command onto a storage service operation and renders
//! the outcome as response lines.

use log::info;

use crate::error::StorageError;
use crate::error::handlers::{error_to_status_code, handle_error};
use crate::protocol::responses::{
    GOODBYE, OK, OPENING_DATA, TRANSFER_COMPLETE, UNKNOWN_COMMAND, format_response,
};
use crate::protocol::{Command, CommandResult, CommandStatus, Transfer};
use crate::storage::StorageService;

/// Dispatches a parsed command to its handler.
///
/// Storage calls block on filesystem I/O; async callers should run this on a
/// blocking thread.
pub fn handle_command(service: &StorageService, command: &Command) -> CommandResult {
    match command {
        Command::INIT => handle_cmd_init(service),
        Command::RESET => handle_cmd_reset(service),
        Command::SAVE(source) => handle_cmd_save(service, source),
        Command::LIST => handle_cmd_list(service),
        Command::RETR(name) => handle_cmd_retr(service, name),
        Command::NOOP => success(format_response(OK, "OK")),
        Command::QUIT => handle_cmd_quit(),
        Command::UNKNOWN => handle_cmd_unknown(),
    }
}

fn success(message: String) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(message),
        transfer: None,
    }
}

fn failure(err: StorageError) -> CommandResult {
    handle_error(&err);
    let message = err.to_string();
    CommandResult {
        message: Some(format_response(error_to_status_code(&err), &message)),
        status: CommandStatus::Failure(message),
        transfer: None,
    }
}

fn handle_cmd_init(service: &StorageService) -> CommandResult {
    match service.initialize() {
        Ok(()) => success(format_response(OK, "Storage initialized")),
        Err(e) => failure(e),
    }
}

fn handle_cmd_reset(service: &StorageService) -> CommandResult {
    match service.reset() {
        Ok(()) => success(format_response(OK, "Storage reset")),
        Err(e) => failure(e),
    }
}

fn handle_cmd_save(service: &StorageService, source: &str) -> CommandResult {
    match service.save(source) {
        Ok(report) => {
            info!(
                "Stored {} files from {} ({} copies)",
                report.len(),
                source,
                report.copied
            );
            success(format_response(
                TRANSFER_COMPLETE,
                &format!("Stored {} files", report.len()),
            ))
        }
        Err(e) => failure(e),
    }
}

/// Sends a count line, one name per line, then a completion line.
fn handle_cmd_list(service: &StorageService) -> CommandResult {
    match service.list() {
        Ok(names) => {
            let mut message = format_response(OPENING_DATA, &format!("{} items", names.len()));
            for name in &names {
                message.push_str(name);
                message.push_str("\r\n");
            }
            message.push_str(&format_response(TRANSFER_COMPLETE, "Listing complete"));
            success(message)
        }
        Err(e) => failure(e),
    }
}

/// Opens the stored file so the session can stream it; nothing is buffered
/// in memory.
fn handle_cmd_retr(service: &StorageService, name: &str) -> CommandResult {
    let resource = match service.resolve(name) {
        Ok(resource) => resource,
        Err(e) => return failure(e),
    };

    let opened = resource
        .open()
        .and_then(|file| file.metadata().map(|meta| (file, meta.len())));

    match opened {
        Ok((file, len)) => CommandResult {
            status: CommandStatus::Success,
            message: Some(format_response(
                OPENING_DATA,
                &format!("Sending {} ({} bytes)", resource.name(), len),
            )),
            transfer: Some(Transfer { file, len }),
        },
        Err(_) => failure(StorageError::not_found(name)),
    }
}

fn handle_cmd_quit() -> CommandResult {
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(GOODBYE, "Goodbye")),
        transfer: None,
    }
}

fn handle_cmd_unknown() -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure("Unknown command".into()),
        message: Some(format_response(UNKNOWN_COMMAND, "Unknown command")),
        transfer: None,
    }
}

/// Completion line written after a command's raw data.
pub fn transfer_complete() -> String {
    format_response(TRANSFER_COMPLETE, "Transfer complete")
}
