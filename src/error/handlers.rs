//! Error handlers
//!
//! Maps storage errors to front-end status codes and logs them.

use crate::error::types::StorageError;
use crate::protocol::responses;
use log::error;

/// Handle a storage error
pub fn handle_error(err: &StorageError) {
    error!("Storage error: {}", err);
}

/// Convert error to a front-end status code
pub fn error_to_status_code(err: &StorageError) -> u16 {
    match err {
        StorageError::Validation(_) => responses::INVALID_ARGUMENT,
        StorageError::Initialization { .. } => responses::SERVICE_UNAVAILABLE,
        StorageError::Copy { .. } => responses::LOCAL_ERROR,
        StorageError::Read { .. } => responses::LOCAL_ERROR,
        StorageError::NotFound(_) => responses::FILE_NOT_FOUND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_each_kind_has_a_status() {
        assert_eq!(error_to_status_code(&StorageError::validation("x")), 501);
        assert_eq!(error_to_status_code(&StorageError::initialization("x")), 421);
        assert_eq!(
            error_to_status_code(&StorageError::read(
                "x",
                io::Error::new(io::ErrorKind::Other, "boom")
            )),
            451
        );
        assert_eq!(error_to_status_code(&StorageError::not_found("a.png")), 550);
    }
}
