//! Input validation utilities
//!
//! Provides input validation for protocol lines.

/// Validate that input is not empty and doesn't contain control characters
pub fn is_valid_input(input: &str) -> bool {
    !input.trim().is_empty() && !input.contains('\0') && !input.contains('\r') && !input.contains('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input() {
        assert!(is_valid_input("LIST"));
        assert!(is_valid_input("SAVE /tmp/pictures"));
    }

    #[test]
    fn test_invalid_input() {
        assert!(!is_valid_input(""));
        assert!(!is_valid_input("   "));
        assert!(!is_valid_input("RETR a\0.png"));
        assert!(!is_valid_input("LIST\rRESET"));
    }
}
