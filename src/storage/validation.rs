//! Path validation
//!
//! Keeps item names inside the flat storage namespace.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, StorageError};

/// Checks that `name` is a single plain file name: no separators, no `.` or
/// `..`, no root or drive prefix.
pub fn validate_item_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StorageError::validation("file name required"));
    }
    if name.contains('\0') || name.contains('\\') {
        return Err(StorageError::validation(format!("invalid file name '{name}'")));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(StorageError::validation(format!(
            "file name '{name}' resolves outside the storage root"
        ))),
    }
}

/// Verifies that the real location of `candidate` lies under `root` once
/// symbolic links are resolved. Both paths must exist.
pub fn ensure_within_root(root: &Path, candidate: &Path, name: &str) -> Result<PathBuf> {
    let root_canonical = root.canonicalize().map_err(|e| {
        StorageError::initialization_io(
            format!("storage root {} is not accessible", root.display()),
            e,
        )
    })?;
    let canonical = candidate
        .canonicalize()
        .map_err(|_| StorageError::not_found(name))?;

    if canonical.starts_with(&root_canonical) && canonical != root_canonical {
        Ok(canonical)
    } else {
        Err(StorageError::validation(format!(
            "file name '{name}' resolves outside the storage root"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plain_names_are_accepted() {
        assert!(validate_item_name("a.png").is_ok());
        assert!(validate_item_name("with space.png").is_ok());
        assert!(validate_item_name("..hidden.png").is_ok());
    }

    #[test]
    fn test_traversal_names_are_rejected() {
        for name in [
            "",
            "..",
            ".",
            "../secret.txt",
            "sub/../../secret.txt",
            "sub/a.png",
            "/etc/passwd",
            "..\\secret.txt",
            "a\0.png",
        ] {
            assert!(
                matches!(validate_item_name(name), Err(StorageError::Validation(_))),
                "expected rejection for {name:?}"
            );
        }
    }

    #[test]
    fn test_ensure_within_root_accepts_children() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.png");
        fs::write(&file, b"a").unwrap();

        let canonical = ensure_within_root(dir.path(), &file, "a.png").unwrap();
        assert!(canonical.ends_with("a.png"));
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_within_root_rejects_escaping_symlink() {
        let outside = TempDir::new().unwrap();
        let secret = outside.path().join("secret.txt");
        fs::write(&secret, b"secret").unwrap();

        let root = TempDir::new().unwrap();
        let link = root.path().join("link.png");
        std::os::unix::fs::symlink(&secret, &link).unwrap();

        assert!(matches!(
            ensure_within_root(root.path(), &link, "link.png"),
            Err(StorageError::Validation(_))
        ));
    }
}
