//! Directory scanner
//!
//! Recursively collects the files of a source directory whose names end with
//! one of the configured extensions.

use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, StorageError};

/// Extension matched when none is configured.
pub const DEFAULT_EXTENSION: &str = "png";

/// Read-only recursive file finder.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    extensions: Vec<String>,
}

impl DirectoryScanner {
    /// Builds a scanner for a non-empty set of case-sensitive extensions,
    /// given without the leading dot.
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extensions: Vec<String> = extensions.into_iter().map(Into::into).collect();

        if extensions.is_empty() {
            return Err(StorageError::validation("extension set cannot be empty"));
        }
        if let Some(bad) = extensions.iter().find(|ext| !is_valid_extension(ext)) {
            return Err(StorageError::validation(format!("invalid extension '{bad}'")));
        }

        Ok(Self { extensions })
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Walks `source_dir` and every subdirectory, returning each regular file
    /// with a matching name. Callers must not rely on the order.
    pub fn find(&self, source_dir: &Path) -> Result<Vec<PathBuf>> {
        self.walk(source_dir, None)
    }

    /// Like `find`, but never descends into `excluded`, which must be a
    /// canonical directory path.
    pub fn find_excluding(&self, source_dir: &Path, excluded: &Path) -> Result<Vec<PathBuf>> {
        self.walk(source_dir, Some(excluded))
    }

    fn walk(&self, source_dir: &Path, excluded: Option<&Path>) -> Result<Vec<PathBuf>> {
        debug!("Searching for files with extensions: {:?}", self.extensions);

        if !source_dir.is_dir() {
            return Err(StorageError::validation(format!(
                "source path {} does not point to an existing directory",
                source_dir.display()
            )));
        }

        let mut matches = Vec::new();

        let walker = WalkDir::new(source_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| match excluded {
                Some(excluded) if entry.file_type().is_dir() => !is_same_dir(entry.path(), excluded),
                _ => true,
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let message = format!("failed to scan {}", source_dir.display());
                match e.into_io_error() {
                    Some(io) => StorageError::read(message, io),
                    None => StorageError::read(message, std::io::Error::other("filesystem loop")),
                }
            })?;

            if entry.file_type().is_file() && self.matches(&entry.file_name().to_string_lossy()) {
                matches.push(entry.into_path());
            }
        }

        debug!(
            "In directory {} found {} files",
            source_dir.display(),
            matches.len()
        );

        Ok(matches)
    }

    fn matches(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| {
            file_name
                .strip_suffix(ext.as_str())
                .and_then(|rest| rest.strip_suffix('.'))
                .is_some_and(|stem| !stem.is_empty())
        })
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self {
            extensions: vec![DEFAULT_EXTENSION.to_string()],
        }
    }
}

fn is_same_dir(path: &Path, canonical: &Path) -> bool {
    path.canonicalize()
        .map(|resolved| resolved == canonical)
        .unwrap_or(false)
}

/// Extensions are plain suffixes: no dots at the edges, no separators.
pub fn is_valid_extension(ext: &str) -> bool {
    !ext.is_empty()
        && !ext.starts_with('.')
        && !ext.ends_with('.')
        && !ext.contains('/')
        && !ext.contains('\\')
        && !ext.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_finds_matching_files_recursively() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        fs::write(dir.path().join("c.txt"), b"c").unwrap();
        fs::create_dir_all(dir.path().join("nested/deeper")).unwrap();
        fs::write(dir.path().join("nested/deeper/b.png"), b"b").unwrap();

        let found = DirectoryScanner::default().find(dir.path()).unwrap();
        assert_eq!(names(&found), vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("upper.PNG"), b"x").unwrap();
        fs::write(dir.path().join("lower.png"), b"x").unwrap();
        fs::write(dir.path().join("notpng"), b"x").unwrap();
        fs::write(dir.path().join(".png"), b"x").unwrap();

        let found = DirectoryScanner::default().find(dir.path()).unwrap();
        assert_eq!(names(&found), vec!["lower.png"]);
    }

    #[test]
    fn test_multiple_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        fs::write(dir.path().join("c.gif"), b"x").unwrap();

        let scanner = DirectoryScanner::new(["png", "jpg"]).unwrap();
        let found = scanner.find(dir.path()).unwrap();
        assert_eq!(names(&found), vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn test_directories_named_like_matches_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("folder.png")).unwrap();

        let found = DirectoryScanner::default().find(dir.path()).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_excluded_directory_is_not_walked() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        fs::create_dir_all(dir.path().join("store/inner")).unwrap();
        fs::write(dir.path().join("store/b.png"), b"b").unwrap();
        fs::write(dir.path().join("store/inner/c.png"), b"c").unwrap();

        let excluded = dir.path().join("store").canonicalize().unwrap();
        let found = DirectoryScanner::default()
            .find_excluding(dir.path(), &excluded)
            .unwrap();
        assert_eq!(names(&found), vec!["a.png"]);
    }

    #[test]
    fn test_excluding_the_source_itself_finds_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();

        let excluded = dir.path().canonicalize().unwrap();
        let found = DirectoryScanner::default()
            .find_excluding(dir.path(), &excluded)
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_missing_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = DirectoryScanner::default().find(&dir.path().join("absent"));
        assert!(matches!(result, Err(StorageError::Validation(_))));
    }

    #[test]
    fn test_file_instead_of_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.png");
        fs::write(&file, b"x").unwrap();

        let result = DirectoryScanner::default().find(&file);
        assert!(matches!(result, Err(StorageError::Validation(_))));
    }

    #[test]
    fn test_empty_extension_set_is_rejected() {
        let result = DirectoryScanner::new(Vec::<String>::new());
        assert!(matches!(result, Err(StorageError::Validation(_))));
    }

    #[test]
    fn test_invalid_extensions() {
        assert!(is_valid_extension("png"));
        assert!(is_valid_extension("tar.gz"));
        assert!(!is_valid_extension(""));
        assert!(!is_valid_extension(".png"));
        assert!(!is_valid_extension("a/b"));
        assert!(DirectoryScanner::new([""]).is_err());
    }
}
