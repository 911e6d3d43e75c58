use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::ResourceStore;
use crate::errors::StoreError;

/// Resource store backed by the top-level files of a directory.
///
/// Key `k` maps to `<root>/k`. Keys that would escape the root (path
/// separators, `.` or `..`) are treated as missing rather than resolved.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let contained =
            !key.is_empty() && key != "." && key != ".." && !key.contains(['/', '\\']);
        contained.then(|| self.root.join(key))
    }
}

impl ResourceStore for DirectoryStore {
    fn exists(&self, key: &str) -> bool {
        self.path_for(key).is_some_and(|path| path.is_file())
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key).ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })?;

        std::fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                key: key.to_string(),
            },
            _ => StoreError::Io {
                key: key.to_string(),
                source,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_top_level_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("entry.py"), "VALUE = 1").unwrap();

        let store = DirectoryStore::new(dir.path());

        assert!(store.exists("entry.py"));
        assert_eq!(store.read("entry.py").unwrap(), b"VALUE = 1");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = DirectoryStore::new(dir.path());

        assert!(!store.exists("missing.py"));
        assert!(matches!(
            store.read("missing.py"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_directories_do_not_exist_as_resources() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("pkg.py")).unwrap();

        let store = DirectoryStore::new(dir.path());
        assert!(!store.exists("pkg.py"));
    }

    #[test]
    fn test_keys_cannot_escape_root() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("inner");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(dir.path().join("secret.py"), "X = 1").unwrap();

        let store = DirectoryStore::new(&inner);

        assert!(!store.exists("../secret.py"));
        assert!(!store.exists(".."));
        assert!(matches!(
            store.read("../secret.py"),
            Err(StoreError::NotFound { .. })
        ));
    }
}
