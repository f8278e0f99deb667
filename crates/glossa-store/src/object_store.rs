//! Filesystem-backed raw file staging

use crate::StoreError;
use glossa_domain::traits::ObjectStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem implementation of `ObjectStore`
///
/// Objects live under a root directory; the storage path is interpreted as a
/// relative path beneath it. Parent directories are created on upload.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at the given directory, creating it if needed
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory of this store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        // Reject traversal components; storage paths are store-relative
        let relative = Path::new(path);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(StoreError::InvalidData(format!(
                "Storage path escapes the store root: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStore for FsObjectStore {
    type Error = StoreError;

    fn download(&self, path: &str) -> Result<Vec<u8>, Self::Error> {
        let full = self.resolve(path)?;
        if !full.exists() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        Ok(fs::read(full)?)
    }

    fn upload(&self, path: &str, bytes: &[u8], _content_type: &str) -> Result<(), Self::Error> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, bytes)?;
        debug!("Stored {} bytes at {}", bytes.len(), full.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upload_download_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FsObjectStore::new(dir.path()).unwrap();

        store
            .upload("uploads/abc/orders.csv", b"a,b\n1,2\n", "text/csv")
            .unwrap();
        let bytes = store.download("uploads/abc/orders.csv").unwrap();
        assert_eq!(bytes, b"a,b\n1,2\n");
    }

    #[test]
    fn test_missing_object_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FsObjectStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.download("nope.bin"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FsObjectStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.download("../outside"),
            Err(StoreError::InvalidData(_))
        ));
        assert!(matches!(
            store.upload("/etc/passwd", b"x", "text/plain"),
            Err(StoreError::InvalidData(_))
        ));
    }
}
