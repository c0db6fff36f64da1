//! Filesystem object storage.
//!
//! Objects are stored under a root directory at their slash separated
//! path, so `/system/users/1/avatar/me.png` lands in
//! `{root}/system/users/1/avatar/me.png`.

use crate::{ObjectInfo, ObjectStore};
use std::path::{Component, Path, PathBuf};
use tessera_error::{StorageError, StorageErrorKind, TesseraResult};
use uuid::Uuid;

/// Filesystem storage backend.
///
/// # Features
///
/// - **Atomic writes**: temp file + rename, so readers never see a partial object
/// - **Confined paths**: `..` and absolute components are rejected
/// - **On-demand directories**: parents are created on write
pub struct FileSystemStorage {
    root: PathBuf,
    endpoint: String,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the root directory if it doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory objects are stored under
    /// * `endpoint` - Public base URL for stored objects (may be empty)
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(root, endpoint))]
    pub fn new(root: impl Into<PathBuf>, endpoint: impl Into<String>) -> TesseraResult<Self> {
        let root = root.into();

        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;

        tracing::info!(root = %root.display(), "Created filesystem storage");
        Ok(Self {
            root,
            endpoint: endpoint.into(),
        })
    }

    /// Root directory of this backend.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an object path under the root.
    fn resolve(&self, path: &str) -> TesseraResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let mut resolved = self.root.clone();
        let mut depth = 0usize;

        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                _ => {
                    return Err(
                        StorageError::new(StorageErrorKind::InvalidPath(path.to_string())).into(),
                    );
                }
            }
        }

        if depth == 0 {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(path.to_string())).into());
        }
        Ok(resolved)
    }
}

#[async_trait::async_trait]
impl ObjectStore for FileSystemStorage {
    fn kind(&self) -> &str {
        "filesystem"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn put(&self, path: &str, data: &[u8]) -> TesseraResult<()> {
        let target = self.resolve(path)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = target.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(|e| StorageError::operation("put", path, e))?;

        if let Err(e) = tokio::fs::rename(&temp_path, &target).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::operation("put", path, format!("rename: {}", e)).into());
        }

        tracing::info!(path, file = %target.display(), size = data.len(), "Stored object");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, path: &str) -> TesseraResult<Vec<u8>> {
        let target = self.resolve(path)?;

        let data = tokio::fs::read(&target).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.to_string()))
            } else {
                StorageError::operation("get", path, e)
            }
        })?;

        tracing::debug!(path, size = data.len(), "Retrieved object");
        Ok(data)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, path: &str) -> TesseraResult<()> {
        let target = self.resolve(path)?;

        tokio::fs::remove_file(&target).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.to_string()))
            } else {
                StorageError::operation("delete", path, e)
            }
        })?;

        tracing::info!(path, "Deleted object");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn stat(&self, path: &str) -> TesseraResult<Option<ObjectInfo>> {
        let target = self.resolve(path)?;

        match tokio::fs::metadata(&target).await {
            Ok(metadata) if metadata.is_file() => {
                let modified = metadata.modified().ok().map(chrono::DateTime::from);
                Ok(Some(ObjectInfo::new(path, metadata.len(), modified)))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::operation("stat", path, e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_traversal() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = FileSystemStorage::new(dir.path(), "").unwrap();

        assert!(storage.resolve("../escape.png").is_err());
        assert!(storage.resolve("/a/../../escape.png").is_err());
        assert!(storage.resolve("/").is_err());
        assert_eq!(
            storage.resolve("/a/./b.png").unwrap(),
            dir.path().join("a").join("b.png")
        );
    }
}
