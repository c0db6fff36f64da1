//! Storage operations on a media asset.

use crate::MediaAsset;
use std::collections::BTreeSet;
use std::sync::Arc;
use tessera_error::{StorageError, StorageErrorKind, TesseraResult};
use tessera_storage::ObjectStore;

impl MediaAsset {
    /// Bind the storage backend this asset reads and writes through.
    pub fn bind(&mut self, storage: Arc<dyn ObjectStore>) {
        self.storage = Some(storage);
    }

    /// Builder form of [`bind`](Self::bind).
    pub fn with_storage(mut self, storage: Arc<dyn ObjectStore>) -> Self {
        self.bind(storage);
        self
    }

    /// Bound storage backend, if any.
    pub fn storage(&self) -> Option<&Arc<dyn ObjectStore>> {
        self.storage.as_ref()
    }

    fn backend(&self) -> TesseraResult<&Arc<dyn ObjectStore>> {
        self.storage.as_ref().ok_or_else(|| {
            StorageError::new(StorageErrorKind::Unbound(self.file_name.clone())).into()
        })
    }

    /// Write bytes at `path`.
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn store(&self, path: &str, data: &[u8]) -> TesseraResult<()> {
        self.backend()?.put(path, data).await?;
        tracing::debug!("Stored object");
        Ok(())
    }

    /// Read the object at `path`.
    #[tracing::instrument(skip(self))]
    pub async fn retrieve(&self, path: &str) -> TesseraResult<Vec<u8>> {
        self.backend()?.get(path).await
    }

    /// Delete the object at `path` if it exists.
    ///
    /// Returns whether something was removed; a missing object is not an
    /// error.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, path: &str) -> TesseraResult<bool> {
        let storage = self.backend()?;
        if storage.stat(path).await?.is_none() {
            tracing::trace!("Nothing to remove");
            return Ok(false);
        }
        match storage.delete(path).await {
            Ok(()) => {
                tracing::debug!("Removed object");
                Ok(true)
            }
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove the base file and every style rendition.
    ///
    /// Every path is attempted; the first failure is reported after all
    /// attempts. Returns the number of objects removed.
    #[tracing::instrument(skip(self), fields(url = %self.url()))]
    pub async fn remove_all(&self) -> TesseraResult<usize> {
        let paths = self.paths();
        self.remove_paths(&paths).await
    }

    /// Remove every superseded version, skipping paths the current file
    /// still uses, and forget them. Returns the number of objects removed.
    #[tracing::instrument(skip(self), fields(versions = self.superseded.len()))]
    pub async fn remove_superseded(&mut self) -> TesseraResult<usize> {
        if self.superseded.is_empty() {
            return Ok(0);
        }
        let live: BTreeSet<String> = self.paths().into_iter().collect();
        let stale: Vec<String> = self
            .superseded
            .iter()
            .flat_map(|v| v.paths())
            .filter(|p| !live.contains(p))
            .collect();
        let removed = self.remove_paths(&stale).await?;
        self.superseded.clear();
        tracing::info!(removed, "Removed superseded versions");
        Ok(removed)
    }

    async fn remove_paths(&self, paths: &[String]) -> TesseraResult<usize> {
        let mut removed = 0;
        let mut first_error = None;
        for path in paths {
            match self.remove(path).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Failed to remove object");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }
}
