//! In-memory object storage with an operation journal.

use crate::{ObjectInfo, ObjectStore};
use std::collections::BTreeMap;
use tessera_error::{StorageError, StorageErrorKind, TesseraResult};
use tokio::sync::RwLock;

/// Kind of storage call recorded in the journal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum OperationKind {
    /// `put`
    #[display("put")]
    Put,
    /// `get`
    #[display("get")]
    Get,
    /// `delete`
    #[display("delete")]
    Delete,
    /// `stat`
    #[display("stat")]
    Stat,
}

/// One journaled call against a [`MemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct StorageOperation {
    /// What was called
    kind: OperationKind,
    /// Path it was called with
    path: String,
}

struct StoredObject {
    data: Vec<u8>,
    modified: chrono::DateTime<chrono::Utc>,
}

#[derive(Default)]
struct State {
    objects: BTreeMap<String, StoredObject>,
    journal: Vec<StorageOperation>,
}

/// Storage backend that keeps objects in memory.
///
/// Every call is appended to a journal, including calls for paths that do
/// not exist, so callers can assert exactly which operations ran.
pub struct MemoryStorage {
    endpoint: String,
    state: RwLock<State>,
}

impl MemoryStorage {
    /// Create an empty backend serving objects under `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            state: RwLock::new(State::default()),
        }
    }

    /// Every call made so far, in order.
    pub async fn operations(&self) -> Vec<StorageOperation> {
        self.state.read().await.journal.clone()
    }

    /// Paths of calls of one kind, in order.
    pub async fn operations_of(&self, kind: OperationKind) -> Vec<String> {
        self.state
            .read()
            .await
            .journal
            .iter()
            .filter(|op| op.kind == kind)
            .map(|op| op.path.clone())
            .collect()
    }

    /// Forget the journal, keeping stored objects.
    pub async fn clear_journal(&self) {
        self.state.write().await.journal.clear();
    }

    /// Paths of all stored objects, sorted.
    pub async fn paths(&self) -> Vec<String> {
        self.state.read().await.objects.keys().cloned().collect()
    }

    /// Whether an object is stored at `path`.
    pub async fn contains(&self, path: &str) -> bool {
        self.state.read().await.objects.contains_key(path)
    }

    async fn record(&self, kind: OperationKind, path: &str) {
        self.state.write().await.journal.push(StorageOperation {
            kind,
            path: path.to_string(),
        });
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new("")
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStorage {
    fn kind(&self) -> &str {
        "memory"
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    async fn put(&self, path: &str, data: &[u8]) -> TesseraResult<()> {
        self.record(OperationKind::Put, path).await;
        self.state.write().await.objects.insert(
            path.to_string(),
            StoredObject {
                data: data.to_vec(),
                modified: chrono::Utc::now(),
            },
        );
        tracing::debug!(path, size = data.len(), "Stored object in memory");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, path: &str) -> TesseraResult<Vec<u8>> {
        self.record(OperationKind::Get, path).await;
        let state = self.state.read().await;
        let object = state
            .objects
            .get(path)
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(path.to_string())))?;
        Ok(object.data.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, path: &str) -> TesseraResult<()> {
        self.record(OperationKind::Delete, path).await;
        self.state
            .write()
            .await
            .objects
            .remove(path)
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(path.to_string())))?;
        tracing::debug!(path, "Deleted object from memory");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn stat(&self, path: &str) -> TesseraResult<Option<ObjectInfo>> {
        self.record(OperationKind::Stat, path).await;
        let state = self.state.read().await;
        Ok(state
            .objects
            .get(path)
            .map(|object| ObjectInfo::new(path, object.data.len() as u64, Some(object.modified))))
    }
}
