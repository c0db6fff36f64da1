//! Storage trait definition.

use tessera_error::TesseraResult;

/// Trait for pluggable object storage backends.
///
/// Paths are slash separated and backend relative; a leading slash is
/// allowed and ignored by backends that map paths onto a directory.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend name used in logs, e.g. `filesystem`.
    fn kind(&self) -> &str;

    /// Public base URL under which stored objects are served. May be empty.
    fn endpoint(&self) -> &str;

    /// Write `data` at `path`, replacing any existing object.
    async fn put(&self, path: &str, data: &[u8]) -> TesseraResult<()>;

    /// Read the object at `path`.
    ///
    /// # Errors
    ///
    /// `StorageErrorKind::NotFound` if nothing is stored there.
    async fn get(&self, path: &str) -> TesseraResult<Vec<u8>>;

    /// Delete the object at `path`.
    ///
    /// # Errors
    ///
    /// `StorageErrorKind::NotFound` if nothing is stored there.
    async fn delete(&self, path: &str) -> TesseraResult<()>;

    /// Describe the object at `path`, or `None` if it does not exist.
    async fn stat(&self, path: &str) -> TesseraResult<Option<ObjectInfo>>;
}

/// Metadata about a stored object.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ObjectInfo {
    /// Path the object is stored under
    path: String,
    /// Size in bytes
    size: u64,
    /// Last modification time, if the backend tracks one
    modified: Option<chrono::DateTime<chrono::Utc>>,
}

impl ObjectInfo {
    /// Create object metadata.
    pub fn new(
        path: impl Into<String>,
        size: u64,
        modified: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Self {
        Self {
            path: path.into(),
            size,
            modified,
        }
    }
}
