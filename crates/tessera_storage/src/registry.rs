//! Named storage backends.

use crate::ObjectStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use tessera_error::{StorageError, StorageErrorKind, TesseraResult};

/// Storage backends by name, with one designated default.
///
/// Built once at startup and shared read-only afterwards.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tessera_storage::{MemoryStorage, StorageRegistry};
///
/// let registry = StorageRegistry::new("default")
///     .with_backend("default", Arc::new(MemoryStorage::new("")))
///     .with_backend("cdn", Arc::new(MemoryStorage::new("https://cdn.test")));
///
/// assert_eq!(registry.resolve(Some("cdn")).unwrap().endpoint(), "https://cdn.test");
/// assert_eq!(registry.resolve(None).unwrap().endpoint(), "");
/// assert!(registry.resolve(Some("s3")).is_err());
/// ```
#[derive(Clone)]
pub struct StorageRegistry {
    default: String,
    backends: BTreeMap<String, Arc<dyn ObjectStore>>,
}

impl StorageRegistry {
    /// Create an empty registry whose default backend is `default`.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            backends: BTreeMap::new(),
        }
    }

    /// Register a backend under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, backend: Arc<dyn ObjectStore>) {
        let name = name.into();
        tracing::debug!(name = %name, kind = backend.kind(), "Registered storage backend");
        self.backends.insert(name, backend);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_backend(mut self, name: impl Into<String>, backend: Arc<dyn ObjectStore>) -> Self {
        self.register(name, backend);
        self
    }

    /// Name of the default backend.
    pub fn default_name(&self) -> &str {
        &self.default
    }

    /// Registered backend names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.backends.keys().map(String::as_str).collect()
    }

    /// Look up a backend by name.
    ///
    /// # Errors
    ///
    /// `StorageErrorKind::UnknownBackend` if no backend has that name.
    pub fn get(&self, name: &str) -> TesseraResult<Arc<dyn ObjectStore>> {
        self.backends
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::new(StorageErrorKind::UnknownBackend(name.to_string())).into())
    }

    /// The named backend, or the default one when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> TesseraResult<Arc<dyn ObjectStore>> {
        self.get(name.unwrap_or(&self.default))
    }
}

impl std::fmt::Debug for StorageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageRegistry")
            .field("default", &self.default)
            .field("backends", &self.names())
            .finish()
    }
}
