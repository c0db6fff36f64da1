//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Object not found at the specified path
    #[display("Object not found: {}", _0)]
    NotFound(String),
    /// Backend operation failed
    #[display("Storage {} failed for '{}': {}", operation, path, reason)]
    Operation {
        /// Operation name (put, get, delete, stat)
        operation: String,
        /// Object path
        path: String,
        /// Underlying failure
        reason: String,
    },
    /// Invalid storage path
    #[display("Invalid storage path: {}", _0)]
    InvalidPath(String),
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// No backend registered under this name
    #[display("Unknown storage backend: {}", _0)]
    UnknownBackend(String),
    /// Asset has no storage backend bound
    #[display("No storage backend bound to asset '{}'", _0)]
    Unbound(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use tessera_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("/system/users/a.png".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a failed backend operation.
    #[track_caller]
    pub fn operation(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        Self::new(StorageErrorKind::Operation {
            operation: operation.into(),
            path: path.into(),
            reason: reason.to_string(),
        })
    }
}
