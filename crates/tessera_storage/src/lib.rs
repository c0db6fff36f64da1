//! Pluggable object storage for Tessera.
//!
//! The media engine only needs a narrow contract from a storage backend:
//! put, get, delete and stat by path, plus the public endpoint under which
//! stored objects are served. This crate defines that contract as the
//! [`ObjectStore`] trait and ships two backends.
//!
//! # Features
//!
//! - **Filesystem backend**: atomic writes via temp file + rename, path
//!   traversal rejected
//! - **Memory backend**: keeps a journal of every operation, for embedding
//!   and tests
//! - **Named registry**: fields pick a backend by name, with a default
//!
//! # Example
//!
//! ```rust
//! use tessera_storage::{MemoryStorage, ObjectStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = MemoryStorage::new("https://cdn.example.com");
//!
//! storage.put("/system/users/1/avatar/me.png", b"png bytes").await?;
//! let info = storage.stat("/system/users/1/avatar/me.png").await?;
//! assert_eq!(info.map(|i| *i.size()), Some(9));
//!
//! storage.delete("/system/users/1/avatar/me.png").await?;
//! assert!(storage.stat("/system/users/1/avatar/me.png").await?.is_none());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod memory;
mod registry;
mod store;

pub use filesystem::FileSystemStorage;
pub use memory::{MemoryStorage, OperationKind, StorageOperation};
pub use registry::StorageRegistry;
pub use store::{ObjectInfo, ObjectStore};
pub use tessera_error::{StorageError, StorageErrorKind};
