//! Error types for the Tessera media asset engine.
//!
//! This crate provides the foundation error types used throughout the Tessera workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use tessera_error::{TesseraResult, ValidationError, ValidationErrorKind};
//!
//! fn check_extension(ext: &str) -> TesseraResult<()> {
//!     if ext != "png" {
//!         Err(ValidationError::new(ValidationErrorKind::InvalidExtension(
//!             ext.to_string(),
//!         )))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_extension("gif").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod byte_size;
mod config;
mod decode;
mod error;
mod input;
mod json;
mod storage;
mod template;
mod validation;

pub use byte_size::ByteSize;
pub use config::ConfigError;
pub use decode::{DecodeError, DecodeErrorKind};
pub use error::{TesseraError, TesseraErrorKind, TesseraResult};
pub use input::UnsupportedInputError;
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
pub use template::{TemplateError, TemplateErrorKind};
pub use validation::{ValidationError, ValidationErrorKind};
