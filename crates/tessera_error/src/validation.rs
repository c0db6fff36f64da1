//! Upload validation error types.

use crate::ByteSize;

/// Kinds of validation failures raised before anything is written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Content type is not in the accepted list
    #[display("Invalid file type {:?}", _0)]
    InvalidType(String),
    /// File extension is not in the accepted list
    #[display("Invalid file extension {:?}", _0)]
    InvalidExtension(String),
    /// File exceeds the maximum size
    #[display(
        "Very large file. The expected maximum size is {}, but obtained {}.",
        limit,
        actual
    )]
    TooLarge {
        /// Configured maximum size
        limit: ByteSize,
        /// Size of the rejected file
        actual: ByteSize,
    },
    /// One part of a multi-part upload failed validation
    #[display("File #{}: {}", index, reason)]
    Part {
        /// 1-based position of the offending part
        index: usize,
        /// Underlying failure
        reason: Box<ValidationErrorKind>,
    },
    /// Crop rectangle has a zero dimension
    #[display("Invalid crop rectangle for style '{}': {}", style, reason)]
    InvalidRectangle {
        /// Style the rectangle belongs to
        style: String,
        /// What is wrong with it
        reason: String,
    },
    /// Crop rectangle does not fit inside the source image
    #[display(
        "Crop rectangle for style '{}' exceeds the {}x{} source image",
        style,
        width,
        height
    )]
    CropOutOfBounds {
        /// Style the rectangle belongs to
        style: String,
        /// Source image width
        width: u32,
        /// Source image height
        height: u32,
    },
    /// Crop was requested for an asset that is not an image
    #[display("Cannot crop '{}': not an image", _0)]
    NotAnImage(String),
}

/// Validation error with location tracking.
///
/// # Examples
///
/// ```
/// use tessera_error::{ByteSize, ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::TooLarge {
///     limit: ByteSize(1024 * 1024),
///     actual: ByteSize(3_000_000),
/// });
/// assert!(err.to_string().contains("maximum size is 1.0 MB, but obtained 3.0 MB"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The kind of error that occurred
    pub kind: ValidationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new validation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
