//! Image decode and encode error types.

/// Kinds of image container failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DecodeErrorKind {
    /// Extension does not map to a supported container
    #[display("Unsupported image format: {}", _0)]
    UnsupportedFormat(String),
    /// Bytes could not be decoded
    #[display("Corrupt image data: {}", _0)]
    Corrupt(String),
    /// Rendition could not be encoded
    #[display("Failed to encode image: {}", _0)]
    Encode(String),
}

/// Decode error with location tracking.
///
/// # Examples
///
/// ```
/// use tessera_error::{DecodeError, DecodeErrorKind};
///
/// let err = DecodeError::new(DecodeErrorKind::UnsupportedFormat("webp".to_string()));
/// assert!(err.to_string().contains("Unsupported image format: webp"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Decode Error: {} at line {} in {}", kind, line, file)]
pub struct DecodeError {
    /// The kind of error that occurred
    pub kind: DecodeErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DecodeError {
    /// Create a new decode error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DecodeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
