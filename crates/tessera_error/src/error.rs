//! Top-level error wrapper types.

use crate::{
    ConfigError, DecodeError, JsonError, StorageError, TemplateError, UnsupportedInputError,
    ValidationError,
};

/// Every failure a Tessera operation can surface.
///
/// # Examples
///
/// ```
/// use tessera_error::{TesseraError, TemplateError, TemplateErrorKind};
///
/// let err: TesseraError = TemplateError::new(TemplateErrorKind::Empty).into();
/// assert!(format!("{}", err).contains("Template Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TesseraErrorKind {
    /// Upload rejected by type, extension or size checks
    #[from(ValidationError)]
    Validation(ValidationError),
    /// URL template could not be rendered
    #[from(TemplateError)]
    Template(TemplateError),
    /// Image container could not be decoded or encoded
    #[from(DecodeError)]
    Decode(DecodeError),
    /// Storage backend failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Scan received a value of an unrecognized shape
    #[from(UnsupportedInputError)]
    UnsupportedInput(UnsupportedInputError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// Tessera error with kind discrimination.
///
/// # Examples
///
/// ```
/// use tessera_error::{ConfigError, TesseraResult};
///
/// fn might_fail() -> TesseraResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Tessera Error: {}", _0)]
pub struct TesseraError(Box<TesseraErrorKind>);

impl TesseraError {
    /// Create a new error from a kind.
    pub fn new(kind: TesseraErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TesseraErrorKind {
        &self.0
    }

    /// Whether this error reports a missing storage object.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind(),
            TesseraErrorKind::Storage(StorageError {
                kind: crate::StorageErrorKind::NotFound(_),
                ..
            })
        )
    }
}

// Generic From implementation for any type that converts to TesseraErrorKind
impl<T> From<T> for TesseraError
where
    T: Into<TesseraErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Tessera operations.
pub type TesseraResult<T> = std::result::Result<T, TesseraError>;
