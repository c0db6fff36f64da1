//! Unsupported scan input errors.

/// A value of an unrecognized shape was handed to a scan operation.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Unsupported Input: {} at line {} in {}", message, line, file)]
pub struct UnsupportedInputError {
    /// Description of the rejected value
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl UnsupportedInputError {
    /// Create a new UnsupportedInputError at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_error::UnsupportedInputError;
    ///
    /// let err = UnsupportedInputError::new("can't scan a number");
    /// assert!(err.message.contains("number"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
