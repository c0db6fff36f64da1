//! URL template error types.

/// Kinds of URL template failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TemplateErrorKind {
    /// Template text is malformed
    #[display("Malformed template '{}': {}", template, reason)]
    Parse {
        /// Template source
        template: String,
        /// What is wrong with it
        reason: String,
    },
    /// Template names a substitution that does not exist
    #[display("Unknown placeholder '{{{}}}'", _0)]
    UnknownPlaceholder(String),
    /// Substitution needs context that was not supplied
    #[display("Placeholder '{{{}}}' requires {}", placeholder, missing)]
    MissingContext {
        /// Placeholder being rendered
        placeholder: String,
        /// Context value that was absent
        missing: String,
    },
    /// Rendering produced an empty path
    #[display("invalid URL: template rendered an empty path")]
    Empty,
}

/// URL template error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {} at line {} in {}", kind, line, file)]
pub struct TemplateError {
    /// The kind of error that occurred
    pub kind: TemplateErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new template error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TemplateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
