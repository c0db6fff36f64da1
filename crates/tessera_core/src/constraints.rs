//! Upload constraints declared by an asset kind or a field.

use crate::{FieldOptions, extension_of};
use tessera_error::{ByteSize, ConfigError, ValidationErrorKind};

/// Accepted MIME types, extensions and maximum size for an upload.
///
/// Each constraint is optional; absent constraints are not checked.
///
/// # Examples
///
/// ```
/// use tessera_core::ConstraintsBuilder;
///
/// let constraints = ConstraintsBuilder::default()
///     .max_size(1024u64)
///     .exts(vec!["png".to_string()])
///     .build()
///     .unwrap();
///
/// assert!(constraints.check("photo.png", None, 512).is_ok());
/// assert!(constraints.check("photo.gif", None, 512).is_err());
/// assert!(constraints.check("photo.png", None, 4096).is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(default, setter(into, strip_option))]
pub struct Constraints {
    /// Maximum size in bytes
    max_size: Option<u64>,
    /// Accepted MIME types, lowercased
    types: Option<Vec<String>>,
    /// Accepted extensions, lowercased without dots
    exts: Option<Vec<String>>,
}

impl Constraints {
    /// No constraints at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Constraints from their parts.
    pub fn new(
        max_size: Option<u64>,
        types: Option<Vec<String>>,
        exts: Option<Vec<String>>,
    ) -> Self {
        Self {
            max_size,
            types,
            exts,
        }
    }

    /// Field options override the corresponding constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the `max_size` option is malformed.
    pub fn overridden_by(&self, options: &FieldOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            max_size: options.max_size()?.or(self.max_size),
            types: options.accepted_types().or_else(|| self.types.clone()),
            exts: options.accepted_exts().or_else(|| self.exts.clone()),
        })
    }

    /// Whether any constraint is declared.
    pub fn is_empty(&self) -> bool {
        self.max_size.is_none() && self.types.is_none() && self.exts.is_none()
    }

    /// Run the type, extension and size checks, in that order.
    ///
    /// The MIME type is taken from `content_type` when given, otherwise
    /// guessed from the file name. The type check is skipped when no
    /// type can be determined.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn check(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        size: u64,
    ) -> Result<(), ValidationErrorKind> {
        if let Some(types) = &self.types {
            let mime = match content_type {
                Some(ct) => essence(ct),
                None => mime_guess::from_path(file_name)
                    .first_raw()
                    .map(str::to_string)
                    .unwrap_or_default(),
            };
            if !mime.is_empty() && !types.iter().any(|t| *t == mime) {
                return Err(ValidationErrorKind::InvalidType(mime));
            }
        }

        if let Some(exts) = &self.exts {
            let ext = extension_of(file_name);
            if !exts.iter().any(|e| *e == ext) {
                return Err(ValidationErrorKind::InvalidExtension(ext));
            }
        }

        match self.max_size {
            Some(limit) if size > limit => {
                return Err(ValidationErrorKind::TooLarge {
                    limit: ByteSize(limit),
                    actual: ByteSize(size),
                });
            }
            _ => {}
        }

        Ok(())
    }
}

fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_like() -> Constraints {
        ConstraintsBuilder::default()
            .max_size(1024u64 * 1024)
            .types(vec!["image/jpeg".to_string(), "image/png".to_string()])
            .exts(vec!["jpg".to_string(), "png".to_string()])
            .build()
            .unwrap()
    }

    #[test]
    fn type_check_runs_before_extension_check() {
        let err = image_like().check("photo.gif", None, 10).unwrap_err();
        assert_eq!(err, ValidationErrorKind::InvalidType("image/gif".to_string()));
    }

    #[test]
    fn explicit_content_type_parameters_are_ignored() {
        assert!(
            image_like()
                .check("photo.png", Some("image/PNG; charset=binary"), 10)
                .is_ok()
        );
    }

    #[test]
    fn unknown_type_skips_type_check() {
        let err = image_like().check("photo.qqq", None, 10).unwrap_err();
        assert_eq!(err, ValidationErrorKind::InvalidExtension("qqq".to_string()));
    }

    #[test]
    fn options_override_defaults() {
        let options = FieldOptions::parse("max_size:10;exts:gif");
        let constraints = image_like().overridden_by(&options).unwrap();
        assert_eq!(*constraints.max_size(), Some(10));
        assert_eq!(*constraints.exts(), Some(vec!["gif".to_string()]));
        assert_eq!(constraints.types(), image_like().types());
    }
}
