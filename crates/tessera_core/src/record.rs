//! Identity of the record that owns a media field.

/// Read-only view of the owning record needed to render storage paths.
///
/// # Examples
///
/// ```
/// use tessera_core::RecordContextBuilder;
///
/// let ctx = RecordContextBuilder::default()
///     .class_name("UserProfile")
///     .primary_key("42")
///     .column("Avatar")
///     .build()
///     .unwrap();
///
/// assert_eq!(ctx.primary_key().as_deref(), Some("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct RecordContext {
    /// Type name of the record, e.g. `UserProfile`
    class_name: String,
    /// Primary key, absent before the first insert
    #[builder(default, setter(into, strip_option))]
    primary_key: Option<String>,
    /// Field or column holding the media value
    column: String,
}

impl RecordContext {
    /// Create a context directly.
    pub fn new(
        class_name: impl Into<String>,
        primary_key: Option<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            primary_key,
            column: column.into(),
        }
    }

    /// The same record under a different column.
    pub fn for_column(&self, column: impl Into<String>) -> Self {
        Self {
            class_name: self.class_name.clone(),
            primary_key: self.primary_key.clone(),
            column: column.into(),
        }
    }
}
