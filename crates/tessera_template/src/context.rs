//! Values available to a URL template.

use crate::inflect::{pluralize, slugify, snake_case};
use base64::Engine;
use tessera_core::RecordContext;
use tessera_error::{TemplateError, TemplateErrorKind};

/// Record identity and file name a template is rendered against.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct TemplateContext {
    /// Owning record
    record: RecordContext,
    /// Original file name
    filename: String,
    /// Time used for the `hash` token
    now: chrono::DateTime<chrono::Utc>,
}

impl TemplateContext {
    /// Context for `filename` uploaded to `record`, stamped with the current time.
    pub fn new(record: RecordContext, filename: impl Into<String>) -> Self {
        Self {
            record,
            filename: filename.into(),
            now: chrono::Utc::now(),
        }
    }

    /// Pin the timestamp used for `hash`.
    pub fn with_now(mut self, now: chrono::DateTime<chrono::Utc>) -> Self {
        self.now = now;
        self
    }

    pub(crate) fn class(&self) -> String {
        pluralize(&snake_case(self.record.class_name()))
    }

    pub(crate) fn primary_key(&self) -> Result<&str, TemplateError> {
        self.record
            .primary_key()
            .as_deref()
            .filter(|pk| !pk.is_empty())
            .ok_or_else(|| {
                TemplateError::new(TemplateErrorKind::MissingContext {
                    placeholder: "primary_key".to_string(),
                    missing: "a primary key".to_string(),
                })
            })
    }

    pub(crate) fn primary_key_path(&self) -> Result<String, TemplateError> {
        let encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(self.primary_key()?);
        Ok(fan_out(&encoded))
    }

    pub(crate) fn column(&self) -> String {
        self.record.column().to_lowercase()
    }

    pub(crate) fn basename(&self) -> &str {
        let base = self.base();
        match base.rfind('.') {
            Some(dot) => &base[..dot],
            None => base,
        }
    }

    /// Extension including the dot, or empty.
    pub(crate) fn dotted_extension(&self) -> &str {
        let base = self.base();
        match base.rfind('.') {
            Some(dot) => &base[dot..],
            None => "",
        }
    }

    pub(crate) fn hash(&self) -> String {
        self.now.format("%Y%m%d%H%M%S%9f").to_string()
    }

    pub(crate) fn slug(&self) -> String {
        slugify(self.basename())
    }

    fn base(&self) -> &str {
        let trimmed = self.filename.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

/// Split an encoded key into segments of 2, 3 and 4 characters, followed
/// by whatever remains, to bound directory fan-out.
fn fan_out(encoded: &str) -> String {
    let mut rest = encoded;
    let mut parts = Vec::new();
    let mut i = 0;
    while rest.len() > 2 + i && parts.len() < 3 {
        let (head, tail) = rest.split_at(2 + i);
        parts.push(head);
        rest = tail;
        i += 1;
    }
    if !rest.is_empty() {
        parts.push(rest);
    }
    parts.join("/")
}
