//! Template parsing and rendering.

use crate::TemplateContext;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use tessera_error::{TemplateError, TemplateErrorKind, TesseraResult};

/// Template used when a field does not override it.
pub const DEFAULT_URL_TEMPLATE: &str = "/system/{class}/{primary_key_path}/{column}/{filename_slug}";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}|\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}")
        .expect("Valid placeholder regex")
});

static URL_UNSAFE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s|\+)+").expect("Valid separator regex"));

/// A named substitution.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Placeholder {
    /// Pluralised snake case record type
    Class,
    /// Primary key as text
    PrimaryKey,
    /// Fanned-out base64 primary key
    PrimaryKeyPath,
    /// Lowercased column name
    Column,
    /// Original file name
    Filename,
    /// Slug plus original extension
    FilenameSlug,
    /// File name without extension
    Basename,
    /// Extension without the dot
    Extension,
    /// Timestamp token
    Hash,
    /// `slug.hash.ext`
    FilenameWithHash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed URL template.
///
/// # Examples
///
/// ```
/// use tessera_core::RecordContext;
/// use tessera_template::{TemplateContext, UrlTemplate};
///
/// let template = UrlTemplate::parse("/files/{{column}}/{basename}.{extension}").unwrap();
/// let ctx = TemplateContext::new(RecordContext::new("Post", None, "Cover"), "a b.jpg");
/// assert_eq!(template.render(&ctx).unwrap(), "/files/cover/a b.jpg");
///
/// assert!(UrlTemplate::parse("/files/{nope}").is_err());
/// assert!(UrlTemplate::parse("/files/{column").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// `UnknownPlaceholder` for a name outside [`Placeholder`], `Parse` for
    /// an unbalanced brace.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut last = 0;
        for cap in PLACEHOLDER.captures_iter(source) {
            let Some(whole) = cap.get(0) else { continue };
            push_literal(&mut segments, source, &source[last..whole.start()])?;

            let name = cap
                .get(1)
                .or_else(|| cap.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            let placeholder = Placeholder::from_str(name).map_err(|_| {
                TemplateError::new(TemplateErrorKind::UnknownPlaceholder(name.to_string()))
            })?;
            segments.push(Segment::Placeholder(placeholder));
            last = whole.end();
        }
        push_literal(&mut segments, source, &source[last..])?;

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Template text as given.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholders used, in order of appearance.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(p) => Some(*p),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Whether rendering needs the record's primary key.
    pub fn needs_primary_key(&self) -> bool {
        self.placeholders()
            .iter()
            .any(|p| matches!(p, Placeholder::PrimaryKey | Placeholder::PrimaryKeyPath))
    }

    /// Render the template.
    ///
    /// # Errors
    ///
    /// `MissingContext` when a placeholder needs a primary key the record
    /// does not have yet, `Empty` when the result is empty.
    #[tracing::instrument(skip(self, ctx), fields(template = %self.source, filename = %ctx.filename()))]
    pub fn render(&self, ctx: &TemplateContext) -> TesseraResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(p) => out.push_str(&substitute(*p, ctx)?),
            }
        }

        if out.trim().is_empty() {
            return Err(TemplateError::new(TemplateErrorKind::Empty).into());
        }

        tracing::debug!(url = %out, "Rendered URL template");
        Ok(out)
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_URL_TEMPLATE.to_string(),
            segments: vec![
                Segment::Literal("/system/".to_string()),
                Segment::Placeholder(Placeholder::Class),
                Segment::Literal("/".to_string()),
                Segment::Placeholder(Placeholder::PrimaryKeyPath),
                Segment::Literal("/".to_string()),
                Segment::Placeholder(Placeholder::Column),
                Segment::Literal("/".to_string()),
                Segment::Placeholder(Placeholder::FilenameSlug),
            ],
        }
    }
}

impl FromStr for UrlTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn push_literal(
    segments: &mut Vec<Segment>,
    source: &str,
    text: &str,
) -> Result<(), TemplateError> {
    if text.contains('{') || text.contains('}') {
        return Err(TemplateError::new(TemplateErrorKind::Parse {
            template: source.to_string(),
            reason: format!("unbalanced brace in '{}'", text),
        }));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}

fn substitute(placeholder: Placeholder, ctx: &TemplateContext) -> TesseraResult<String> {
    let value = match placeholder {
        Placeholder::Class => ctx.class(),
        Placeholder::PrimaryKey => ctx.primary_key()?.to_string(),
        Placeholder::PrimaryKeyPath => ctx.primary_key_path()?,
        Placeholder::Column => ctx.column(),
        Placeholder::Filename => ctx.filename().clone(),
        Placeholder::FilenameSlug => url_safe(&format!("{}{}", ctx.slug(), ctx.dotted_extension())),
        Placeholder::Basename => ctx.basename().to_string(),
        Placeholder::Extension => ctx
            .dotted_extension()
            .trim_start_matches('.')
            .to_string(),
        Placeholder::Hash => ctx.hash(),
        Placeholder::FilenameWithHash => url_safe(&format!(
            "{}.{}{}",
            ctx.slug(),
            ctx.hash(),
            ctx.dotted_extension()
        )),
    };
    Ok(value)
}

/// Collapse whitespace and `+` runs into `-`.
fn url_safe(text: &str) -> String {
    URL_UNSAFE_RUN.replace_all(text, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn default_matches_parsed_default() {
        assert_eq!(
            UrlTemplate::parse(DEFAULT_URL_TEMPLATE).unwrap(),
            UrlTemplate::default()
        );
    }

    #[test]
    fn every_placeholder_parses_in_both_forms() {
        for p in Placeholder::iter() {
            let single = UrlTemplate::parse(&format!("/{{{}}}", p)).unwrap();
            let double = UrlTemplate::parse(&format!("/{{{{ {} }}}}", p)).unwrap();
            assert_eq!(single.placeholders(), vec![p]);
            assert_eq!(double.placeholders(), vec![p]);
        }
    }

    #[test]
    fn url_safe_collapses_runs() {
        assert_eq!(url_safe("a + b\tc"), "a-b-c");
        assert_eq!(url_safe("plain"), "plain");
    }
}
