//! `tessera url` handler.

use tessera::{RecordContext, TemplateContext, TesseraConfig, TesseraResult, UrlTemplate, style_url};

/// Render the storage path of `filename` for a record column.
#[tracing::instrument(skip(config))]
pub fn render_url(
    config: &TesseraConfig,
    class: &str,
    id: Option<&str>,
    column: &str,
    filename: &str,
    template: Option<&str>,
    style: Option<&str>,
) -> TesseraResult<String> {
    let template = match template {
        Some(source) => UrlTemplate::parse(source)?,
        None => config.url_template()?,
    };
    let record = RecordContext::new(class, id.map(str::to_string), column);
    let url = template.render(&TemplateContext::new(record, filename))?;
    Ok(match style {
        Some(style) => style_url(&url, style),
        None => url,
    })
}
