use tera::{Context, Tera};

use crate::error::ExportError;
use crate::report::ReportDocument;

const TEMPLATE_NAME: &str = "report.md";
const TEMPLATE: &str = include_str!("../templates/report.md");

/// Render the Markdown preview of a report document.
///
/// Autoescaping is off: the output is Markdown, not HTML.
pub fn render_markdown(document: &ReportDocument) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(document)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(TEMPLATE_NAME, &context)?;
    Ok(rendered)
}
