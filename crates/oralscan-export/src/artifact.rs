use jiff::Timestamp;
use tracing::info;

use oralscan_core::models::result::ResultModel;
use oralscan_core::models::suggestion::Suggestion;

use crate::docx::generate_docx;
use crate::error::ExportError;
use crate::render::render_markdown;
use crate::report::{ReportDocument, build_report, report_filename};
use crate::styles::DocumentStyles;

/// A finished report, ready to be written to disk.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub filename: String,
    pub report_id: String,
    pub generated_at: Timestamp,
    pub docx: Vec<u8>,
    pub markdown: String,
    pub document: ReportDocument,
}

/// Build the block document and render both outputs.
///
/// CPU-bound; async callers should run it on the blocking pool.
pub fn synthesize(
    result: &ResultModel,
    suggestions: &[Suggestion],
    generated_at: Timestamp,
    styles: &DocumentStyles,
) -> Result<ReportArtifact, ExportError> {
    let document = build_report(result, suggestions, generated_at);
    let docx = generate_docx(&document, styles)?;
    let markdown = render_markdown(&document)?;

    info!(
        result_id = %result.id(),
        report_id = %document.report_id,
        bytes = docx.len(),
        "report synthesized"
    );

    Ok(ReportArtifact {
        filename: report_filename(generated_at),
        report_id: document.report_id.clone(),
        generated_at,
        docx,
        markdown,
        document,
    })
}
