use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, PageMargin, Paragraph, Run, RunFonts, Style, StyleType};

use crate::error::ExportError;
use crate::report::{LabeledValue, ReportBlock, ReportDocument, ResultRow};
use crate::styles::DocumentStyles;

const SECTION_STYLE: &str = "Heading2";

/// Render a report document to DOCX bytes.
///
/// Blocks map to paragraphs in order. Every paragraph of the Analysis
/// Results block is marked keep-with-next and keep-lines so pagination never
/// splits the panel across pages.
pub fn generate_docx(
    document: &ReportDocument,
    styles: &DocumentStyles,
) -> Result<Vec<u8>, ExportError> {
    let margin = styles.margin_twips();
    let mut docx = Docx::new()
        .page_margin(
            PageMargin::new()
                .top(margin)
                .bottom(margin)
                .left(margin)
                .right(margin),
        )
        .add_style(section_style(styles));

    for block in &document.blocks {
        for paragraph in block_paragraphs(block, styles) {
            docx = docx.add_paragraph(paragraph);
        }
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

fn block_paragraphs(block: &ReportBlock, styles: &DocumentStyles) -> Vec<Paragraph> {
    match block {
        ReportBlock::Header {
            title,
            subtitle,
            generated,
            report_id,
            patient,
        } => {
            let mut paragraphs = vec![
                Paragraph::new().align(AlignmentType::Center).add_run(
                    text_run(title, &styles.heading_font, styles.title_size)
                        .bold()
                        .color(&styles.brand_color),
                ),
                Paragraph::new()
                    .align(AlignmentType::Center)
                    .add_run(text_run(subtitle, &styles.heading_font, styles.heading_size)),
                metadata_paragraph(generated, styles),
                metadata_paragraph(report_id, styles),
            ];
            paragraphs.extend(patient.iter().map(|row| metadata_paragraph(row, styles)));
            paragraphs
        }
        ReportBlock::AnalysisResults { rows } => {
            let mut paragraphs = vec![section_heading("ANALYSIS RESULTS")];
            paragraphs.extend(rows.iter().map(|row| result_paragraph(row, styles)));
            paragraphs
                .into_iter()
                .map(|p| p.keep_next(true).keep_lines(true))
                .collect()
        }
        ReportBlock::ClinicalSummary { text } => vec![
            section_heading("CLINICAL SUMMARY"),
            Paragraph::new().add_run(text_run(text, &styles.body_font, styles.body_size)),
        ],
        ReportBlock::Recommendations { items } => {
            let mut paragraphs = vec![section_heading("AI-GENERATED RECOMMENDATIONS")];
            for (index, item) in items.iter().enumerate() {
                paragraphs.push(Paragraph::new().keep_next(true).add_run(
                    text_run(
                        &format!("{}. {}", index + 1, item.title),
                        &styles.body_font,
                        styles.body_size,
                    )
                    .bold(),
                ));
                paragraphs.push(Paragraph::new().add_run(text_run(
                    &item.description,
                    &styles.body_font,
                    styles.body_size,
                )));
            }
            paragraphs
        }
        ReportBlock::Disclaimer { text } => vec![
            Paragraph::new().keep_next(true).add_run(
                text_run("\u{26a0} IMPORTANT DISCLAIMER", &styles.heading_font, styles.body_size)
                    .bold(),
            ),
            Paragraph::new().add_run(
                text_run(text, &styles.body_font, styles.small_size).italic(),
            ),
        ],
        ReportBlock::Footer { text } => vec![
            Paragraph::new().align(AlignmentType::Center).add_run(
                text_run(text, &styles.body_font, styles.small_size).color(&styles.muted_color),
            ),
        ],
    }
}

fn section_style(styles: &DocumentStyles) -> Style {
    Style::new(SECTION_STYLE, StyleType::Paragraph)
        .name("heading 2")
        .size(styles.heading_size * 2) // OOXML uses half-points
        .bold()
        .color(&styles.brand_color)
        .fonts(RunFonts::new().ascii(&styles.heading_font))
}

fn section_heading(text: &str) -> Paragraph {
    Paragraph::new()
        .style(SECTION_STYLE)
        .keep_next(true)
        .add_run(Run::new().add_text(text))
}

fn metadata_paragraph(row: &LabeledValue, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Center)
        .add_run(text_run(&row.label, &styles.body_font, styles.small_size).bold())
        .add_run(
            text_run(&format!(" {}", row.value), &styles.body_font, styles.small_size)
                .color(&styles.muted_color),
        )
}

fn result_paragraph(row: &ResultRow, styles: &DocumentStyles) -> Paragraph {
    Paragraph::new()
        .add_run(text_run(&row.label, &styles.body_font, styles.body_size).bold())
        .add_run(text_run(
            &format!(" {} ({}% confidence)", row.value, row.confidence),
            &styles.body_font,
            styles.body_size,
        ))
}

fn text_run(text: &str, font: &str, size_pt: usize) -> Run {
    Run::new()
        .add_text(text)
        .size(size_pt * 2)
        .fonts(RunFonts::new().ascii(font))
}
