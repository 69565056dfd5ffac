//! The report as an ordered list of blocks.
//!
//! Building the document is pure: identical inputs and the same
//! `generated_at` produce an identical `ReportDocument`. Renderers walk the
//! blocks in order and never reorder or drop them.

use jiff::Timestamp;
use serde::Serialize;

use oralscan_core::models::bucket::Bucket;
use oralscan_core::models::patient::PatientContext;
use oralscan_core::models::result::{Level2Result, ResultModel};
use oralscan_core::models::suggestion::Suggestion;

use crate::summary::{DISCLAIMER, clinical_summary};

pub const BRAND: &str = "OralScan AI";
pub const SUBTITLE: &str = "Oral Lesion Analysis Report";
pub const FOOTER: &str = "Generated by OralScan AI - Oral Lesion Classification System";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

impl LabeledValue {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// One line of the Analysis Results panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub label: String,
    pub value: String,
    /// Percentage with one decimal place, without the `%` sign.
    pub confidence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Header,
    AnalysisResults,
    ClinicalSummary,
    Recommendations,
    Disclaimer,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBlock {
    Header {
        title: String,
        subtitle: String,
        generated: LabeledValue,
        report_id: LabeledValue,
        patient: Vec<LabeledValue>,
    },
    AnalysisResults {
        rows: Vec<ResultRow>,
    },
    ClinicalSummary {
        text: String,
    },
    Recommendations {
        items: Vec<Suggestion>,
    },
    Disclaimer {
        text: String,
    },
    Footer {
        text: String,
    },
}

impl ReportBlock {
    pub fn kind(&self) -> BlockKind {
        match self {
            Self::Header { .. } => BlockKind::Header,
            Self::AnalysisResults { .. } => BlockKind::AnalysisResults,
            Self::ClinicalSummary { .. } => BlockKind::ClinicalSummary,
            Self::Recommendations { .. } => BlockKind::Recommendations,
            Self::Disclaimer { .. } => BlockKind::Disclaimer,
            Self::Footer { .. } => BlockKind::Footer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDocument {
    pub report_id: String,
    pub generated_at: Timestamp,
    pub blocks: Vec<ReportBlock>,
}

impl ReportDocument {
    pub fn block_kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(ReportBlock::kind).collect()
    }
}

pub fn build_report(
    result: &ResultModel,
    suggestions: &[Suggestion],
    generated_at: Timestamp,
) -> ReportDocument {
    let report_id = report_id(generated_at);
    let bucket = Bucket::of(result);

    let mut blocks = vec![
        ReportBlock::Header {
            title: BRAND.to_string(),
            subtitle: SUBTITLE.to_string(),
            generated: LabeledValue::new("Report Generated:", format_generated(generated_at)),
            report_id: LabeledValue::new("Report ID:", report_id.clone()),
            patient: result
                .patient_context()
                .map(patient_rows)
                .unwrap_or_default(),
        },
        ReportBlock::AnalysisResults {
            rows: result_rows(result),
        },
        ReportBlock::ClinicalSummary {
            text: clinical_summary(bucket).to_string(),
        },
    ];

    if !suggestions.is_empty() {
        blocks.push(ReportBlock::Recommendations {
            items: suggestions.to_vec(),
        });
    }

    blocks.push(ReportBlock::Disclaimer {
        text: DISCLAIMER.to_string(),
    });
    blocks.push(ReportBlock::Footer {
        text: FOOTER.to_string(),
    });

    ReportDocument {
        report_id,
        generated_at,
        blocks,
    }
}

/// `ORL-` followed by the generation time in epoch milliseconds, base 36,
/// uppercase.
pub fn report_id(generated_at: Timestamp) -> String {
    let millis = generated_at.as_millisecond().max(0) as u64;
    format!("ORL-{}", to_base36(millis))
}

/// `OralScan_Report_<YYYY-MM-DD>.docx`, dated in UTC.
pub fn report_filename(generated_at: Timestamp) -> String {
    format!("OralScan_Report_{}.docx", generated_at.strftime("%Y-%m-%d"))
}

fn format_generated(generated_at: Timestamp) -> String {
    generated_at.strftime("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn result_rows(result: &ResultModel) -> Vec<ResultRow> {
    let level1 = result.level1();
    let mut rows = vec![ResultRow {
        label: "Level 1 Classification:".to_string(),
        value: level1.classification.label().to_string(),
        confidence: level1.confidence.to_string(),
    }];

    // A failed second stage has nothing to show; the row is omitted.
    if let Some(Level2Result::Classified {
        classification,
        confidence,
        ..
    }) = result.level2()
    {
        rows.push(ResultRow {
            label: "Level 2 Classification:".to_string(),
            value: classification.label().to_string(),
            confidence: confidence.to_string(),
        });
    }

    rows
}

fn patient_rows(ctx: &PatientContext) -> Vec<LabeledValue> {
    let mut rows = Vec::new();
    if let Some(name) = &ctx.name {
        rows.push(LabeledValue::new("Patient Name:", name.as_str()));
    }
    if let Some(age) = ctx.age {
        rows.push(LabeledValue::new("Age:", age.to_string()));
    }
    if let Some(gender) = &ctx.gender {
        rows.push(LabeledValue::new("Gender:", gender.as_str()));
    }
    if !ctx.symptoms.is_empty() {
        let symptoms = ctx
            .symptoms
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(LabeledValue::new("Symptoms:", symptoms));
    }
    if let Some(duration) = ctx.duration {
        rows.push(LabeledValue::new("Duration:", duration.label()));
    }
    if let Some(notes) = &ctx.notes {
        rows.push(LabeledValue::new("Notes:", notes.as_str()));
    }
    rows
}
