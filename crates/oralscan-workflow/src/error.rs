use thiserror::Error;

use oralscan_classify::error::ClassificationError;
use oralscan_core::error::CoreError;
use oralscan_export::error::ExportError;

/// Errors returned to the caller without a `Failure` transition.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Please select an image first")]
    NoImage,

    #[error("an analysis is already in progress")]
    Busy,

    #[error("{0}")]
    InvalidInput(ClassificationError),

    #[error("not allowed while {0}")]
    InvalidState(&'static str),

    #[error("no analysis result is available yet")]
    NotReady,

    #[error("a report is already being generated")]
    ReportInProgress,

    #[error("invalid patient details: {0}")]
    PatientContext(#[from] CoreError),

    #[error("report generation failed: {0}")]
    Report(#[from] ExportError),

    #[error("background task failed: {0}")]
    Join(String),
}

impl From<tokio::task::JoinError> for WorkflowError {
    fn from(e: tokio::task::JoinError) -> Self {
        WorkflowError::Join(e.to_string())
    }
}
