use std::sync::Arc;

use uuid::Uuid;

use oralscan_classify::error::ClassificationErrorKind;
use oralscan_core::models::result::ResultModel;
use oralscan_core::models::suggestion::Suggestion;

/// Exactly one of these is active per session.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    ImageSelected,
    /// Request in flight; covers both upload and server-side analysis.
    Uploading,
    Success(Arc<ResultModel>),
    Failure {
        kind: ClassificationErrorKind,
        message: String,
    },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ImageSelected => "image_selected",
            Self::Uploading => "uploading",
            Self::Success(_) => "success",
            Self::Failure { .. } => "failure",
        }
    }

    pub fn result(&self) -> Option<&Arc<ResultModel>> {
        match self {
            Self::Success(result) => Some(result),
            _ => None,
        }
    }
}

/// The image held for submission. Bytes stay in memory for the session only.
#[derive(Debug, Clone)]
pub struct ImageSelection {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl ImageSelection {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Short description for display, e.g. `lesion.jpg (image/jpeg, 2.1 KiB)`.
    pub fn preview(&self) -> String {
        let size = self.bytes.len() as f64 / 1024.0;
        format!(
            "{} ({}, {size:.1} KiB)",
            self.file_name.as_deref().unwrap_or("image"),
            self.mime_type
        )
    }
}

/// Result of a `submit` call that reached the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Completed(Arc<ResultModel>),
    Failed {
        kind: ClassificationErrorKind,
        message: String,
    },
    /// A request was already outstanding; nothing was sent.
    AlreadyInFlight,
    /// The session was reset while the request was outstanding; the
    /// response was discarded.
    Superseded,
}

/// Published on the suggestions channel once enrichment finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionsReady {
    pub result_id: Uuid,
    pub suggestions: Vec<Suggestion>,
}
