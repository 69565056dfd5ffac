use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::result::{LesionClassification, ResultModel};

/// Narrative category of a result. Both the suggestion fallback sets and the
/// report summary prose are selected from this, so they never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Bucket {
    Healthy,
    Malignant,
    /// Unhealthy and not malignant, including a failed second stage.
    Benign,
}

impl Bucket {
    pub fn of(result: &ResultModel) -> Self {
        if result.is_healthy() {
            return Self::Healthy;
        }
        match result.level2().and_then(|l2| l2.classification()) {
            Some(LesionClassification::Malignant) => Self::Malignant,
            _ => Self::Benign,
        }
    }

    /// Short phrase describing the finding, used in generation prompts.
    pub fn finding(self) -> &'static str {
        match self {
            Self::Healthy => "healthy oral tissue",
            Self::Malignant => "potentially malignant lesion detected",
            Self::Benign => "benign lesion detected",
        }
    }
}
