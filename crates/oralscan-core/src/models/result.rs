use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::confidence::Confidence;
use super::patient::PatientContext;
use crate::error::CoreError;

/// First-stage classification: tissue health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum HealthClassification {
    Healthy,
    Unhealthy,
}

impl HealthClassification {
    pub fn label(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Unhealthy => "Unhealthy",
        }
    }
}

/// Second-stage classification: lesion malignancy category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LesionClassification {
    Benign,
    Malignant,
}

impl LesionClassification {
    pub fn label(self) -> &'static str {
        match self {
            Self::Benign => "Benign",
            Self::Malignant => "Malignant",
        }
    }

    /// Parse a classifier label, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "benign" => Some(Self::Benign),
            "malignant" => Some(Self::Malignant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Level1Result {
    pub classification: HealthClassification,
    pub is_healthy: bool,
    pub confidence: Confidence,
}

impl Level1Result {
    /// Build a level-1 result whose label always agrees with `is_healthy`.
    pub fn new(is_healthy: bool, confidence: Confidence) -> Self {
        let classification = if is_healthy {
            HealthClassification::Healthy
        } else {
            HealthClassification::Unhealthy
        };
        Self {
            classification,
            is_healthy,
            confidence,
        }
    }
}

/// Outcome of the second stage. A failed stage carries only its error, so
/// "error set" and "classification present" cannot both hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum Level2Result {
    Classified {
        classification: LesionClassification,
        is_malignant: bool,
        confidence: Confidence,
    },
    Failed {
        error: String,
    },
}

impl Level2Result {
    pub fn classified(classification: LesionClassification, confidence: Confidence) -> Self {
        Self::Classified {
            classification,
            is_malignant: classification == LesionClassification::Malignant,
            confidence,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn classification(&self) -> Option<LesionClassification> {
        match self {
            Self::Classified { classification, .. } => Some(*classification),
            Self::Failed { .. } => None,
        }
    }

    pub fn confidence(&self) -> Option<Confidence> {
        match self {
            Self::Classified { confidence, .. } => Some(*confidence),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_malignant(&self) -> bool {
        matches!(self, Self::Classified { is_malignant: true, .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Classified { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// The two-level classification outcome. Immutable once built: fields are
/// private and every constructor checks the level1/level2 invariant.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ResultModel {
    id: Uuid,
    level1: Level1Result,
    #[serde(skip_serializing_if = "Option::is_none")]
    level2: Option<Level2Result>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patient_context: Option<PatientContext>,
    classified_at: jiff::Timestamp,
}

impl ResultModel {
    /// Validate and freeze a classification outcome.
    ///
    /// Healthy tissue must not carry a second stage; unhealthy tissue must
    /// carry one (classified or failed). Labels must agree with their flags.
    pub fn new(level1: Level1Result, level2: Option<Level2Result>) -> Result<Self, CoreError> {
        if (level1.classification == HealthClassification::Healthy) != level1.is_healthy {
            return Err(CoreError::InvariantViolation(format!(
                "level 1 label {} disagrees with is_healthy={}",
                level1.classification.label(),
                level1.is_healthy
            )));
        }
        if let Some(Level2Result::Classified {
            classification,
            is_malignant,
            ..
        }) = &level2
            && (*classification == LesionClassification::Malignant) != *is_malignant
        {
            return Err(CoreError::InvariantViolation(format!(
                "level 2 label {} disagrees with is_malignant={is_malignant}",
                classification.label()
            )));
        }

        match (level1.is_healthy, &level2) {
            (true, Some(_)) => {
                return Err(CoreError::InvariantViolation(
                    "healthy result must not carry a level 2 outcome".to_string(),
                ));
            }
            (false, None) => {
                return Err(CoreError::InvariantViolation(
                    "unhealthy result requires a level 2 outcome".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            id: Uuid::new_v4(),
            level1,
            level2,
            patient_context: None,
            classified_at: jiff::Timestamp::now(),
        })
    }

    /// Shorthand for a healthy result, which by definition has no level 2.
    pub fn healthy(confidence: Confidence) -> Self {
        Self {
            id: Uuid::new_v4(),
            level1: Level1Result::new(true, confidence),
            level2: None,
            patient_context: None,
            classified_at: jiff::Timestamp::now(),
        }
    }

    /// Return a copy carrying the patient context. Identity is preserved so
    /// suggestion caching keyed on [`ResultModel::id`] still applies.
    pub fn with_patient_context(mut self, context: Option<PatientContext>) -> Self {
        self.patient_context = context;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn level1(&self) -> &Level1Result {
        &self.level1
    }

    pub fn level2(&self) -> Option<&Level2Result> {
        self.level2.as_ref()
    }

    pub fn patient_context(&self) -> Option<&PatientContext> {
        self.patient_context.as_ref()
    }

    pub fn classified_at(&self) -> jiff::Timestamp {
        self.classified_at
    }

    pub fn is_healthy(&self) -> bool {
        self.level1.is_healthy
    }
}
