//! Classifier response envelope and its mapping into `ResultModel`.
//!
//! The service speaks snake_case JSON:
//!
//! ```text
//! { "success": true,
//!   "level1": { "classification": "unhealthy", "confidence": 84.4, "is_healthy": false },
//!   "level2": { "classification": "malignant", "confidence": 88.0, "is_malignant": true },
//!   "final_result": "malignant" }
//! ```
//!
//! `level2` is `null` for healthy tissue and `{ "error": ..., "message": ... }`
//! when the second stage itself failed. Every field is optional on the wire;
//! the mapping below decides what a missing value means.

use serde::Deserialize;
use tracing::debug;

use oralscan_core::models::confidence::Confidence;
use oralscan_core::models::result::{
    LesionClassification, Level1Result, Level2Result, ResultModel,
};

use crate::error::ClassificationError;

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub level1: Option<WireLevel1>,
    #[serde(default)]
    pub level2: Option<WireLevel2>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLevel1 {
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub is_healthy: Option<bool>,
    #[serde(default)]
    pub confidence: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLevel2 {
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub is_malignant: Option<bool>,
    #[serde(default)]
    pub confidence: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ClassifyEnvelope {
    /// Server-supplied reason for a rejection, if any.
    pub fn rejection_reason(&self) -> Option<String> {
        self.error.clone().or_else(|| self.message.clone())
    }

    pub fn into_result(self) -> Result<ResultModel, ClassificationError> {
        if !self.success {
            return Err(ClassificationError::ServerRejected(
                self.rejection_reason()
                    .unwrap_or_else(|| "Analysis failed".to_string()),
            ));
        }

        let level1 = self.level1.ok_or_else(|| {
            ClassificationError::ServerRejected(
                "The classifier response did not include a level 1 result.".to_string(),
            )
        })?;

        let is_healthy = level1.is_healthy.unwrap_or_else(|| {
            level1
                .classification
                .as_deref()
                .is_some_and(|c| c.trim().eq_ignore_ascii_case("healthy"))
        });
        let level1 = Level1Result::new(is_healthy, parse_confidence(level1.confidence.as_ref()));

        let level2 = if is_healthy {
            if self.level2.is_some() {
                debug!("ignoring level 2 payload on a healthy result");
            }
            None
        } else {
            Some(match self.level2 {
                Some(wire) => wire.into_level2(),
                None => Level2Result::failed("The second-stage classification was not returned."),
            })
        };

        ResultModel::new(level1, level2)
            .map_err(|e| ClassificationError::ServerRejected(e.to_string()))
    }
}

impl WireLevel2 {
    fn into_level2(self) -> Level2Result {
        if let Some(error) = self.error {
            return Level2Result::failed(error);
        }
        if self.classification.is_none() && self.is_malignant.is_none() {
            return Level2Result::failed(
                self.message
                    .unwrap_or_else(|| "Malignant/Benign classification failed".to_string()),
            );
        }

        let confidence = parse_confidence(self.confidence.as_ref());
        let classification = self
            .classification
            .as_deref()
            .and_then(LesionClassification::parse)
            .or(match self.is_malignant {
                Some(true) => Some(LesionClassification::Malignant),
                Some(false) => Some(LesionClassification::Benign),
                None => None,
            });

        match classification {
            Some(c) => Level2Result::classified(c, confidence),
            None => Level2Result::failed(format!(
                "Unrecognized level 2 classification: {}",
                self.classification.as_deref().unwrap_or("<missing>")
            )),
        }
    }
}

/// Accept a number, or a numeric string with an optional trailing `%`.
/// Anything else becomes 0.
fn parse_confidence(raw: Option<&serde_json::Value>) -> Confidence {
    let value = raw.and_then(|v| {
        v.as_f64().or_else(|| {
            v.as_str()
                .and_then(|s| s.trim().trim_end_matches('%').trim().parse::<f64>().ok())
        })
    });
    Confidence::from_raw(value)
}
