use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

const MAX_AGE: u32 = 130;
const MAX_TEXT_LEN: usize = 500;

/// How long the lesion has been present, as reported by the patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DurationBucket {
    LessThanOneWeek,
    OneToFourWeeks,
    OneToSixMonths,
    MoreThanSixMonths,
}

impl DurationBucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::LessThanOneWeek => "Less than 1 week",
            Self::OneToFourWeeks => "1-4 weeks",
            Self::OneToSixMonths => "1-6 months",
            Self::MoreThanSixMonths => "More than 6 months",
        }
    }
}

/// Optional patient details collected before submission.
///
/// Never sent to the classifier; only rendered into the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Ordered so report rendering is stable.
    #[serde(default)]
    pub symptoms: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PatientContext {
    /// Trim text fields, drop blanks, and reject out-of-range values.
    pub fn normalized(self) -> Result<Self, CoreError> {
        if let Some(age) = self.age
            && age > MAX_AGE
        {
            return Err(CoreError::InvalidPatientContext(format!(
                "age {age} exceeds {MAX_AGE}"
            )));
        }

        let name = clean_text("name", self.name)?;
        let gender = clean_text("gender", self.gender)?;
        let notes = clean_text("notes", self.notes)?;

        let mut symptoms = BTreeSet::new();
        for symptom in self.symptoms {
            let trimmed = symptom.trim();
            if trimmed.is_empty() {
                return Err(CoreError::InvalidPatientContext(
                    "symptoms must not be blank".to_string(),
                ));
            }
            symptoms.insert(trimmed.to_string());
        }

        Ok(Self {
            name,
            age: self.age,
            gender,
            symptoms,
            duration: self.duration,
            notes,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.symptoms.is_empty()
            && self.duration.is_none()
            && self.notes.is_none()
    }
}

fn clean_text(field: &str, value: Option<String>) -> Result<Option<String>, CoreError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(CoreError::InvalidPatientContext(format!(
            "{field} exceeds {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}
