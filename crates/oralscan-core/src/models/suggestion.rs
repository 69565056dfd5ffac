use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Number of suggestions in every list handed to the UI or the report.
pub const SUGGESTION_COUNT: usize = 4;

/// One health suggestion: a short display label plus advice text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
}

impl Suggestion {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Both fields carry visible text.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}
