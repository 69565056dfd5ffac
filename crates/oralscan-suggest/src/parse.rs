use serde::Deserialize;

use oralscan_core::models::suggestion::{SUGGESTION_COUNT, Suggestion};

use crate::error::EnrichmentError;

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    title: String,
    description: String,
}

/// Pull exactly [`SUGGESTION_COUNT`] suggestions out of free-form model text.
///
/// Models wrap JSON in prose or code fences, so this scans for the first `[`
/// from which a complete array of `{title, description}` objects parses,
/// ignoring anything after it. Extra elements are truncated; fewer than four
/// usable elements is a schema violation.
pub fn extract_suggestions(text: &str) -> Result<Vec<Suggestion>, EnrichmentError> {
    for (start, _) in text.match_indices('[') {
        let mut stream =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<Vec<RawSuggestion>>();

        let Some(Ok(items)) = stream.next() else {
            continue;
        };

        let usable: Vec<Suggestion> = items
            .into_iter()
            .map(|raw| Suggestion::new(raw.title.trim(), raw.description.trim()))
            .filter(Suggestion::is_usable)
            .take(SUGGESTION_COUNT)
            .collect();

        if usable.len() < SUGGESTION_COUNT {
            return Err(EnrichmentError::SchemaViolation(format!(
                "expected {SUGGESTION_COUNT} suggestions, got {}",
                usable.len()
            )));
        }

        return Ok(usable);
    }

    Err(EnrichmentError::ResponseParse(
        "no JSON array of suggestions found in response".to_string(),
    ))
}
