use thiserror::Error;

/// Why enrichment fell back to the fixed suggestion set. Never surfaced to
/// the user; the enricher logs it and returns fallback content.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("suggestion service unavailable: {0}")]
    Unavailable(String),

    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("suggestion request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("response did not conform to expected schema: {0}")]
    SchemaViolation(String),
}
