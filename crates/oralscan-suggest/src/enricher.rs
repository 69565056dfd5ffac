use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};
use uuid::Uuid;

use oralscan_core::models::bucket::Bucket;
use oralscan_core::models::result::ResultModel;
use oralscan_core::models::suggestion::Suggestion;

use crate::error::EnrichmentError;
use crate::fallback::fallback_suggestions;
use crate::generator::TextGenerator;
use crate::parse::extract_suggestions;
use crate::prompt::build_prompt;

pub const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(30);

struct CacheSlot {
    result_id: Uuid,
    cell: Arc<OnceCell<Vec<Suggestion>>>,
}

/// Produces exactly four suggestions for a result and never fails.
///
/// Holds at most one cached computation, keyed by result id. Concurrent
/// callers for the same result share the same `OnceCell`, so the backend is
/// asked once per result.
pub struct SuggestionEnricher {
    generator: Option<Arc<dyn TextGenerator>>,
    timeout: Duration,
    cache: Mutex<Option<CacheSlot>>,
}

impl SuggestionEnricher {
    /// `None` means no credential was found; every call returns the fallback
    /// set without touching the network.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_ENRICHMENT_TIMEOUT,
            cache: Mutex::new(None),
        }
    }

    /// An enricher that always serves fallback content.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_backend(&self) -> bool {
        self.generator.is_some()
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.name())
    }

    pub async fn suggest(&self, result: &ResultModel) -> Vec<Suggestion> {
        let cell = {
            let mut cache = self.cache.lock().await;
            match cache.as_ref() {
                Some(slot) if slot.result_id == result.id() => slot.cell.clone(),
                _ => {
                    let cell = Arc::new(OnceCell::new());
                    *cache = Some(CacheSlot {
                        result_id: result.id(),
                        cell: cell.clone(),
                    });
                    cell
                }
            }
        };

        cell.get_or_init(|| self.compute(result)).await.clone()
    }

    /// Drop any cached suggestions.
    pub async fn invalidate(&self) {
        if self.cache.lock().await.take().is_some() {
            debug!("suggestion cache invalidated");
        }
    }

    async fn compute(&self, result: &ResultModel) -> Vec<Suggestion> {
        let bucket = Bucket::of(result);

        let Some(generator) = self.generator.as_deref() else {
            debug!(result_id = %result.id(), bucket = ?bucket, "no suggestion backend, using fallback");
            return fallback_suggestions(bucket);
        };

        match self.request(generator, result, bucket).await {
            Ok(suggestions) => {
                info!(
                    result_id = %result.id(),
                    bucket = ?bucket,
                    backend = generator.name(),
                    "generated suggestions"
                );
                suggestions
            }
            Err(e) => {
                warn!(
                    result_id = %result.id(),
                    bucket = ?bucket,
                    backend = generator.name(),
                    error = %e,
                    "suggestion enrichment unavailable, using fallback"
                );
                fallback_suggestions(bucket)
            }
        }
    }

    async fn request(
        &self,
        generator: &dyn TextGenerator,
        result: &ResultModel,
        bucket: Bucket,
    ) -> Result<Vec<Suggestion>, EnrichmentError> {
        let prompt = build_prompt(bucket, result.level1().confidence);
        let text = tokio::time::timeout(self.timeout, generator.generate(&prompt))
            .await
            .map_err(|_| EnrichmentError::Timeout(self.timeout))??;
        extract_suggestions(&text)
    }
}
