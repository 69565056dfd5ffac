//! Builds the process-wide clients from config and hands them to the
//! orchestrator.

use std::sync::Arc;
use std::time::Duration;

use oralscan_classify::client::{ClassificationClient, ClientConfig};
use oralscan_suggest::bedrock::BedrockGenerator;
use oralscan_suggest::enricher::SuggestionEnricher;
use oralscan_suggest::gemini::GeminiGenerator;
use oralscan_suggest::generator::TextGenerator;
use oralscan_workflow::orchestrator::WorkflowOrchestrator;

use crate::config::{OralScanConfig, SuggestionSource};

const GEMINI_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_classifier(config: &OralScanConfig) -> eyre::Result<ClassificationClient> {
    let client = ClassificationClient::new(ClientConfig {
        base_url: config.classifier_url.clone(),
        timeout: Duration::from_secs(config.timeout_secs.max(1)),
        ..ClientConfig::default()
    })?;
    Ok(client)
}

/// Resolve the configured suggestion backend. A missing credential yields
/// `None`, which the enricher treats as "fallback only".
pub async fn build_generator(
    source: &SuggestionSource,
) -> eyre::Result<Option<Arc<dyn TextGenerator>>> {
    let generator: Option<Arc<dyn TextGenerator>> = match source {
        SuggestionSource::Gemini { api_key, model } => {
            GeminiGenerator::from_api_key(api_key.clone(), model.clone(), GEMINI_REQUEST_TIMEOUT)?
                .map(|g| Arc::new(g) as Arc<dyn TextGenerator>)
        }
        SuggestionSource::Bedrock { region, model_id } => {
            let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(region.clone()))
                .load()
                .await;
            BedrockGenerator::new(&sdk_config, model_id.clone())
                .map(|g| Arc::new(g) as Arc<dyn TextGenerator>)
        }
        SuggestionSource::Disabled => None,
    };

    match &generator {
        Some(g) => tracing::info!(backend = g.name(), "suggestion backend ready"),
        None => tracing::info!("no suggestion backend configured, fallback suggestions only"),
    }
    Ok(generator)
}

pub async fn build_orchestrator(config: &OralScanConfig) -> eyre::Result<WorkflowOrchestrator> {
    let classifier = Arc::new(build_classifier(config)?);
    let enricher = Arc::new(SuggestionEnricher::new(
        build_generator(&config.suggestions).await?,
    ));
    Ok(WorkflowOrchestrator::new(classifier, enricher))
}
