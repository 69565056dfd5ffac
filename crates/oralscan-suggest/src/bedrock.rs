use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::EnrichmentError;
use crate::generator::{BoxFuture, TextGenerator};

/// Converse-API backend on AWS Bedrock.
pub struct BedrockGenerator {
    client: Client,
    model_id: String,
    label: String,
}

impl BedrockGenerator {
    /// Returns `None` when the loaded AWS config has no credentials provider.
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Option<Self> {
        if config.credentials_provider().is_none() {
            debug!("no AWS credentials available for Bedrock");
            return None;
        }
        let model_id = model_id.into();
        Some(Self {
            client: Client::new(config),
            label: format!("bedrock:{model_id}"),
            model_id,
        })
    }

    async fn invoke_converse(&self, prompt: &str) -> Result<String, EnrichmentError> {
        let request_id = Uuid::new_v4();
        info!(request_id = %request_id, model = %self.model_id, "requesting suggestions from Bedrock");

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(
                Message::builder()
                    .role(ConversationRole::User)
                    .content(ContentBlock::Text(prompt.to_string()))
                    .build()
                    .map_err(|e| EnrichmentError::Invocation(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| EnrichmentError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| EnrichmentError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        debug!(request_id = %request_id, chars = text.len(), "Bedrock response received");
        Ok(text)
    }
}

impl TextGenerator for BedrockGenerator {
    fn name(&self) -> &str {
        &self.label
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, EnrichmentError>> {
        Box::pin(self.invoke_converse(prompt))
    }
}
