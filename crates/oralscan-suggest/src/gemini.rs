//! Google Generative Language backend (`models/{model}:generateContent`).

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::EnrichmentError;
use crate::generator::{BoxFuture, TextGenerator};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

pub struct GeminiGenerator {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    label: String,
}

impl GeminiGenerator {
    /// Returns `None` when no usable API key is configured, so callers can
    /// skip the network entirely.
    pub fn from_api_key(
        api_key: Option<String>,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Option<Self>, EnrichmentError> {
        let Some(api_key) = api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
        else {
            debug!("no Gemini API key configured");
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| EnrichmentError::Unavailable(format!("HTTP client init failed: {e}")))?;

        let model = model.into();
        Ok(Some(Self {
            http,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            label: format!("gemini:{model}"),
            model,
            api_key,
        }))
    }

    /// Point the generator at a different endpoint root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, prompt: &str) -> Result<String, EnrichmentError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| EnrichmentError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), model = %self.model, "Gemini request rejected");
            return Err(EnrichmentError::Invocation(format!(
                "Gemini returned HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::ResponseParse(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| EnrichmentError::ResponseParse("no text in Gemini response".to_string()))?;

        Ok(text)
    }
}

impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        &self.label
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, EnrichmentError>> {
        Box::pin(self.invoke(prompt))
    }
}
