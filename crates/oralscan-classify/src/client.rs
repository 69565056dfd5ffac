use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use oralscan_core::models::result::ResultModel;

use crate::classifier::{BoxFuture, Classifier};
use crate::error::ClassificationError;
use crate::validate::{upload_filename, validate_image};
use crate::wire::{ClassifyEnvelope, HealthEnvelope};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const CLASSIFY_PATH: &str = "api/classify";
const HEALTH_PATH: &str = "api/health";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the classifier lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Capped at `timeout`.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Classifier liveness as reported by `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub message: Option<String>,
}

/// HTTP client for the remote two-stage classifier.
///
/// Built once by the composition root and shared; the underlying
/// `reqwest::Client` pools connections internally.
#[derive(Debug, Clone)]
pub struct ClassificationClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ClassificationClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClassificationError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout.min(config.timeout))
            .build()
            .map_err(|e| {
                ClassificationError::NetworkUnreachable(format!(
                    "Failed to initialize the HTTP client: {e}"
                ))
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload one image and map the response into a `ResultModel`.
    ///
    /// Input is validated first; an invalid type never reaches the network.
    /// No retries are attempted.
    pub async fn classify(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ResultModel, ClassificationError> {
        let mime = validate_image(image, mime_type)?;

        let part = Part::bytes(image.to_vec())
            .file_name(upload_filename(mime.essence_str()))
            .mime_str(mime.as_ref())
            .map_err(|e| ClassificationError::InvalidInput(format!("Invalid image type: {e}")))?;
        let form = Form::new().part("image", part);

        let url = format!("{}/{CLASSIFY_PATH}", self.base_url);
        info!(url = %url, bytes = image.len(), mime_type, "submitting image for classification");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let envelope = serde_json::from_str::<ClassifyEnvelope>(&body);

        if !status.is_success() {
            let reason = envelope
                .ok()
                .and_then(|env| env.rejection_reason())
                .unwrap_or_else(|| "Server error occurred".to_string());
            warn!(status = status.as_u16(), reason = %reason, "classifier rejected the request");
            return Err(ClassificationError::ServerRejected(reason));
        }

        let envelope = envelope.map_err(|e| {
            warn!(error = %e, "classifier returned an unreadable body");
            ClassificationError::ServerRejected(format!(
                "The classifier returned an unreadable response: {e}"
            ))
        })?;

        let result = envelope.into_result()?;
        info!(
            result_id = %result.id(),
            healthy = result.is_healthy(),
            confidence = result.level1().confidence.value(),
            "classification complete"
        );
        Ok(result)
    }

    /// Check `GET /api/health`.
    pub async fn health(&self) -> Result<ServiceHealth, ClassificationError> {
        let url = format!("{}/{HEALTH_PATH}", self.base_url);
        debug!(url = %url, "checking classifier health");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassificationError::ServerRejected(format!(
                "Health check failed with HTTP {}",
                status.as_u16()
            )));
        }

        let envelope: HealthEnvelope = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_transport_error(e)
            } else {
                ClassificationError::ServerRejected(format!("Unreadable health response: {e}"))
            }
        })?;

        Ok(ServiceHealth {
            status: envelope.status.unwrap_or_else(|| "unknown".to_string()),
            message: envelope.message,
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ClassificationError {
        // A connect timeout also reports `is_timeout`; it is still a
        // connection failure.
        if err.is_connect() {
            warn!(error = %err, "classifier unreachable");
            ClassificationError::NetworkUnreachable(format!(
                "Cannot connect to the server. Please make sure the classifier is running at {}.",
                self.base_url
            ))
        } else if err.is_timeout() {
            warn!(timeout_secs = self.timeout.as_secs_f64(), "classifier request timed out");
            ClassificationError::Timeout(format!(
                "The analysis did not finish within {}. Please try again.",
                describe_timeout(self.timeout)
            ))
        } else if err.is_request() {
            warn!(error = %err, "classifier request could not be sent");
            ClassificationError::NetworkUnreachable(format!(
                "Cannot connect to the server. Please make sure the classifier is running at {}.",
                self.base_url
            ))
        } else {
            warn!(error = %err, "classifier transport error");
            ClassificationError::NetworkUnreachable(format!(
                "A network error occurred while contacting the classifier: {err}"
            ))
        }
    }
}

fn describe_timeout(timeout: Duration) -> String {
    match timeout.as_secs() {
        0 => format!("{} ms", timeout.as_millis()),
        1 => "1 second".to_string(),
        secs => format!("{secs} seconds"),
    }
}

impl Classifier for ClassificationClient {
    fn classify<'a>(
        &'a self,
        image: &'a [u8],
        mime_type: &'a str,
    ) -> BoxFuture<'a, Result<ResultModel, ClassificationError>> {
        Box::pin(ClassificationClient::classify(self, image, mime_type))
    }
}
