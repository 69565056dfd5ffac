use std::sync::Arc;

use jiff::Timestamp;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use oralscan_classify::classifier::Classifier;
use oralscan_classify::error::ClassificationError;
use oralscan_classify::validate::validate_image;
use oralscan_core::models::patient::PatientContext;
use oralscan_core::models::result::ResultModel;
use oralscan_core::models::suggestion::Suggestion;
use oralscan_export::artifact::{ReportArtifact, synthesize};
use oralscan_export::styles::DocumentStyles;
use oralscan_suggest::enricher::SuggestionEnricher;

use crate::error::WorkflowError;
use crate::state::{ImageSelection, SubmitOutcome, SuggestionsReady, WorkflowState};

/// Per-session mutable state. Never locked across a network await.
struct Session {
    /// Bumped by every transition that discards the session; async
    /// resolutions carrying an older epoch are dropped.
    epoch: u64,
    state: WorkflowState,
    image: Option<Arc<ImageSelection>>,
    patient: Option<PatientContext>,
    suggestions: Option<Vec<Suggestion>>,
    report_in_flight: bool,
}

impl Session {
    fn new() -> Self {
        Self {
            epoch: 0,
            state: WorkflowState::Idle,
            image: None,
            patient: None,
            suggestions: None,
            report_in_flight: false,
        }
    }
}

struct Inner {
    classifier: Arc<dyn Classifier>,
    enricher: Arc<SuggestionEnricher>,
    styles: DocumentStyles,
    session: Mutex<Session>,
    suggestions_tx: watch::Sender<Option<SuggestionsReady>>,
}

/// Drives one user session through select → submit → result → report.
///
/// Cheap to clone; clones share the same session. Classification and report
/// synthesis run on spawned tasks, so dropping a caller's future never
/// leaves the session stuck in `Uploading`.
#[derive(Clone)]
pub struct WorkflowOrchestrator {
    inner: Arc<Inner>,
}

impl WorkflowOrchestrator {
    pub fn new(classifier: Arc<dyn Classifier>, enricher: Arc<SuggestionEnricher>) -> Self {
        Self::with_styles(classifier, enricher, DocumentStyles::default())
    }

    pub fn with_styles(
        classifier: Arc<dyn Classifier>,
        enricher: Arc<SuggestionEnricher>,
        styles: DocumentStyles,
    ) -> Self {
        let (suggestions_tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                classifier,
                enricher,
                styles,
                session: Mutex::new(Session::new()),
                suggestions_tx,
            }),
        }
    }

    pub async fn state(&self) -> WorkflowState {
        self.inner.session.lock().await.state.clone()
    }

    pub async fn suggestions(&self) -> Option<Vec<Suggestion>> {
        self.inner.session.lock().await.suggestions.clone()
    }

    pub async fn image(&self) -> Option<Arc<ImageSelection>> {
        self.inner.session.lock().await.image.clone()
    }

    pub async fn patient_context(&self) -> Option<PatientContext> {
        self.inner.session.lock().await.patient.clone()
    }

    /// Receives `Some` once suggestions for the current result are ready and
    /// `None` whenever the session is discarded.
    pub fn subscribe_suggestions(&self) -> watch::Receiver<Option<SuggestionsReady>> {
        self.inner.suggestions_tx.subscribe()
    }

    /// Hold an image for submission. Replaces any previous image, and from
    /// `Success` or `Failure` discards the prior result.
    pub async fn select_image(&self, image: ImageSelection) -> Result<(), WorkflowError> {
        let discarded = {
            let mut session = self.inner.session.lock().await;
            if session.state == WorkflowState::Uploading {
                return Err(WorkflowError::Busy);
            }
            let discarded = matches!(
                session.state,
                WorkflowState::Success(_) | WorkflowState::Failure { .. }
            );
            if discarded {
                session.epoch += 1;
                session.suggestions = None;
            }
            debug!(preview = %image.preview(), "image selected");
            session.image = Some(Arc::new(image));
            session.state = WorkflowState::ImageSelected;
            discarded
        };

        if discarded {
            self.inner.suggestions_tx.send_replace(None);
            self.inner.enricher.invalidate().await;
        }
        Ok(())
    }

    /// Attach patient details to the pending submission.
    pub async fn attach_patient_context(
        &self,
        context: PatientContext,
    ) -> Result<(), WorkflowError> {
        let context = context.normalized()?;
        let mut session = self.inner.session.lock().await;
        require_image_selected(&session.state)?;
        session.patient = (!context.is_empty()).then_some(context);
        Ok(())
    }

    pub async fn clear_patient_context(&self) -> Result<(), WorkflowError> {
        let mut session = self.inner.session.lock().await;
        require_image_selected(&session.state)?;
        session.patient = None;
        Ok(())
    }

    /// Send the selected image for classification and wait for the outcome.
    ///
    /// Local validation failures return an error and leave the state where it
    /// was. Network and server failures become `WorkflowState::Failure` and
    /// are reported through `SubmitOutcome::Failed`.
    pub async fn submit(&self) -> Result<SubmitOutcome, WorkflowError> {
        let (epoch, image, patient) = {
            let mut session = self.inner.session.lock().await;
            match session.state {
                WorkflowState::Uploading => {
                    debug!("submit ignored, request already in flight");
                    return Ok(SubmitOutcome::AlreadyInFlight);
                }
                WorkflowState::Idle => return Err(WorkflowError::NoImage),
                WorkflowState::Success(_) | WorkflowState::Failure { .. } => {
                    return Err(WorkflowError::InvalidState(session.state.name()));
                }
                WorkflowState::ImageSelected => {}
            }
            let image = session.image.clone().ok_or(WorkflowError::NoImage)?;
            validate_image(&image.bytes, &image.mime_type).map_err(WorkflowError::InvalidInput)?;

            session.state = WorkflowState::Uploading;
            (session.epoch, image, session.patient.clone())
        };

        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let outcome = inner
                .classifier
                .classify(&image.bytes, &image.mime_type)
                .await;
            inner.resolve_classification(epoch, outcome, patient).await
        });

        Ok(task.await?)
    }

    /// Discard the session: image, patient details, result, suggestions and
    /// error. An outstanding classification is superseded.
    pub async fn reset(&self) {
        {
            let mut session = self.inner.session.lock().await;
            session.epoch += 1;
            info!(from = session.state.name(), epoch = session.epoch, "session reset");
            session.state = WorkflowState::Idle;
            session.image = None;
            session.patient = None;
            session.suggestions = None;
        }
        self.inner.suggestions_tx.send_replace(None);
        self.inner.enricher.invalidate().await;
    }

    /// Synthesize the report for the current result.
    ///
    /// Waits for suggestions if enrichment is still running. Failure leaves
    /// the workflow state untouched, so the call can be retried.
    pub async fn generate_report(
        &self,
        generated_at: Timestamp,
    ) -> Result<ReportArtifact, WorkflowError> {
        let (result, cached) = {
            let mut session = self.inner.session.lock().await;
            let result = session
                .state
                .result()
                .cloned()
                .ok_or(WorkflowError::NotReady)?;
            if session.report_in_flight {
                return Err(WorkflowError::ReportInProgress);
            }
            session.report_in_flight = true;
            (result, session.suggestions.clone())
        };

        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let outcome = inner.render_report(result, cached, generated_at).await;
            inner.session.lock().await.report_in_flight = false;
            outcome
        });

        task.await?
    }
}

impl Inner {
    async fn resolve_classification(
        self: Arc<Self>,
        epoch: u64,
        outcome: Result<ResultModel, ClassificationError>,
        patient: Option<PatientContext>,
    ) -> SubmitOutcome {
        let mut session = self.session.lock().await;
        if session.epoch != epoch {
            debug!(epoch, current = session.epoch, "discarding stale classification");
            return SubmitOutcome::Superseded;
        }

        match outcome {
            Ok(result) => {
                let result = Arc::new(result.with_patient_context(patient));
                info!(result_id = %result.id(), healthy = result.is_healthy(), "analysis succeeded");
                session.state = WorkflowState::Success(result.clone());
                drop(session);
                self.clone().spawn_enrichment(epoch, result.clone());
                SubmitOutcome::Completed(result)
            }
            Err(e) => {
                warn!(kind = ?e.kind(), error = %e, "analysis failed");
                session.state = WorkflowState::Failure {
                    kind: e.kind(),
                    message: e.message().to_string(),
                };
                SubmitOutcome::Failed {
                    kind: e.kind(),
                    message: e.message().to_string(),
                }
            }
        }
    }

    fn spawn_enrichment(self: Arc<Self>, epoch: u64, result: Arc<ResultModel>) {
        tokio::spawn(async move {
            let suggestions = self.enricher.suggest(&result).await;

            let mut session = self.session.lock().await;
            let current = session
                .state
                .result()
                .is_some_and(|r| r.id() == result.id());
            if session.epoch != epoch || !current {
                debug!(result_id = %result.id(), "discarding stale suggestions");
                return;
            }
            session.suggestions = Some(suggestions.clone());
            drop(session);

            self.suggestions_tx.send_replace(Some(SuggestionsReady {
                result_id: result.id(),
                suggestions,
            }));
        });
    }

    async fn render_report(
        &self,
        result: Arc<ResultModel>,
        cached: Option<Vec<Suggestion>>,
        generated_at: Timestamp,
    ) -> Result<ReportArtifact, WorkflowError> {
        let suggestions = match cached {
            Some(suggestions) => suggestions,
            None => self.enricher.suggest(&result).await,
        };
        let styles = self.styles.clone();

        let artifact = tokio::task::spawn_blocking(move || {
            synthesize(&result, &suggestions, generated_at, &styles)
        })
        .await??;

        Ok(artifact)
    }
}

fn require_image_selected(state: &WorkflowState) -> Result<(), WorkflowError> {
    match state {
        WorkflowState::ImageSelected => Ok(()),
        other => Err(WorkflowError::InvalidState(other.name())),
    }
}
