//! Request orchestration: issue the call, race the deadline, classify, transform.
//!
//! One orchestrator serves one logical session. It owns the pipeline stage,
//! published on a `watch` channel so a UI shell can render the busy indicator,
//! and refuses a second submission while one is in flight.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::{classifier, transformer};
use crate::analysis::deadline::{Raced, with_deadline};
use crate::analysis::report::AnalysisOutcome;
use crate::analysis::request::{AnalysisMode, AnalysisRequest, Credentials};
use crate::analysis::stage::PipelineStage;
use crate::analysis::transport::AnalysisTransport;
use crate::analysis::validator::ValidatedInput;
use crate::error::{SubmitError, TransportError};

/// Builds and issues analysis requests for a single session.
pub struct RequestOrchestrator {
    transport: Arc<dyn AnalysisTransport>,
    stage: watch::Sender<PipelineStage>,
}

impl RequestOrchestrator {
    pub fn new(transport: Arc<dyn AnalysisTransport>) -> Self {
        let (stage, _rx) = watch::channel(PipelineStage::Idle);
        Self { transport, stage }
    }

    /// Current pipeline stage.
    pub fn stage(&self) -> PipelineStage {
        *self.stage.borrow()
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.stage().is_busy()
    }

    /// Subscribe to stage changes.
    pub fn subscribe(&self) -> watch::Receiver<PipelineStage> {
        self.stage.subscribe()
    }

    /// Claim the pipeline for a new submission cycle (`Idle -> Validating`).
    ///
    /// Fails with [`SubmitError::Busy`] unless the pipeline is idle. The
    /// returned guard is the only way to run a request on this orchestrator,
    /// and it puts the pipeline back to `Idle` when dropped.
    pub fn begin(&self) -> Result<StageGuard<'_>, SubmitError> {
        let claimed = self.stage.send_if_modified(|stage| {
            if stage.is_idle() {
                *stage = PipelineStage::Validating;
                true
            } else {
                false
            }
        });

        if !claimed {
            debug!(stage = %self.stage(), "Rejected submission while pipeline is not idle");
            return Err(SubmitError::Busy);
        }
        Ok(StageGuard { orchestrator: self })
    }

    /// Submit already-validated input.
    pub async fn submit(
        &self,
        input: ValidatedInput,
        credentials: &Credentials,
        mode: AnalysisMode,
        deadline: Duration,
    ) -> Result<AnalysisOutcome, SubmitError> {
        let mut guard = self.begin()?;
        Ok(guard.run(input, credentials, mode, deadline).await)
    }
}

/// Exclusive claim on one orchestrator's pipeline for one submission cycle.
///
/// Dropping it always returns the pipeline to `Idle`, whichever way the
/// submission exits. Callers that record the outcome should do so before
/// dropping it, so nothing observes `Idle` ahead of the outcome.
pub struct StageGuard<'a> {
    orchestrator: &'a RequestOrchestrator,
}

impl StageGuard<'_> {
    pub fn current(&self) -> PipelineStage {
        self.orchestrator.stage()
    }

    /// Move to the next stage.
    pub fn advance(&mut self, next: PipelineStage) {
        let from = self.current();
        debug_assert!(
            from.can_transition_to(next),
            "invalid pipeline transition {from} -> {next}"
        );
        debug!(%from, to = %next, "Pipeline stage changed");
        self.orchestrator.stage.send_replace(next);
    }

    /// Drive the claimed submission from `Validating` to an outcome.
    ///
    /// Leaves the pipeline in its terminal stage; the guard's drop moves it to `Idle`.
    pub async fn run(
        &mut self,
        input: ValidatedInput,
        credentials: &Credentials,
        mode: AnalysisMode,
        deadline: Duration,
    ) -> AnalysisOutcome {
        let submission_id = Uuid::new_v4();
        let request = AnalysisRequest::new(input, credentials, mode);

        info!(
            %submission_id,
            profile = %request.profile_reference,
            count = request.sample_size,
            %mode,
            deadline_ms = deadline.as_millis() as u64,
            "Submitting analysis request"
        );

        self.advance(PipelineStage::Submitting);
        let started = Instant::now();

        let transport = Arc::clone(&self.orchestrator.transport);
        let raced = with_deadline(async move { transport.fetch(&request).await }, deadline).await;

        let raw = match raced {
            Raced::DeadlineElapsed => {
                warn!(
                    %submission_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Analysis request timed out"
                );
                self.advance(PipelineStage::TimedOut);
                return AnalysisOutcome::Timeout;
            }
            Raced::Settled(Ok(raw)) => raw,
            Raced::Settled(Err(e)) => Err(TransportError::Task(e.to_string())),
        };

        self.advance(PipelineStage::Classifying);
        let outcome = match classifier::classify_raw(raw) {
            Ok(payload) => {
                self.advance(PipelineStage::Transforming);
                AnalysisOutcome::Success(Arc::new(transformer::transform(&payload)))
            }
            Err(failure) => {
                self.advance(match &failure {
                    AnalysisOutcome::ServiceFailure(_) => PipelineStage::ServiceFailed,
                    _ => PipelineStage::TransportFailed,
                });
                failure
            }
        };

        info!(
            %submission_id,
            outcome = outcome.kind(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis request settled"
        );

        outcome
    }
}

impl Drop for StageGuard<'_> {
    fn drop(&mut self) {
        self.orchestrator.stage.send_replace(PipelineStage::Idle);
    }
}
