//! The surface a UI shell drives: submit, then read back state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, watch};
use tracing::info;

use crate::analysis::orchestrator::RequestOrchestrator;
use crate::analysis::report::{AnalysisOutcome, TraitReport};
use crate::analysis::request::{AnalysisMode, Credentials};
use crate::analysis::stage::PipelineStage;
use crate::analysis::transport::{AnalysisTransport, HttpTransport};
use crate::analysis::validator::Validator;
use crate::config::AnalysisConfig;
use crate::error::SubmitError;

/// One profile submission as entered by the user.
#[derive(Debug, Clone)]
pub struct Submission {
    pub profile_reference: String,
    pub sample_size: i64,
    /// Overrides the session's configured mode.
    pub mode: Option<AnalysisMode>,
}

impl Submission {
    pub fn new(profile_reference: impl Into<String>, sample_size: i64) -> Self {
        Self {
            profile_reference: profile_reference.into(),
            sample_size,
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: AnalysisMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// What the UI shell renders.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub busy: bool,
    pub stage: PipelineStage,
    pub last_outcome: Option<AnalysisOutcome>,
    /// Most recent successful report. Kept when a later submission fails.
    pub latest_report: Option<Arc<TraitReport>>,
    /// The one message to show for the last submission, if it failed.
    pub message: Option<String>,
}

#[derive(Debug, Default)]
struct SessionState {
    last_outcome: Option<AnalysisOutcome>,
    latest_report: Option<Arc<TraitReport>>,
    message: Option<String>,
}

/// Validation plus orchestration for one logical user session.
pub struct AnalysisSession {
    orchestrator: RequestOrchestrator,
    validator: Validator,
    deadline: Duration,
    mode: AnalysisMode,
    state: RwLock<SessionState>,
}

impl AnalysisSession {
    pub fn new(transport: Arc<dyn AnalysisTransport>, config: &AnalysisConfig) -> Self {
        Self {
            orchestrator: RequestOrchestrator::new(transport),
            validator: Validator::new(config.max_sample_size),
            deadline: config.deadline,
            mode: config.mode,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Session talking HTTP to `config.endpoint`.
    pub fn with_http(config: &AnalysisConfig) -> Self {
        Self::new(Arc::new(HttpTransport::new(config.endpoint.clone())), config)
    }

    pub fn is_busy(&self) -> bool {
        self.orchestrator.is_busy()
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineStage> {
        self.orchestrator.subscribe()
    }

    /// Validate and, if valid, run one analysis.
    ///
    /// Validation failures and busy rejections come back as `Err`; every
    /// network-side result is an `Ok` outcome.
    pub async fn submit(
        &self,
        submission: Submission,
        credentials: &Credentials,
    ) -> Result<AnalysisOutcome, SubmitError> {
        let mut guard = self.orchestrator.begin()?;

        let input = match self
            .validator
            .validate(&submission.profile_reference, submission.sample_size)
        {
            Ok(input) => input,
            Err(e) => {
                info!(reason = %e, "Submission failed validation");
                guard.advance(PipelineStage::ValidationFailed);
                self.state.write().await.message = Some(e.to_string());
                return Err(e.into());
            }
        };

        let mode = submission.mode.unwrap_or(self.mode);
        let outcome = guard.run(input, credentials, mode, self.deadline).await;

        // Record while still claimed so `Idle` is never observed ahead of the outcome.
        {
            let mut state = self.state.write().await;
            if let Some(report) = outcome.report() {
                state.latest_report = Some(Arc::clone(report));
            }
            state.message = outcome.user_message().map(str::to_string);
            state.last_outcome = Some(outcome.clone());
        }
        drop(guard);

        Ok(outcome)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        let stage = self.orchestrator.stage();
        SessionSnapshot {
            busy: stage.is_busy(),
            stage,
            last_outcome: state.last_outcome.clone(),
            latest_report: state.latest_report.clone(),
            message: state.message.clone(),
        }
    }
}
