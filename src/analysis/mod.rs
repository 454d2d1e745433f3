//! Profile analysis pipeline.
//!
//! validate -> submit (racing a deadline) -> classify -> transform.

pub mod classifier;
pub mod deadline;
pub mod orchestrator;
pub mod report;
pub mod request;
pub mod session;
pub mod stage;
pub mod transformer;
pub mod transport;
pub mod validator;

pub use classifier::{classify, classify_raw};
pub use orchestrator::{RequestOrchestrator, StageGuard};
pub use report::{AnalysisOutcome, ErrorDetail, InsightItem, Trait, TraitAverages, TraitReport};
pub use request::{AnalysisMode, AnalysisRequest, Credentials};
pub use session::{AnalysisSession, SessionSnapshot, Submission};
pub use stage::PipelineStage;
pub use transformer::{AnalysisPayload, InsightSummary, transform, transform_at};
pub use transport::{AnalysisTransport, HttpTransport, RawResponse};
pub use validator::{ValidatedInput, Validator, validate};
