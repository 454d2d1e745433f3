//! Pipeline stage machine for one submission cycle.

use serde::{Deserialize, Serialize};

/// Where a submission currently is in the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Nothing in flight. Initial and terminal.
    #[default]
    Idle,
    Validating,
    ValidationFailed,
    /// Request issued, racing the deadline.
    Submitting,
    TimedOut,
    Classifying,
    ServiceFailed,
    TransportFailed,
    Transforming,
}

impl PipelineStage {
    /// Check if this stage allows moving to `target`.
    pub fn can_transition_to(&self, target: PipelineStage) -> bool {
        use PipelineStage::*;

        matches!(
            (self, target),
            (Idle, Validating) |
            // From Validating
            (Validating, ValidationFailed) | (Validating, Submitting) |
            // From Submitting
            (Submitting, TimedOut) | (Submitting, Classifying) |
            // From Classifying
            (Classifying, ServiceFailed) | (Classifying, TransportFailed) |
            (Classifying, Transforming) |
            // Every exit returns to Idle
            (ValidationFailed, Idle) | (TimedOut, Idle) | (ServiceFailed, Idle) |
            (TransportFailed, Idle) | (Transforming, Idle)
        )
    }

    /// The busy indicator is on exactly across these stages.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting | Self::Classifying | Self::Transforming)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::ValidationFailed => "validation_failed",
            Self::Submitting => "submitting",
            Self::TimedOut => "timed_out",
            Self::Classifying => "classifying",
            Self::ServiceFailed => "service_failed",
            Self::TransportFailed => "transport_failed",
            Self::Transforming => "transforming",
        };
        write!(f, "{s}")
    }
}
