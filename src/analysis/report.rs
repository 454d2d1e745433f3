//! Display-ready analysis results.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-facing message for failures with no structured server response.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred. Please try again later.";

/// User-facing message when the deadline elapses first.
pub const TIMEOUT_MESSAGE: &str = "The analysis took too long to complete. Please try again later.";

/// Fallback when the service gives no usable reason.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

/// The five OCEAN personality traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Self::Openness,
        Self::Conscientiousness,
        Self::Extraversion,
        Self::Agreeableness,
        Self::Neuroticism,
    ];

    /// Wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Openness => "openness",
            Self::Conscientiousness => "conscientiousness",
            Self::Extraversion => "extraversion",
            Self::Agreeableness => "agreeableness",
            Self::Neuroticism => "neuroticism",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Openness => "Openness",
            Self::Conscientiousness => "Conscientiousness",
            Self::Extraversion => "Extraversion",
            Self::Agreeableness => "Agreeableness",
            Self::Neuroticism => "Neuroticism",
        }
    }
}

impl std::fmt::Display for Trait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Average score per trait, each normalized to `[0, 1]`.
///
/// Also the wire shape of `average_scores`: exactly these five keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitAverages {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl TraitAverages {
    pub fn get(&self, t: Trait) -> f64 {
        match t {
            Trait::Openness => self.openness,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Extraversion => self.extraversion,
            Trait::Agreeableness => self.agreeableness,
            Trait::Neuroticism => self.neuroticism,
        }
    }

    /// `(trait, score)` pairs in OCEAN order.
    pub fn iter(&self) -> impl Iterator<Item = (Trait, f64)> + '_ {
        Trait::ALL.into_iter().map(|t| (t, self.get(t)))
    }
}

/// One categorized insight line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightItem {
    pub category: String,
    pub text: String,
}

impl InsightItem {
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
        }
    }

    /// Human-readable category, e.g. `WORK_INSIGHTS` -> `Work insights`.
    pub fn category_label(&self) -> String {
        let spaced = self.category.replace('_', " ").to_lowercase();
        let mut chars = spaced.trim().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Canonical result of one successful analysis. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitReport {
    /// Local wall-clock time the payload was transformed.
    pub analyzed_at: DateTime<Utc>,
    pub tweets_analyzed: u32,
    pub trait_averages: TraitAverages,
    /// Grouped by category, in the order the service sent them.
    pub insights: Vec<InsightItem>,
    /// Handle the service resolved the profile reference to, if it said.
    pub profile_username: Option<String>,
    /// Whether the service stored this analysis in the requester's history.
    pub saved_to_history: bool,
}

impl TraitReport {
    /// Insights for one category, in received order.
    pub fn insights_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.insights
            .iter()
            .filter(move |i| i.category == category)
            .map(|i| i.text.as_str())
    }
}

/// User-presentable error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

impl ErrorDetail {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The single result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Success(Arc<TraitReport>),
    ServiceFailure(ErrorDetail),
    TransportFailure(ErrorDetail),
    Timeout,
}

impl AnalysisOutcome {
    pub fn transport_failure() -> Self {
        Self::TransportFailure(ErrorDetail::new(TRANSPORT_FAILURE_MESSAGE))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn report(&self) -> Option<&Arc<TraitReport>> {
        match self {
            Self::Success(report) => Some(report),
            _ => None,
        }
    }

    /// The one message to show the user, or `None` on success.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::ServiceFailure(detail) | Self::TransportFailure(detail) => {
                Some(detail.message.as_str())
            }
            Self::Timeout => Some(TIMEOUT_MESSAGE),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::ServiceFailure(_) => "service_failure",
            Self::TransportFailure(_) => "transport_failure",
            Self::Timeout => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_label_is_sentence_case() {
        let item = InsightItem::new("WORK_INSIGHTS", "x");
        assert_eq!(item.category_label(), "Work insights");
        assert_eq!(InsightItem::new("humor", "x").category_label(), "Humor");
        assert_eq!(InsightItem::new("", "x").category_label(), "");
    }

    #[test]
    fn averages_iterate_in_ocean_order() {
        let averages = TraitAverages {
            openness: 0.1,
            conscientiousness: 0.2,
            extraversion: 0.3,
            agreeableness: 0.4,
            neuroticism: 0.5,
        };
        let pairs: Vec<_> = averages.iter().collect();
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[0], (Trait::Openness, 0.1));
        assert_eq!(pairs[4], (Trait::Neuroticism, 0.5));
    }

    #[test]
    fn timeout_message_differs_from_transport() {
        let transport = AnalysisOutcome::transport_failure();
        assert_eq!(transport.user_message(), Some(TRANSPORT_FAILURE_MESSAGE));
        assert_ne!(AnalysisOutcome::Timeout.user_message(), transport.user_message());
    }
}
