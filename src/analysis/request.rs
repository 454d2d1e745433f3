//! Outbound request types.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::analysis::validator::ValidatedInput;
use crate::error::ConfigError;

/// How the remote service should gather tweets.
///
/// Sent on the wire as the boolean `realtimeProcessing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    Standard,
    Realtime,
}

impl AnalysisMode {
    pub fn from_realtime(realtime: bool) -> Self {
        if realtime {
            Self::Realtime
        } else {
            Self::Standard
        }
    }

    pub fn is_realtime(&self) -> bool {
        matches!(self, Self::Realtime)
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Standard => "standard",
            Self::Realtime => "realtime",
        };
        write!(f, "{s}")
    }
}

/// An already-issued credential plus the identity it belongs to.
///
/// Supplied by the caller on every submission.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub auth_token: SecretString,
    pub requester_email: String,
}

impl Credentials {
    pub fn new(auth_token: impl Into<String>, requester_email: impl Into<String>) -> Self {
        Self {
            auth_token: SecretString::from(auth_token.into()),
            requester_email: requester_email.into(),
        }
    }

    /// Read `PERSONA_INSIGHT_TOKEN` and `PERSONA_INSIGHT_EMAIL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var("PERSONA_INSIGHT_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("PERSONA_INSIGHT_TOKEN".into()))?;
        let email = std::env::var("PERSONA_INSIGHT_EMAIL")
            .map_err(|_| ConfigError::MissingEnvVar("PERSONA_INSIGHT_EMAIL".into()))?;
        Ok(Self::new(token, email))
    }
}

/// One analysis call, built fresh per submission.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub profile_reference: String,
    pub sample_size: u32,
    pub mode: AnalysisMode,
    pub auth_token: SecretString,
    pub requester_email: String,
}

impl AnalysisRequest {
    pub fn new(input: ValidatedInput, credentials: &Credentials, mode: AnalysisMode) -> Self {
        Self {
            profile_reference: input.profile_reference,
            sample_size: input.sample_size,
            mode,
            auth_token: credentials.auth_token.clone(),
            requester_email: credentials.requester_email.clone(),
        }
    }

    /// Query parameters in wire order. Values are raw; the HTTP layer encodes them.
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("url", self.profile_reference.clone()),
            ("count", self.sample_size.to_string()),
            ("email", self.requester_email.clone()),
            ("realtimeProcessing", self.mode.is_realtime().to_string()),
        ]
    }

    pub fn bearer_token(&self) -> &str {
        self.auth_token.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::validator::validate;

    #[test]
    fn query_pairs_encode_mode_as_bool() {
        let input = validate("https://twitter.com/jack", 20).unwrap();
        let creds = Credentials::new("tok", "me@example.com");
        let req = AnalysisRequest::new(input, &creds, AnalysisMode::Realtime);

        let pairs = req.query_pairs();
        assert_eq!(pairs[0], ("url", "https://twitter.com/jack".to_string()));
        assert_eq!(pairs[1], ("count", "20".to_string()));
        assert_eq!(pairs[2], ("email", "me@example.com".to_string()));
        assert_eq!(pairs[3], ("realtimeProcessing", "true".to_string()));
        assert_eq!(req.bearer_token(), "tok");
    }

    #[test]
    fn debug_does_not_leak_token() {
        let creds = Credentials::new("super-secret-token", "me@example.com");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("super-secret-token"));
    }

    #[test]
    fn mode_from_realtime() {
        assert_eq!(AnalysisMode::from_realtime(false), AnalysisMode::Standard);
        assert!(AnalysisMode::from_realtime(true).is_realtime());
        assert_eq!(AnalysisMode::Realtime.to_string(), "realtime");
    }
}
