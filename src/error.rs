//! Error types for Persona Insight.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Input rejected before any network activity.
///
/// The `Display` text of each variant is the exact message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please check the input fields")]
    MissingProfile,

    #[error("Tweet count needs to be greater than or equal to 5 for better results.")]
    SampleTooSmall { count: i64 },

    #[error("Please provide a twitter url with a username.")]
    HomepageReference,

    #[error("Tweet count cannot be greater than {max}.")]
    SampleTooLarge { count: i64, max: u32 },
}

/// Failures below the HTTP status line: nothing structured came back.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("In-flight request task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.to_string())
    }
}

/// Reasons a submission never produced an outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("An analysis is already in progress")]
    Busy,

    #[error("{0}")]
    Validation(#[from] ValidationError),
}
