//! Submission validation. Runs before any network activity.

use crate::config::{DEFAULT_MAX_SAMPLE_SIZE, MIN_SAMPLE_SIZE};
use crate::error::ValidationError;

/// Input that passed every rule and may be sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInput {
    pub profile_reference: String,
    pub sample_size: u32,
}

/// Validation rules with a configurable upper bound on sample size.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    max_sample_size: u32,
}

impl Validator {
    pub fn new(max_sample_size: u32) -> Self {
        Self {
            max_sample_size: max_sample_size.max(MIN_SAMPLE_SIZE),
        }
    }

    /// Check the submission. Rules run in order; the first failure wins.
    pub fn validate(
        &self,
        profile_reference: &str,
        sample_size: i64,
    ) -> Result<ValidatedInput, ValidationError> {
        let reference = profile_reference.trim();
        if reference.is_empty() {
            return Err(ValidationError::MissingProfile);
        }

        if sample_size < i64::from(MIN_SAMPLE_SIZE) {
            return Err(ValidationError::SampleTooSmall { count: sample_size });
        }

        if is_bare_homepage(reference) {
            return Err(ValidationError::HomepageReference);
        }

        if sample_size > i64::from(self.max_sample_size) {
            return Err(ValidationError::SampleTooLarge {
                count: sample_size,
                max: self.max_sample_size,
            });
        }

        Ok(ValidatedInput {
            profile_reference: reference.to_string(),
            // Bounded by max_sample_size above.
            sample_size: sample_size as u32,
        })
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLE_SIZE)
    }
}

/// Validate with the default sample-size bound.
pub fn validate(profile_reference: &str, sample_size: i64) -> Result<ValidatedInput, ValidationError> {
    Validator::default().validate(profile_reference, sample_size)
}

/// A reference ending in `.com` with nothing after it points at a site, not a user.
fn is_bare_homepage(reference: &str) -> bool {
    reference
        .trim_end_matches('/')
        .to_ascii_lowercase()
        .ends_with(".com")
}
