//! Configuration types.

use std::time::Duration;

use crate::analysis::request::AnalysisMode;
use crate::error::ConfigError;

/// Default analysis endpoint of a locally running PersonaInsight API.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/analyze_profile";

/// Minimum number of tweets worth analyzing.
pub const MIN_SAMPLE_SIZE: u32 = 5;

/// Upper bound the remote service accepts for `count`.
pub const DEFAULT_MAX_SAMPLE_SIZE: u32 = 100;

/// Default deadline for one analysis request.
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(60_000);

/// Analysis client configuration.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Full URL of the analyze-profile endpoint.
    pub endpoint: String,
    /// How long to wait for the remote service before reporting a timeout.
    pub deadline: Duration,
    /// Largest sample size accepted by validation.
    pub max_sample_size: u32,
    /// Mode sent with every submission unless overridden.
    pub mode: AnalysisMode,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            deadline: DEFAULT_DEADLINE,
            max_sample_size: DEFAULT_MAX_SAMPLE_SIZE,
            mode: AnalysisMode::Standard,
        }
    }
}

impl AnalysisConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Unset variables use the default; set-but-unparseable ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let endpoint = lookup("PERSONA_INSIGHT_API_URL").unwrap_or(defaults.endpoint);

        let deadline = match parse_var::<u64>(&lookup, "PERSONA_INSIGHT_DEADLINE_MS")? {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "PERSONA_INSIGHT_DEADLINE_MS".into(),
                    message: "deadline must be greater than zero".into(),
                });
            }
            Some(ms) => Duration::from_millis(ms),
            None => defaults.deadline,
        };

        let max_sample_size = parse_var::<u32>(&lookup, "PERSONA_INSIGHT_MAX_SAMPLE_SIZE")?
            .unwrap_or(defaults.max_sample_size);
        if max_sample_size < MIN_SAMPLE_SIZE {
            return Err(ConfigError::InvalidValue {
                key: "PERSONA_INSIGHT_MAX_SAMPLE_SIZE".into(),
                message: format!("must be at least {MIN_SAMPLE_SIZE}"),
            });
        }

        let mode = match parse_var::<bool>(&lookup, "PERSONA_INSIGHT_REALTIME")? {
            Some(realtime) => AnalysisMode::from_realtime(realtime),
            None => defaults.mode,
        };

        Ok(Self {
            endpoint,
            deadline,
            max_sample_size,
            mode,
        })
    }
}

fn parse_var<T>(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_service() {
        let config = AnalysisConfig::default();
        assert_eq!(config.deadline, Duration::from_secs(60));
        assert_eq!(config.max_sample_size, 100);
        assert_eq!(config.mode, AnalysisMode::Standard);
        assert!(config.endpoint.ends_with("/api/analyze_profile"));
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        let config = AnalysisConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.deadline, DEFAULT_DEADLINE);
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let config = AnalysisConfig::from_lookup(lookup(&[
            ("PERSONA_INSIGHT_API_URL", "http://api.test/analyze"),
            ("PERSONA_INSIGHT_DEADLINE_MS", " 1200000 "),
            ("PERSONA_INSIGHT_MAX_SAMPLE_SIZE", "50"),
            ("PERSONA_INSIGHT_REALTIME", "true"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://api.test/analyze");
        assert_eq!(config.deadline, Duration::from_millis(1_200_000));
        assert_eq!(config.max_sample_size, 50);
        assert_eq!(config.mode, AnalysisMode::Realtime);
    }

    #[test]
    fn zero_deadline_rejected() {
        let err = AnalysisConfig::from_lookup(lookup(&[("PERSONA_INSIGHT_DEADLINE_MS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PERSONA_INSIGHT_DEADLINE_MS"));
    }

    #[test]
    fn unparseable_values_rejected() {
        for (key, raw) in [
            ("PERSONA_INSIGHT_DEADLINE_MS", "soon"),
            ("PERSONA_INSIGHT_MAX_SAMPLE_SIZE", "-3"),
            ("PERSONA_INSIGHT_REALTIME", "yes"),
        ] {
            let err = AnalysisConfig::from_lookup(lookup(&[(key, raw)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { key: ref k, .. } if k == key),
                "{key}={raw}"
            );
        }
    }

    #[test]
    fn max_sample_below_minimum_rejected() {
        let err = AnalysisConfig::from_lookup(lookup(&[("PERSONA_INSIGHT_MAX_SAMPLE_SIZE", "4")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for PERSONA_INSIGHT_MAX_SAMPLE_SIZE: must be at least 5"
        );
    }
}
