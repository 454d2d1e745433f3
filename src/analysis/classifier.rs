//! Maps a settled network result onto an [`AnalysisOutcome`].

use std::sync::Arc;

use serde_json::Value;

use crate::analysis::report::{AnalysisOutcome, ErrorDetail, REQUEST_FAILED_MESSAGE};
use crate::analysis::transformer::{self, AnalysisPayload};
use crate::analysis::transport::RawResponse;
use crate::error::TransportError;

/// Classify the raw result of one request, transforming a successful payload.
pub fn classify(raw: Result<RawResponse, TransportError>) -> AnalysisOutcome {
    match classify_raw(raw) {
        Ok(payload) => AnalysisOutcome::Success(Arc::new(transformer::transform(&payload))),
        Err(failure) => failure,
    }
}

/// Classify without transforming: the shape-checked payload, or the failure outcome.
pub fn classify_raw(
    raw: Result<RawResponse, TransportError>,
) -> Result<AnalysisPayload, AnalysisOutcome> {
    let response = match raw {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Analysis request failed before a response arrived");
            return Err(AnalysisOutcome::transport_failure());
        }
    };

    let body: Value = match serde_json::from_str(&response.body) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(status = response.status, error = %e, "Analysis response body is not JSON");
            return Err(AnalysisOutcome::transport_failure());
        }
    };

    if !response.is_success() {
        let message = service_error_message(&body);
        tracing::info!(status = response.status, message = %message, "Analysis service returned an error");
        return Err(AnalysisOutcome::ServiceFailure(ErrorDetail::new(message)));
    }

    // Decode from the text, not `body`: `Value` maps are key-sorted and the
    // summary's category order must survive.
    serde_json::from_str::<AnalysisPayload>(&response.body).map_err(|e| {
        tracing::warn!(error = %e, "Analysis response is missing required fields");
        AnalysisOutcome::ServiceFailure(ErrorDetail::new(REQUEST_FAILED_MESSAGE))
    })
}

/// `error`, else `message`, else the generic fallback. Blank strings don't count,
/// but a usable message is passed through untouched.
fn service_error_message(body: &Value) -> String {
    ["error", "message"]
        .into_iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
        .unwrap_or(REQUEST_FAILED_MESSAGE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report::TRANSPORT_FAILURE_MESSAGE;

    fn response(status: u16, body: &str) -> Result<RawResponse, TransportError> {
        Ok(RawResponse::new(status, body))
    }

    const SCENARIO_BODY: &str = r#"{
        "tweets_analyzed": 12,
        "average_scores": {"openness": 0.7, "conscientiousness": 0.5,
            "extraversion": 0.3, "agreeableness": 0.6, "neuroticism": 0.2},
        "summary": {}
    }"#;

    #[test]
    fn success_payload_becomes_report() {
        let outcome = classify(response(200, SCENARIO_BODY));
        let report = outcome.report().expect("success");
        assert_eq!(report.tweets_analyzed, 12);
        assert_eq!(report.trait_averages.openness, 0.7);
        assert!(outcome.user_message().is_none());
    }

    #[test]
    fn service_error_field_passed_through() {
        let outcome = classify(response(429, r#"{"error":"rate limited"}"#));
        assert_eq!(
            outcome,
            AnalysisOutcome::ServiceFailure(ErrorDetail::new("rate limited"))
        );
    }

    #[test]
    fn error_field_preferred_over_message() {
        let outcome = classify(response(
            403,
            r#"{"error":"Cannot access tweets","message":"Profile is private or does not exist"}"#,
        ));
        assert_eq!(outcome.user_message(), Some("Cannot access tweets"));
    }

    #[test]
    fn message_field_used_when_error_absent() {
        let outcome = classify(response(401, r#"{"message":"Token has expired"}"#));
        assert_eq!(outcome.user_message(), Some("Token has expired"));
    }

    #[test]
    fn empty_or_non_string_fields_fall_back() {
        assert_eq!(
            classify(response(500, r#"{"error":"","message":42}"#)).user_message(),
            Some("Request failed")
        );
        assert_eq!(
            classify(response(500, "{}")).user_message(),
            Some("Request failed")
        );
    }

    #[test]
    fn service_message_is_not_rewritten() {
        let outcome = classify(response(400, r#"{"error":"  Invalid Twitter URL \n"}"#));
        assert_eq!(outcome.user_message(), Some("  Invalid Twitter URL \n"));

        let outcome = classify(response(400, r#"{"error":"   ","message":" keep me "}"#));
        assert_eq!(outcome.user_message(), Some(" keep me "));
    }

    #[test]
    fn classify_raw_returns_payload_untransformed() {
        let payload = classify_raw(response(200, SCENARIO_BODY)).expect("payload");
        assert_eq!(payload.tweets_analyzed, 12);
        assert!(payload.summary.0.is_empty());

        let failure = classify_raw(response(500, r#"{"error":"boom"}"#)).unwrap_err();
        assert_eq!(failure.user_message(), Some("boom"));
    }

    #[test]
    fn transport_error_is_generic_failure() {
        let outcome = classify(Err(TransportError::Request("connection refused".into())));
        assert_eq!(
            outcome,
            AnalysisOutcome::TransportFailure(ErrorDetail::new(TRANSPORT_FAILURE_MESSAGE))
        );
    }

    #[test]
    fn unparseable_body_is_transport_failure_even_on_error_status() {
        for status in [200, 502] {
            let outcome = classify(response(status, "<html>Bad Gateway</html>"));
            assert!(matches!(outcome, AnalysisOutcome::TransportFailure(_)));
        }
    }

    #[test]
    fn success_without_scores_or_summary_is_service_failure() {
        let missing_scores = r#"{"tweets_analyzed": 3, "summary": {}}"#;
        let missing_summary = r#"{"tweets_analyzed": 3, "average_scores": {"openness": 0.1,
            "conscientiousness": 0.1, "extraversion": 0.1, "agreeableness": 0.1, "neuroticism": 0.1}}"#;
        for body in [missing_scores, missing_summary] {
            assert_eq!(
                classify(response(200, body)),
                AnalysisOutcome::ServiceFailure(ErrorDetail::new("Request failed"))
            );
        }
    }

    #[test]
    fn partial_score_map_is_service_failure() {
        let body = r#"{"tweets_analyzed": 3, "summary": {},
            "average_scores": {"openness": 0.1, "neuroticism": 0.2}}"#;
        assert!(matches!(
            classify(response(200, body)),
            AnalysisOutcome::ServiceFailure(_)
        ));
    }
}
