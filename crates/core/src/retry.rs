//! Bounded retry of structured-output generation.
//!
//! One combinator shared by every call site that needs a validated record
//! from the generator: conversation turns, model-mediated scaffolding, and
//! notes consolidation. Each attempt is a fresh generation from scratch —
//! malformed output is discarded, never patched — and there is no backoff:
//! failures here are format non-compliance, not transient load, so each
//! retry is an independent full attempt at the same cost.

use std::future::Future;

use tracing::{debug, warn};

use crate::error::{AttemptFailure, ExtractionFailure, GatewayError, RetryExhausted};
use crate::extract::extract;
use crate::record::{RecordShape, StructuredRecord};

/// Call `produce` until it yields text that extracts into a record with
/// every key in `required_keys`, or `max_attempts` attempts have failed.
///
/// A record is either fully valid or rejected in full; there is no
/// partial-success state. On exhaustion the returned [`RetryExhausted`]
/// names the required keys and the final attempt's failure cause.
pub async fn with_retry<F, Fut>(
    max_attempts: usize,
    required_keys: &[&str],
    mut produce: F,
) -> std::result::Result<StructuredRecord, RetryExhausted>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<String, GatewayError>>,
{
    let mut last_failure: Option<AttemptFailure> = None;

    for attempt in 1..=max_attempts {
        let raw = match produce().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    required_keys = ?required_keys,
                    error = %e,
                    "Generation attempt failed"
                );
                last_failure = Some(e.into());
                continue;
            }
        };

        match extract(&raw, required_keys) {
            Ok(record) => {
                debug!(attempt, required_keys = ?required_keys, "Valid record extracted");
                return Ok(record);
            }
            Err(failure) => {
                warn!(
                    attempt,
                    max_attempts,
                    required_keys = ?required_keys,
                    cause = %failure,
                    raw_len = raw.len(),
                    "Extraction failed, discarding attempt"
                );
                last_failure = Some(failure.into());
            }
        }
    }

    let exhausted = RetryExhausted {
        attempts: max_attempts,
        required_keys: required_keys.iter().map(|k| k.to_string()).collect(),
        last_failure: last_failure
            .unwrap_or(AttemptFailure::Extraction(ExtractionFailure::Unparseable)),
    };
    warn!(error = %exhausted, "Retry budget exhausted");
    Err(exhausted)
}

/// [`with_retry`] for a typed record shape: validates against
/// `T::REQUIRED_KEYS` and converts on success.
pub async fn with_retry_as<T, F, Fut>(
    max_attempts: usize,
    mut produce: F,
) -> std::result::Result<T, RetryExhausted>
where
    T: RecordShape,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<String, GatewayError>>,
{
    with_retry(max_attempts, T::REQUIRED_KEYS, &mut produce)
        .await
        .map(|record| T::from_record(&record))
}
