//! Error types for the Recollect domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The taxonomy mirrors
//! the three failure layers of the system: transport (gateway), extraction
//! (malformed model output), and retry exhaustion (the only failure that
//! crosses a component boundary).

use thiserror::Error;

/// The top-level error type for all Recollect operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Retry budget exhausted: {0}")]
    Exhausted(#[from] RetryExhausted),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// The generator call failed to complete.
///
/// Covers network failure, timeout, and provider-side errors. The gateway
/// performs its own bounded low-level retry of these before one surfaces
/// to the structured retry loop as a failed attempt.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Empty completion returned by provider")]
    EmptyCompletion,
}

/// Model output was retrieved but could not be turned into a valid record.
///
/// This is a recoverable condition handled by the retry loop, never a
/// fatal error. `MissingKeys` names exactly the required keys absent from
/// the repaired record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("No parseable JSON object in model output")]
    Unparseable,

    #[error("Missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

impl ExtractionFailure {
    /// The keys that were missing, if this was a missing-key failure.
    pub fn missing_keys(&self) -> &[String] {
        match self {
            Self::MissingKeys(keys) => keys,
            Self::Unparseable => &[],
        }
    }
}

/// The cause of a single failed attempt inside the retry loop.
#[derive(Debug, Clone, Error)]
pub enum AttemptFailure {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Extraction(#[from] ExtractionFailure),
}

/// The bounded-attempt loop completed without a valid record.
///
/// The only terminal failure this core reports upward. Always carries the
/// required keys that were being validated and the cause of the final
/// attempt, to aid diagnosis.
#[derive(Debug, Clone, Error)]
#[error("no valid record after {attempts} attempts (required keys: {}): {last_failure}", .required_keys.join(", "))]
pub struct RetryExhausted {
    /// How many full attempts were made.
    pub attempts: usize,

    /// The required-key set that was being validated.
    pub required_keys: Vec<String>,

    /// What went wrong on the final attempt.
    pub last_failure: AttemptFailure,
}
