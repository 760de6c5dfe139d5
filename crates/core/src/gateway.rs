//! Generator trait — the abstraction over text-generation backends.
//!
//! A Generator knows how to send a role-tagged message list to a model and
//! get raw text back. It is deliberately an opaque function: messages in,
//! text out, or a [`GatewayError`] when the call cannot complete.
//!
//! Implementations live in `recollect-providers`; tests script outputs with
//! in-crate mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::GatewayError;
use crate::message::Message;

/// Parameters for a single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// The model to use (e.g., "meta-llama/Llama-3.3-70B-Instruct-Turbo")
    pub model: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout — the only cancellation point in the core
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

fn default_temperature() -> f32 {
    1.0
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_timeout() -> Duration {
    Duration::from_secs(2100)
}

impl GenerationParams {
    /// Params with the runtime defaults for the given model.
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout: default_timeout(),
        }
    }
}

/// The core Generator trait.
///
/// Every backend implements this. The agent calls `generate()` without
/// knowing which provider is behind it. Implementations own their own
/// bounded retry of purely transport-level failures; format-level retry
/// belongs to [`crate::retry::with_retry`], one layer up.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this generator (e.g., "together", "openai").
    fn name(&self) -> &str;

    /// Send the messages and return the raw completion text.
    async fn generate(
        &self,
        messages: &[Message],
        params: &GenerationParams,
    ) -> std::result::Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_defaults_match_runtime() {
        let params = GenerationParams::for_model("test-model");
        assert!((params.temperature - 1.0).abs() < f32::EPSILON);
        assert_eq!(params.max_tokens, 2048);
        assert_eq!(params.timeout, Duration::from_secs(2100));
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: GenerationParams =
            serde_json::from_str(r#"{"model": "gpt-4o"}"#).unwrap();
        assert_eq!(params.model, "gpt-4o");
        assert_eq!(params.max_tokens, 2048);
    }
}
