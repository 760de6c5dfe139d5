//! OpenAI-compatible gateway implementation.
//!
//! Works with: OpenAI, Together AI, OpenRouter, Fireworks AI, Ollama,
//! vLLM, and any other endpoint speaking the `/chat/completions` dialect.
//!
//! The gateway performs its own bounded retry of purely transport-level
//! failures (network errors, timeouts, rate limits, 5xx). Format-level
//! failures — the model answering with something that isn't the requested
//! record — are not its concern; those belong to the structured retry
//! loop one layer up.

use async_trait::async_trait;
use recollect_core::error::GatewayError;
use recollect_core::gateway::{GenerationParams, Generator};
use recollect_core::message::{Message, Role};
use serde::Deserialize;
use tracing::{debug, warn};

/// An OpenAI-compatible text-generation gateway.
pub struct OpenAiCompatGateway {
    name: String,
    base_url: String,
    api_key: String,
    transport_attempts: usize,
    client: reqwest::Client,
}

impl OpenAiCompatGateway {
    /// Create a new OpenAI-compatible gateway.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        // Per-request timeouts come from GenerationParams, so the client
        // itself carries none.
        let client = reqwest::Client::new();

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            transport_attempts: 3,
            client,
        }
    }

    /// Create a Together AI gateway (convenience constructor).
    pub fn together(api_key: impl Into<String>) -> Self {
        Self::new("together", "https://api.together.xyz/v1", api_key)
    }

    /// Create an OpenAI gateway (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Set the number of low-level transport attempts per generation call.
    pub fn with_transport_attempts(mut self, attempts: usize) -> Self {
        self.transport_attempts = attempts.max(1);
        self
    }

    /// Convert our Message types to the wire format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage<'_>> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                content: &m.content,
            })
            .collect()
    }

    /// Whether a failure is worth another transport-level attempt.
    fn is_retryable(error: &GatewayError) -> bool {
        match error {
            GatewayError::Network(_) | GatewayError::Timeout(_) | GatewayError::RateLimited { .. } => {
                true
            }
            GatewayError::ApiError { status_code, .. } => *status_code >= 500,
            GatewayError::AuthenticationFailed(_) | GatewayError::EmptyCompletion => false,
        }
    }

    /// One request/response cycle, no retry.
    async fn generate_once(
        &self,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": params.model,
            "messages": Self::to_api_messages(messages),
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
            "stream": false,
        });

        debug!(
            gateway = %self.name,
            model = %params.model,
            messages = messages.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(params.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout(params.timeout.as_secs())
                } else {
                    GatewayError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(GatewayError::RateLimited { retry_after_secs: 5 });
        }

        if status == 401 || status == 403 {
            return Err(GatewayError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gateway returned error");
            return Err(GatewayError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| GatewayError::ApiError {
            status_code: 200,
            message: format!("Failed to parse response: {e}"),
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GatewayError::EmptyCompletion);
        }

        Ok(content)
    }
}

#[async_trait]
impl Generator for OpenAiCompatGateway {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<String, GatewayError> {
        let mut last_error = GatewayError::Network("no attempt made".into());

        for attempt in 1..=self.transport_attempts {
            match self.generate_once(messages, params).await {
                Ok(text) => return Ok(text),
                Err(e) if Self::is_retryable(&e) => {
                    warn!(
                        gateway = %self.name,
                        attempt,
                        total = self.transport_attempts,
                        error = %e,
                        "Transport attempt failed"
                    );
                    if let GatewayError::RateLimited { retry_after_secs } = &e {
                        tokio::time::sleep(std::time::Duration::from_secs(*retry_after_secs)).await;
                    }
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }
}

// --- Wire types ---

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
}
