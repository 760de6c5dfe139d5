//! Configuration loading and validation for Recollect.
//!
//! Loads configuration from a TOML file with environment variable
//! overrides for secrets, and validates all settings before an agent is
//! constructed. The defaults reproduce the runtime's standard operating
//! point: temperature 1.0, 2048 output tokens, a 2100 s request timeout,
//! and a structured-retry budget of 10.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use recollect_core::GenerationParams;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "RECOLLECT_API_KEY";

/// The root configuration structure. Maps directly to the config TOML.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider API key; falls back to `RECOLLECT_API_KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Generation parameters
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Retry budgets
    #[serde(default)]
    pub retry: RetryConfig,

    /// Scaffolding behavior
    #[serde(default)]
    pub scaffolding: ScaffoldingConfig,
}

fn default_base_url() -> String {
    "https://api.together.xyz/v1".into()
}
fn default_model() -> String {
    "meta-llama/Llama-3.3-70B-Instruct-Turbo".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            generation: GenerationConfig::default(),
            retry: RetryConfig::default(),
            scaffolding: ScaffoldingConfig::default(),
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("generation", &self.generation)
            .field("retry", &self.retry)
            .field("scaffolding", &self.scaffolding)
            .finish()
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

/// Generation parameters for every gateway call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f32 {
    1.0
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_timeout_secs() -> u64 {
    2100
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// The two independent retry layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Full-regeneration attempts to obtain a valid structured record
    #[serde(default = "default_budget")]
    pub budget: usize,

    /// Low-level transport retries inside the gateway, per generation call
    #[serde(default = "default_transport_attempts")]
    pub transport_attempts: usize,
}

fn default_budget() -> usize {
    10
}
fn default_transport_attempts() -> usize {
    3
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            transport_attempts: default_transport_attempts(),
        }
    }
}

/// How notes are injected into a session's framing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldingConfig {
    #[serde(default)]
    pub mode: ScaffoldingMode,

    /// Character ceiling on injected notes; 0 disables the guard
    #[serde(default = "default_max_inject_chars")]
    pub max_inject_chars: usize,
}

fn default_max_inject_chars() -> usize {
    16 * 1024
}

impl Default for ScaffoldingConfig {
    fn default() -> Self {
        Self {
            mode: ScaffoldingMode::default(),
            max_inject_chars: default_max_inject_chars(),
        }
    }
}

/// `raw` prepends the whole notes blob; `model_mediated` spends one extra
/// model round-trip filtering the notes down to what the upcoming
/// conversation needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaffoldingMode {
    #[default]
    Raw,
    ModelMediated,
}

/// Configuration loading/validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

impl AppConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(s)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Fill secrets from the environment when the file omits them.
    fn apply_env_overrides(&mut self) {
        if self.api_key.is_none() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                if !key.is_empty() {
                    tracing::debug!("Using API key from {API_KEY_ENV}");
                    self.api_key = Some(key);
                }
            }
        }
    }

    /// Validate settings before constructing an agent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.is_empty() {
            return Err(ConfigError::Invalid {
                message: "model must not be empty".into(),
            });
        }
        if self.base_url.is_empty() {
            return Err(ConfigError::Invalid {
                message: "base_url must not be empty".into(),
            });
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "temperature must be within 0.0..=2.0, got {}",
                    self.generation.temperature
                ),
            });
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                message: "max_tokens must be at least 1".into(),
            });
        }
        if self.retry.budget == 0 {
            return Err(ConfigError::Invalid {
                message: "retry budget must be at least 1".into(),
            });
        }
        if self.retry.transport_attempts == 0 {
            return Err(ConfigError::Invalid {
                message: "transport_attempts must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// The generation params every gateway call will use.
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            model: self.model.clone(),
            temperature: self.generation.temperature,
            max_tokens: self.generation.max_tokens,
            timeout: Duration::from_secs(self.generation.timeout_secs),
        }
    }
}
