//! Generator gateway implementations for Recollect.
//!
//! Most hosted models expose an OpenAI-compatible `/chat/completions`
//! endpoint, so one gateway covers OpenAI, Together AI, OpenRouter,
//! Fireworks, vLLM, Ollama, and friends.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatGateway;
