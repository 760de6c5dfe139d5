//! Scripted generator for tests: replays a fixed sequence of outputs and
//! records every request it receives.

use async_trait::async_trait;
use recollect_core::error::GatewayError;
use recollect_core::gateway::{GenerationParams, Generator};
use recollect_core::message::Message;
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) struct ScriptedGenerator {
    outputs: Mutex<VecDeque<Result<String, GatewayError>>>,
    /// Output replayed when the script runs out (or for `repeating`)
    fallback: Result<String, GatewayError>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedGenerator {
    pub(crate) fn new(outputs: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            fallback: Err(GatewayError::EmptyCompletion),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A generator that returns the same output on every call.
    pub(crate) fn repeating(output: &str) -> Self {
        Self {
            outputs: Mutex::new(VecDeque::new()),
            fallback: Ok(output.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Total calls received.
    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The messages sent on the n-th call.
    pub(crate) fn request(&self, n: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        messages: &[Message],
        _params: &GenerationParams,
    ) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
