//! Scripted in-memory gateway for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GatewayError, ModelGateway};

/// Replays queued responses in order; an exhausted queue behaves like an outage.
#[derive(Default)]
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<String, GatewayError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every call fails.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::EmptyContent));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::RateLimited { retries: 0 }))
    }
}
