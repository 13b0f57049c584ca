//! Gavel Model Provider Layer
//!
//! Pluggable implementations of the `ModelProvider` trait from `gavel-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic mock for testing, with per-stage response
//!   queues and failure injection
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API with structured
//!   output
//!
//! # Examples
//!
//! ```
//! use gavel_llm::MockProvider;
//! use gavel_domain::{ModelProvider, ModelRequest, Stage};
//!
//! let provider = MockProvider::new();
//! provider.push_response(Stage::Judgement, "{}");
//! let request = ModelRequest {
//!     stage: Stage::Judgement,
//!     schema: serde_json::json!({}),
//!     instructions: String::new(),
//!     input: String::new(),
//! };
//! assert_eq!(provider.generate_structured(&request).unwrap(), "{}");
//! ```

#![warn(missing_docs)]

pub mod openai;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use gavel_domain::{ModelFailure, ModelProvider, ModelRequest, Stage};

pub use openai::OpenAiProvider;

/// One scripted mock outcome.
#[derive(Debug, Clone)]
enum MockOutcome {
    Respond(String),
    Fail(String),
}

/// Mock model provider for deterministic testing
///
/// Responses are queued per stage and consumed in FIFO order, so a test can
/// script a failing first attempt followed by a corrected retry. When a
/// stage's queue is empty the provider reports an empty-output failure, which
/// surfaces scripting mistakes instead of hiding them.
///
/// Clones share state, so a test can keep a handle for assertions while the
/// orchestrator owns another.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    queues: Arc<Mutex<HashMap<Stage, VecDeque<MockOutcome>>>>,
    call_counts: Arc<Mutex<HashMap<Stage, usize>>>,
    last_instructions: Arc<Mutex<HashMap<Stage, String>>>,
}

impl MockProvider {
    /// Create a provider with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the given stage.
    pub fn push_response(&self, stage: Stage, response: impl Into<String>) {
        self.queues
            .lock()
            .unwrap()
            .entry(stage)
            .or_default()
            .push_back(MockOutcome::Respond(response.into()));
    }

    /// Queue a transport failure for the given stage.
    pub fn push_failure(&self, stage: Stage, message: impl Into<String>) {
        self.queues
            .lock()
            .unwrap()
            .entry(stage)
            .or_default()
            .push_back(MockOutcome::Fail(message.into()));
    }

    /// Number of calls made for the given stage.
    pub fn call_count(&self, stage: Stage) -> usize {
        self.call_counts
            .lock()
            .unwrap()
            .get(&stage)
            .copied()
            .unwrap_or(0)
    }

    /// Instructions from the most recent call for the given stage.
    pub fn last_instructions(&self, stage: Stage) -> Option<String> {
        self.last_instructions.lock().unwrap().get(&stage).cloned()
    }
}

impl ModelProvider for MockProvider {
    fn generate_structured(&self, request: &ModelRequest) -> Result<String, ModelFailure> {
        *self
            .call_counts
            .lock()
            .unwrap()
            .entry(request.stage)
            .or_insert(0) += 1;
        self.last_instructions
            .lock()
            .unwrap()
            .insert(request.stage, request.instructions.clone());

        let outcome = self
            .queues
            .lock()
            .unwrap()
            .get_mut(&request.stage)
            .and_then(|queue| queue.pop_front());
        match outcome {
            Some(MockOutcome::Respond(response)) => Ok(response),
            Some(MockOutcome::Fail(message)) => Err(ModelFailure::Transport(message)),
            None => Err(ModelFailure::EmptyOutput),
        }
    }
}
