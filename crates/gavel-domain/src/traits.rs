//! Trait definitions for external interactions
//!
//! These traits define the boundary between domain logic and infrastructure.
//! Model-provider implementations live in other crates (gavel-llm).

use serde::{Deserialize, Serialize};

/// Extraction stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Case-level facts: citation, charges, defendants per charge.
    Judgement,
    /// Per-defendant background profiles.
    Defendants,
    /// Per charge x defendant sentencing analysis.
    Trials,
}

impl Stage {
    /// Stage name as used for persisted filenames and logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Judgement => "judgement",
            Stage::Defendants => "defendants",
            Stage::Trials => "trials",
        }
    }

    /// All stages in pipeline order.
    pub fn all() -> [Stage; 3] {
        [Stage::Judgement, Stage::Defendants, Stage::Trials]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured-extraction request to a model.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Which stage this request serves.
    pub stage: Stage,
    /// JSON schema the output must conform to.
    pub schema: serde_json::Value,
    /// Stage instructions, including any identity context and retry guidance.
    pub instructions: String,
    /// The judgment text.
    pub input: String,
}

/// Why a provider could not return usable output.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelFailure {
    /// The model declined to answer.
    #[error("model refused the request: {0}")]
    Refusal(String),

    /// The model returned no content at all.
    #[error("model returned empty output")]
    EmptyOutput,

    /// Transport-level failure: connection, HTTP status, deadline.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Trait for structured-output model providers
///
/// Implemented by the infrastructure layer (gavel-llm). Returns the raw model
/// text; parsing and validation are the caller's concern.
pub trait ModelProvider: Send + Sync {
    /// Run one structured-extraction request and return the raw output text.
    fn generate_structured(&self, request: &ModelRequest) -> Result<String, ModelFailure>;
}
