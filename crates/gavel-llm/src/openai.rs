//! OpenAI-compatible provider implementation
//!
//! Talks to a chat-completions endpoint with structured output enforced
//! through a JSON schema, so the model is constrained to the stage's entity
//! shape before validation even runs.
//!
//! # Features
//!
//! - Async HTTP communication with the chat-completions API
//! - Structured output via `response_format: json_schema`
//! - Retry logic with exponential backoff for transport errors
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use gavel_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("https://api.openai.com", "sk-...", "gpt-4o-2024-08-06");
//! ```

use gavel_domain::{ModelFailure, ModelProvider, ModelRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default timeout for a single model call (5 minutes; judgments are long).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of transport-level retry attempts.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Chat-completions provider with structured output
pub struct OpenAiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: &'a serde_json::Value,
    strict: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider.
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g. `https://api.openai.com`)
    /// - `api_key`: bearer token
    /// - `model`: model identifier (e.g. `gpt-4o-2024-08-06`)
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a provider against the default endpoint.
    pub fn default_endpoint(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, api_key, model)
    }

    /// Set the maximum number of transport-retry attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Run one structured-output request.
    ///
    /// # Errors
    ///
    /// - [`ModelFailure::Refusal`] when the model declines
    /// - [`ModelFailure::EmptyOutput`] when no content comes back
    /// - [`ModelFailure::Transport`] for HTTP and connection failures after
    ///   exhausting retries
    pub async fn generate(&self, request: &ModelRequest) -> Result<String, ModelFailure> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let schema_name = format!("{}_extraction", request.stage);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.instructions,
                },
                ChatMessage {
                    role: "user",
                    content: &request.input,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: &schema_name,
                    schema: &request.schema,
                    strict: true,
                },
            },
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed: ChatResponse = response.json().await.map_err(|e| {
                            ModelFailure::Transport(format!("failed to parse response: {e}"))
                        })?;
                        return Self::extract_content(parsed);
                    } else if status.is_client_error()
                        && status != reqwest::StatusCode::TOO_MANY_REQUESTS
                    {
                        // 4xx other than rate limiting will not succeed on retry.
                        let text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "unknown error".to_string());
                        return Err(ModelFailure::Transport(format!("HTTP {status}: {text}")));
                    } else {
                        let text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "unknown error".to_string());
                        last_error =
                            Some(ModelFailure::Transport(format!("HTTP {status}: {text}")));
                    }
                }
                Err(e) => {
                    last_error = Some(ModelFailure::Transport(format!("request failed: {e}")));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tracing::debug!(stage = %request.stage, attempt = attempts, "retrying model call");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| ModelFailure::Transport("max retries exceeded".to_string())))
    }

    fn extract_content(parsed: ChatResponse) -> Result<String, ModelFailure> {
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(ModelFailure::EmptyOutput)?;
        if let Some(refusal) = choice.message.refusal {
            return Err(ModelFailure::Refusal(refusal));
        }
        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(ModelFailure::EmptyOutput),
        }
    }
}

impl ModelProvider for OpenAiProvider {
    fn generate_structured(&self, request: &ModelRequest) -> Result<String, ModelFailure> {
        // Blocking wrapper; the orchestrator calls providers from blocking
        // contexts.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ModelFailure::Transport(format!("runtime: {e}")))?;
        runtime.block_on(self.generate(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_domain::Stage;

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiProvider::new("http://localhost:8080", "key", "test-model");
        assert_eq!(provider.endpoint, "http://localhost:8080");
        assert_eq!(provider.model, "test-model");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_default_endpoint() {
        let provider = OpenAiProvider::default_endpoint("key", "test-model");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_with_max_retries() {
        let provider =
            OpenAiProvider::new("http://localhost:8080", "key", "m").with_max_retries(5);
        assert_eq!(provider.max_retries, 5);
    }

    #[test]
    fn test_refusal_maps_to_refusal_failure() {
        let parsed = ChatResponse {
            choices: vec![ChatChoice {
                message: ChatResponseMessage {
                    content: None,
                    refusal: Some("cannot comply".into()),
                },
            }],
        };
        let result = OpenAiProvider::extract_content(parsed);
        assert!(matches!(result, Err(ModelFailure::Refusal(message)) if message == "cannot comply"));
    }

    #[test]
    fn test_blank_content_is_empty_output() {
        let parsed = ChatResponse {
            choices: vec![ChatChoice {
                message: ChatResponseMessage {
                    content: Some("   ".into()),
                    refusal: None,
                },
            }],
        };
        assert!(matches!(
            OpenAiProvider::extract_content(parsed),
            Err(ModelFailure::EmptyOutput)
        ));
    }

    #[tokio::test]
    async fn test_transport_error_after_retries() {
        let provider =
            OpenAiProvider::new("http://localhost:1", "key", "test-model").with_max_retries(1);
        let request = ModelRequest {
            stage: Stage::Judgement,
            schema: serde_json::json!({}),
            instructions: "extract".into(),
            input: "text".into(),
        };
        let result = provider.generate(&request).await;
        assert!(matches!(result, Err(ModelFailure::Transport(_))));
    }
}
