//! Pragati LLM Client Layer
//!
//! Completion-client implementations behind the `CompletionClient` trait
//! from `pragati-domain`.
//!
//! # Clients
//!
//! - `MockClient`: deterministic mock for testing
//! - `CompletionsClient`: HTTP client for an OpenAI-style completions
//!   endpoint
//!
//! # Examples
//!
//! ```
//! use pragati_llm::MockClient;
//! use pragati_domain::traits::{CompletionClient, SamplingParams};
//!
//! # async fn example() {
//! let client = MockClient::new("{\"sectors\": []}");
//! let params = SamplingParams::default();
//! let result = client.complete("prompt", &params).await.unwrap();
//! assert_eq!(result, "{\"sectors\": []}");
//! # }
//! ```

#![warn(missing_docs)]

pub mod completions;

use async_trait::async_trait;
use pragati_domain::traits::{CompletionClient, SamplingParams};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use completions::CompletionsClient;

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status from the service
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

enum MockRule {
    Respond(String),
    Fail,
}

/// Mock completion client for deterministic testing
///
/// Returns pre-configured responses without any network calls. Rules are
/// matched by substring against the incoming prompt, so tests can key
/// responses on a stable fragment ("chunk 2 of 5") of an otherwise large
/// prompt.
#[derive(Clone)]
pub struct MockClient {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, MockRule)>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockClient {
    /// Create a client answering every prompt with a fixed response
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Respond with `response` when the prompt contains `fragment`
    ///
    /// Rules are checked in insertion order; the first match wins.
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((fragment.into(), MockRule::Respond(response.into())));
    }

    /// Fail with a communication error when the prompt contains `fragment`
    pub fn add_failure(&mut self, fragment: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((fragment.into(), MockRule::Fail));
    }

    /// Number of completed `complete` calls so far
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    type Error = LlmError;

    async fn complete(
        &self,
        prompt: &str,
        _params: &SamplingParams,
    ) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        let rules = self.rules.lock().unwrap();
        for (fragment, rule) in rules.iter() {
            if prompt.contains(fragment.as_str()) {
                return match rule {
                    MockRule::Respond(response) => Ok(response.clone()),
                    MockRule::Fail => Err(LlmError::Communication("mock failure".to_string())),
                };
            }
        }

        Ok(self.default_response.clone())
    }
}
