//! HTTP client for an OpenAI-style completions endpoint
//!
//! The remote service is treated as unreliable: transport errors, 5xx
//! responses, and unrecognized response envelopes all surface as
//! [`LlmError`] values. Transport and 5xx failures are retried with
//! exponential backoff; 4xx responses fail immediately.

use crate::LlmError;
use async_trait::async_trait;
use pragati_domain::traits::{CompletionClient, SamplingParams};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout. Large documents mean multi-minute calls, so
/// this is minutes, not seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of attempts per call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// HTTP completion client
///
/// Sends prompts to a `/completions`-style JSON endpoint and recovers the
/// generated text from whichever envelope shape the service uses.
pub struct CompletionsClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    presence_penalty: f64,
    seed: i64,
    stop: Option<String>,
    stream: bool,
    stream_options: Option<Value>,
    temperature: f64,
    top_p: f64,
}

impl CompletionsClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: full completions URL
    /// - `api_key`: bearer token, also sent as an `API-Key` header
    /// - `model`: model identifier for the request body
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of attempts per call
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    async fn send(&self, prompt: &str, params: &SamplingParams) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: &self.model,
            prompt,
            presence_penalty: params.presence_penalty,
            seed: params.seed,
            stop: None,
            stream: false,
            stream_options: None,
            temperature: params.temperature,
            top_p: params.top_p,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&self.endpoint)
                .header("Accept", "application/json")
                .header("API-Key", &self.api_key)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let text = response.text().await.map_err(|e| {
                            LlmError::Communication(format!("Failed to read body: {}", e))
                        })?;
                        debug!("Completion response length: {} chars", text.len());
                        return extract_text(&text);
                    }

                    let body_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    let error = LlmError::Status {
                        status: status.as_u16(),
                        body: body_text,
                    };
                    if !status.is_server_error() {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(
                    "Completion attempt {}/{} failed, retrying in {:?}",
                    attempts, self.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

/// Recover the generated text from a response body.
///
/// The envelope shape is not guaranteed. Known field names are tried in
/// priority order; an object with none of them is returned serialized
/// as-is so the caller's parser gets a chance at it.
fn extract_text(body: &str) -> Result<String, LlmError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Body is not JSON: {}", e)))?;

    match value {
        Value::String(s) => Ok(s),
        Value::Object(ref obj) => {
            if let Some(choices) = obj.get("choices").and_then(Value::as_array) {
                if let Some(first) = choices.first() {
                    if let Some(text) = first.get("text").and_then(Value::as_str) {
                        if !text.is_empty() {
                            return Ok(text.to_string());
                        }
                    }
                    if let Some(content) = first
                        .get("message")
                        .and_then(|m| m.get("content"))
                        .and_then(Value::as_str)
                    {
                        return Ok(content.to_string());
                    }
                }
            }
            for field in ["text", "response", "content"] {
                if let Some(text) = obj.get(field).and_then(Value::as_str) {
                    return Ok(text.to_string());
                }
            }
            // Unknown envelope; hand the whole body to the caller.
            Ok(body.to_string())
        }
        _ => Ok(body.to_string()),
    }
}

#[async_trait]
impl CompletionClient for CompletionsClient {
    type Error = LlmError;

    async fn complete(
        &self,
        prompt: &str,
        params: &SamplingParams,
    ) -> Result<String, Self::Error> {
        self.send(prompt, params).await
    }
}
