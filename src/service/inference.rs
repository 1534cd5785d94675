//! Inference service contract and retry decorator.
//!
//! The scoring engine never talks to a concrete model provider. It consumes a
//! text-inference call through [`InferenceClient`] and recovers structured
//! payloads from response text through [`JsonExtractor`]; hosts supply both.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// One text-inference call.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub prompt: String,
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Preferred model, if the host honors hints.
    pub model_hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

/// Successful inference response.
#[derive(Debug, Clone)]
pub struct InferenceResponse {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: FinishReason,
}

/// Inference call failure.
///
/// Authentication and quota failures are fatal: retrying cannot help and the
/// retry decorator aborts immediately on them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InferenceError {
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("quota exhausted: {0}")]
    Quota(String),
    #[error("inference call timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("inference service failure: {0}")]
    Service(String),
}

impl InferenceError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, InferenceError::Auth(_) | InferenceError::Quota(_))
    }
}

/// Text-inference call, implemented by the host application.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError>;
}

/// Best-effort JSON recovery from raw response text, implemented by the host.
///
/// Production implementations handle markdown fences, trailing commentary,
/// and truncated objects. The engine only requires "parsed object or None".
pub trait JsonExtractor: Send + Sync {
    fn extract_object(&self, raw: &str) -> Option<serde_json::Value>;
}

/// Direct-parse extractor, sufficient for well-formed responses and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJsonExtractor;

impl JsonExtractor for StrictJsonExtractor {
    fn extract_object(&self, raw: &str) -> Option<serde_json::Value> {
        serde_json::from_str(raw.trim()).ok()
    }
}

/// Decode a stage payload out of raw response text.
///
/// Returns None (with a warning) when the text yields no object or the object
/// does not match the stage's shape; callers fall back to stage defaults.
pub fn decode_payload<T: DeserializeOwned>(
    extractor: &dyn JsonExtractor,
    raw: &str,
    stage: &'static str,
) -> Option<T> {
    let value = match extractor.extract_object(raw) {
        Some(value) => value,
        None => {
            tracing::warn!(stage = stage, "No JSON object recovered from response text");
            return None;
        }
    };
    match serde_json::from_value(value) {
        Ok(payload) => Some(payload),
        Err(e) => {
            tracing::warn!(stage = stage, error = %e, "Response object does not match stage payload shape");
            None
        }
    }
}

/// Bounded retry with exponential backoff and a per-call timeout.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry (1-based attempt that just failed).
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Decorator adding timeout and retry semantics to any [`InferenceClient`].
///
/// Stages stay retry-free; wrapping the host client here keeps the policy in
/// one place and out of the scoring logic.
pub struct RetryingClient {
    inner: Arc<dyn InferenceClient>,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(inner: Arc<dyn InferenceClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl InferenceClient for RetryingClient {
    async fn complete(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            let call = self.inner.complete(request.clone());
            let result = match tokio::time::timeout(self.policy.call_timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(InferenceError::Timeout(self.policy.call_timeout)),
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_fatal() => {
                    tracing::warn!(attempt = attempt, error = %e, "Fatal inference error, not retrying");
                    return Err(e);
                }
                Err(e) => {
                    tracing::debug!(attempt = attempt, error = %e, "Inference call failed");
                    if attempt < attempts {
                        tokio::time::sleep(self.policy.backoff_delay(attempt)).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| InferenceError::Service("retry loop exhausted".to_string())))
    }
}
