//! Shared test doubles for pipeline scenario tests.

use async_trait::async_trait;

use debate_intel::service::{
    InferenceClient, InferenceError, InferenceRequest, InferenceResponse,
};
use debate_intel::service::inference::FinishReason;

/// Install a test subscriber once so `RUST_LOG=debug cargo test` shows the
/// pipeline's stage logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Stub client routing each request to a canned response by matching a marker
/// substring against the stage's system prompt. Unmatched stages fail, which
/// exercises the fail-soft path for stages a test does not care about.
pub struct StubInferenceClient {
    routes: Vec<(&'static str, String)>,
}

impl StubInferenceClient {
    pub fn new(routes: Vec<(&'static str, String)>) -> Self {
        Self { routes }
    }
}

#[async_trait]
impl InferenceClient for StubInferenceClient {
    async fn complete(
        &self,
        request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        let system = request.system.unwrap_or_default();
        for (marker, response) in &self.routes {
            if system.contains(marker) {
                return Ok(InferenceResponse {
                    text: response.clone(),
                    input_tokens: 100,
                    output_tokens: 100,
                    finish_reason: FinishReason::Stop,
                });
            }
        }
        Err(InferenceError::Service(format!(
            "no stub route for system prompt: {}",
            system.chars().take(60).collect::<String>()
        )))
    }
}

/// Client whose every call fails, for the all-stages-degraded scenario.
pub struct FailingInferenceClient;

#[async_trait]
impl InferenceClient for FailingInferenceClient {
    async fn complete(
        &self,
        _request: InferenceRequest,
    ) -> Result<InferenceResponse, InferenceError> {
        Err(InferenceError::Service("inference service down".to_string()))
    }
}

/// Marker substrings identifying each stage's system prompt.
pub mod markers {
    pub const EXTRACTION: &str = "claim/warrant/impact model";
    pub const EVALUATION: &str = "scoring individual arguments";
    pub const CLASH: &str = "direct exchanges between opposing arguments";
    pub const GROUPING: &str = "organizing a flowed debate into issues";
    pub const SPEAKER: &str = "speaker points on World-Schools-style rubrics";
    pub const BURDEN: &str = "analyzing burden of proof";
}
