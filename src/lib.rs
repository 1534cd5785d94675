//! Debate scoring engine.
//!
//! Given a threaded conversation and a central question, the pipeline
//! reconstructs an adversarial argument structure (claim/warrant/impact),
//! evaluates head-to-head clashes between opposing claims, groups arguments
//! into contested issues, and produces a winner verdict with per-participant
//! speaker scores, modeled on formal debate-judging methodology.
//!
//! Inference is consumed through two narrow host-supplied contracts: a
//! text-inference call ([`service::InferenceClient`]) and a JSON-extraction
//! utility ([`service::JsonExtractor`]). Every inference-backed stage fails
//! soft, so a run always terminates with a complete [`model::DebateReport`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use debate_intel::model::{DebateRequest, ScoringConfig};
//! use debate_intel::service::{DebatePipeline, StrictJsonExtractor};
//! # use debate_intel::service::InferenceClient;
//! # async fn run(client: Arc<dyn InferenceClient>) {
//! let pipeline = DebatePipeline::new(
//!     client,
//!     Arc::new(StrictJsonExtractor),
//!     ScoringConfig::default(),
//! )
//! .expect("valid configuration");
//!
//! let request = DebateRequest {
//!     central_question: "Should the city ban cars downtown?".to_string(),
//!     positions: None,
//!     comments: vec![],
//! };
//! let report = pipeline.score(request).await;
//! println!("winner: {:?}", report.verdict.winner);
//! # }
//! ```

pub mod model;
pub mod service;

pub use model::{DebateReport, DebateRequest, ScoringConfig};
pub use service::{DebatePipeline, RunBudget};
